//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: router assembly (docs, health, tracing, security headers) and serving
//! - **[`shutdown`]**: SIGINT/SIGTERM handling for graceful shutdown
//! - **[`health`]**: liveness endpoints
//! - **[`errors`]**: the JSON error envelope returned by every service
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let router = create_router::<ApiDoc>(Router::new());
//!     create_app(router, &ServerConfig::default()).await
//! }
//! ```

pub mod errors;
pub mod health;
pub mod server;
pub mod shutdown;

pub use errors::{ErrorBody, ErrorDetail, error_response, not_found};
pub use health::{HealthResponse, health_handler, ping_handler, root_handler};
pub use server::{create_app, create_router, security_headers};
pub use shutdown::shutdown_signal;
