//! Users Domain
//!
//! Management of a user base: create, update, delete and search users,
//! with every change announced to in-process subscribers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (/v1/user, /v1/users)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← one use-case pipeline per operation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────────────┐
//! │ Repository · Notifier · Hasher  │  ← traits + in-memory/argon2 impls
//! └──────┬──────────────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← entities, change events, request bodies
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers, Argon2Hasher, InMemoryNotifier, InMemoryUserRepository, UserService,
//! };
//!
//! let service = UserService::new(
//!     InMemoryUserRepository::new(),
//!     InMemoryNotifier::new(),
//!     Argon2Hasher::new(),
//! );
//!
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod hasher;
pub mod models;
pub mod notifier;
pub mod query;
pub mod repository;
pub mod service;
pub mod usecases;
pub mod validation;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use models::{
    ChangeEvent, CreateUserRequest, DeleteUserRequest, Operation, SearchUsersRequest,
    UpdateUserRequest, User,
};
pub use notifier::{ChangeEventReceiver, ChangeNotifier, InMemoryNotifier, NotifyError};
pub use query::{Criterion, UserQuery};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
