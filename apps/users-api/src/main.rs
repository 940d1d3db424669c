use axum_helpers::server::{create_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_users::{
    Argon2Hasher, ChangeEventReceiver, InMemoryNotifier, InMemoryUserRepository, UserService,
    handlers,
};
use std::sync::Arc;
use tracing::info;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let repository = Arc::new(InMemoryUserRepository::new());
    let notifier = Arc::new(InMemoryNotifier::with_capacity(config.notifier.capacity));
    let hasher = Arc::new(Argon2Hasher::new());

    tokio::spawn(log_change_events(notifier.subscribe().await));

    let service = UserService::from_shared(repository, notifier, hasher);
    let router = create_router::<handlers::ApiDoc>(handlers::router(service));

    info!(
        address = %config.server.address(),
        notifier_capacity = config.notifier.capacity,
        "Starting users API"
    );
    create_app(router, &config.server).await?;

    info!("Users API stopped");
    Ok(())
}

/// Logs every change event until the notifier goes away.
async fn log_change_events(mut events: ChangeEventReceiver) {
    while let Some(event) = events.recv().await {
        info!(
            operation = %event.operation,
            user_id = %event.user_id(),
            timestamp = %event.timestamp,
            "User change event"
        );
    }
}
