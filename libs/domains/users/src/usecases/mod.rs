//! Use-case pipelines.
//!
//! Each operation is a short, fixed sequence of stages run in order, the
//! first failure ending the pipeline:
//!
//! | operation | stages |
//! |-----------|--------|
//! | create    | validate → hash password → add → notify (detached) |
//! | update    | validate provided fields → hash password if provided → update → notify (detached) |
//! | delete    | delete → notify (detached) |
//! | search    | build query → search |
//!
//! Notification runs on its own task once the change is persisted; the
//! caller never waits for it and never sees its failures, which are only
//! logged.

mod create;
mod delete;
mod search;
mod update;

pub use create::CreateUser;
pub use delete::DeleteUser;
pub use search::SearchUsers;
pub use update::UpdateUser;

use std::sync::Arc;
use tracing::{Instrument, debug, error};
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::ChangeEvent;
use crate::notifier::ChangeNotifier;
use crate::validation::describe;

/// Validation stage shared by the mutating pipelines.
fn validate<T: Validate>(request: &T) -> UserResult<()> {
    request
        .validate()
        .map_err(|e| UserError::InvalidUser(describe(&e)))
}

/// Notification stage: publish `event` on a detached task.
fn publish_detached<N>(notifier: Arc<N>, event: ChangeEvent)
where
    N: ChangeNotifier + ?Sized + 'static,
{
    tokio::spawn(
        async move {
            let operation = event.operation;
            let user_id = event.user_id().to_string();
            debug!(%operation, %user_id, "Notify user change");

            if let Err(e) = notifier.notify(event).await {
                error!(error = %e, %operation, %user_id, "Can't send user change event");
            }
        }
        .in_current_span(),
    );
}

/// Log a pipeline failure at a level matching who has to act on it.
fn log_failure(usecase: &str, error: &UserError) {
    if error.is_client_error() {
        debug!(usecase, error = %error, "Use case rejected request");
    } else {
        error!(usecase, error = %error, "Use case failed");
    }
}
