use std::sync::Arc;
use tracing::instrument;

use super::{log_failure, publish_detached};
use crate::error::UserResult;
use crate::models::{ChangeEvent, DeleteUserRequest, User};
use crate::notifier::ChangeNotifier;
use crate::repository::UserRepository;

/// delete → notify (detached)
pub struct DeleteUser<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> DeleteUser<R, N>
where
    R: UserRepository,
    N: ChangeNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    #[instrument(name = "user_delete", skip_all, fields(user_id = %request.id))]
    pub async fn execute(&self, request: DeleteUserRequest) -> UserResult<User> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            log_failure("user_delete", e);
        }
        result
    }

    async fn run(&self, request: DeleteUserRequest) -> UserResult<User> {
        let user = self.repository.delete(request.id).await?;
        publish_detached(Arc::clone(&self.notifier), ChangeEvent::deleted(user.clone()));
        Ok(user)
    }
}
