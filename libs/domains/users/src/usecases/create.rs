use std::sync::Arc;
use tracing::instrument;

use super::{log_failure, publish_detached, validate};
use crate::error::UserResult;
use crate::hasher::PasswordHasher;
use crate::models::{ChangeEvent, CreateUserRequest, NewUser, User};
use crate::notifier::ChangeNotifier;
use crate::repository::UserRepository;

/// validate → hash password → add → notify (detached)
pub struct CreateUser<R, N, H> {
    repository: Arc<R>,
    notifier: Arc<N>,
    hasher: Arc<H>,
}

impl<R, N, H> CreateUser<R, N, H>
where
    R: UserRepository,
    N: ChangeNotifier + 'static,
    H: PasswordHasher,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, hasher: Arc<H>) -> Self {
        Self {
            repository,
            notifier,
            hasher,
        }
    }

    #[instrument(name = "user_create", skip_all, fields(email = %request.email))]
    pub async fn execute(&self, request: CreateUserRequest) -> UserResult<User> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            log_failure("user_create", e);
        }
        result
    }

    async fn run(&self, request: CreateUserRequest) -> UserResult<User> {
        validate(&request)?;
        let password_hash = self.hash_password(&request.password)?;
        let user = self.add(request, password_hash).await?;
        publish_detached(Arc::clone(&self.notifier), ChangeEvent::created(user.clone()));
        Ok(user)
    }

    fn hash_password(&self, password: &str) -> UserResult<String> {
        self.hasher.hash(password)
    }

    async fn add(&self, request: CreateUserRequest, password_hash: String) -> UserResult<User> {
        self.repository
            .add(NewUser {
                first_name: request.first_name,
                last_name: request.last_name,
                nick_name: request.nick_name,
                email: request.email,
                password_hash,
                country: request.country,
            })
            .await
    }
}
