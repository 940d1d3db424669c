use std::sync::Arc;
use tracing::instrument;

use super::{log_failure, publish_detached, validate};
use crate::error::UserResult;
use crate::hasher::PasswordHasher;
use crate::models::{ChangeEvent, Revision, UpdateUserRequest, User, UserChanges};
use crate::notifier::ChangeNotifier;
use crate::repository::UserRepository;

/// validate provided fields → hash password if provided → update → notify (detached)
pub struct UpdateUser<R, N, H> {
    repository: Arc<R>,
    notifier: Arc<N>,
    hasher: Arc<H>,
}

impl<R, N, H> UpdateUser<R, N, H>
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

    #[instrument(name = "user_update", skip_all, fields(user_id = %request.id))]
    pub async fn execute(&self, request: UpdateUserRequest) -> UserResult<User> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            log_failure("user_update", e);
        }
        result
    }

    async fn run(&self, request: UpdateUserRequest) -> UserResult<User> {
        let request = request.without_empty_fields();
        validate(&request)?;
        let password_hash = self.hash_password(request.password.as_deref())?;
        let revision = self.update(request, password_hash).await?;
        let user = revision.after.clone();
        publish_detached(Arc::clone(&self.notifier), ChangeEvent::updated(revision));
        Ok(user)
    }

    fn hash_password(&self, password: Option<&str>) -> UserResult<Option<String>> {
        password.map(|p| self.hasher.hash(p)).transpose()
    }

    async fn update(
        &self,
        request: UpdateUserRequest,
        password_hash: Option<String>,
    ) -> UserResult<Revision> {
        self.repository
            .update(UserChanges {
                id: request.id,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UserError;
    use crate::hasher::MockPasswordHasher;
    use crate::models::{NewUser, Operation};
    use crate::notifier::{InMemoryNotifier, MockChangeNotifier};
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use std::time::Duration;
    use tokio::time::timeout;

    async fn seeded(email: &str) -> (Arc<InMemoryUserRepository>, User) {
        let repository = Arc::new(InMemoryUserRepository::new());
        let user = repository
            .add(NewUser {
                first_name: "test".to_string(),
                last_name: "test".to_string(),
                nick_name: "test".to_string(),
                email: email.to_string(),
                password_hash: "old-hash".to_string(),
                country: "FR".to_string(),
            })
            .await
            .unwrap();
        (repository, user)
    }

    fn unused_hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().never();
        hasher
    }

    #[tokio::test]
    async fn test_update_email_ok() {
        let (repository, user) = seeded("test-update-1").await;
        let notifier = InMemoryNotifier::new();
        let mut events = notifier.subscribe().await;
        let update = UpdateUser::new(
            Arc::clone(&repository),
            Arc::new(notifier),
            Arc::new(unused_hasher()),
        );

        let updated = update
            .execute(UpdateUserRequest {
                id: user.id.clone(),
                email: Some("test-update-1-updated@test.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, "test-update-1-updated@test.com");
        assert_eq!(updated.first_name, user.first_name);
        assert_eq!(updated.password_hash, "old-hash");

        let event = timeout(Duration::from_secs(3), events.recv())
            .await
            .expect("no update event")
            .unwrap();
        assert_eq!(event.operation, Operation::Update);
        assert_eq!(event.before.as_ref(), Some(&user));
        assert_eq!(event.after.as_ref(), Some(&updated));
    }

    #[tokio::test]
    async fn test_empty_fields_are_neither_validated_nor_applied() {
        let (repository, user) = seeded("keep@test.com").await;
        let update = UpdateUser::new(
            Arc::clone(&repository),
            Arc::new(InMemoryNotifier::new()),
            Arc::new(unused_hasher()),
        );

        let updated = update
            .execute(UpdateUserRequest {
                id: user.id.clone(),
                first_name: Some(String::new()),
                email: Some(String::new()),
                password: Some(String::new()),
                nick_name: Some("renamed".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.first_name, "test");
        assert_eq!(updated.email, "keep@test.com");
        assert_eq!(updated.nick_name, "renamed");
    }

    #[tokio::test]
    async fn test_invalid_provided_field_is_invalid_user() {
        let mut repository = MockUserRepository::new();
        repository.expect_update().never();
        let update = UpdateUser::new(
            Arc::new(repository),
            Arc::new(MockChangeNotifier::new()),
            Arc::new(unused_hasher()),
        );

        let result = update
            .execute(UpdateUserRequest {
                id: "any".to_string(),
                last_name: Some("abc".to_string()),
                ..Default::default()
            })
            .await;

        match result {
            Err(UserError::InvalidUser(reason)) => assert!(reason.contains("lastname")),
            other => panic!("expected InvalidUser, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_new_password_is_hashed() {
        let (repository, user) = seeded("pwd@test.com").await;
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|password| password.to_string() == "n3w-secret")
            .times(1)
            .returning(|_| Ok("new-hash".to_string()));
        let update = UpdateUser::new(
            Arc::clone(&repository),
            Arc::new(InMemoryNotifier::new()),
            Arc::new(hasher),
        );

        let updated = update
            .execute(UpdateUserRequest {
                id: user.id.clone(),
                password: Some("n3w-secret".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let update = UpdateUser::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryNotifier::new()),
            Arc::new(unused_hasher()),
        );

        let result = update
            .execute(UpdateUserRequest {
                id: "unknown".to_string(),
                nick_name: Some("whatever".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(UserError::NotFound(ref id)) if id == "unknown"));
    }
}
