use std::sync::Arc;
use tracing::instrument;

use super::log_failure;
use crate::error::UserResult;
use crate::models::{SearchUsersRequest, User};
use crate::query::{Criterion, UserQuery};
use crate::repository::UserRepository;

/// build query → search
pub struct SearchUsers<R> {
    repository: Arc<R>,
}

impl<R> SearchUsers<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(name = "user_search", skip_all)]
    pub async fn execute(&self, request: SearchUsersRequest) -> UserResult<Vec<User>> {
        let result = self.run(request).await;
        if let Err(e) = &result {
            log_failure("user_search", e);
        }
        result
    }

    async fn run(&self, request: SearchUsersRequest) -> UserResult<Vec<User>> {
        let query = self.build_query(request);
        self.repository.search(query).await
    }

    fn build_query(&self, request: SearchUsersRequest) -> UserQuery {
        self.repository
            .query()
            .by_all(Criterion::Id, request.id)
            .by_all(Criterion::Email, request.email)
            .by_all(Criterion::FirstName, request.first_name)
            .by_all(Criterion::LastName, request.last_name)
            .by_all(Criterion::NickName, request.nick_name)
            .by_all(Criterion::Country, request.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};

    fn new_user(email: &str, country: &str) -> NewUser {
        NewUser {
            first_name: "test".to_string(),
            last_name: "test".to_string(),
            nick_name: "test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            country: country.to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_query_maps_every_parameter() {
        let mut repository = MockUserRepository::new();
        repository.expect_query().returning(UserQuery::new);
        repository
            .expect_search()
            .withf(|query| {
                query.values(Criterion::Id).eq(["1", "2"])
                    && query.values(Criterion::Email).eq(["a@b.com"])
                    && query.values(Criterion::FirstName).eq(["Ada"])
                    && query.values(Criterion::LastName).eq(["Lovelace"])
                    && query.values(Criterion::NickName).eq(["countess"])
                    && query.values(Criterion::Country).eq(["UK"])
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let search = SearchUsers::new(Arc::new(repository));

        let users = search
            .execute(SearchUsersRequest {
                id: vec!["1".to_string(), "2".to_string()],
                email: vec!["a@b.com".to_string()],
                first_name: vec!["Ada".to_string()],
                last_name: vec!["Lovelace".to_string()],
                nick_name: vec!["countess".to_string()],
                country: vec!["UK".to_string()],
            })
            .await
            .unwrap();

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_search_without_criteria_returns_nothing() {
        let repository = Arc::new(InMemoryUserRepository::new());
        repository.add(new_user("a@test.com", "FR")).await.unwrap();
        let search = SearchUsers::new(repository);

        let users = search.execute(SearchUsersRequest::default()).await.unwrap();

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_search_by_country_values() {
        let repository = Arc::new(InMemoryUserRepository::new());
        repository.add(new_user("a@test.com", "FR")).await.unwrap();
        repository.add(new_user("b@test.com", "UK")).await.unwrap();
        repository.add(new_user("c@test.com", "DE")).await.unwrap();
        let search = SearchUsers::new(repository);

        let users = search
            .execute(SearchUsersRequest {
                country: vec!["FR".to_string(), "UK".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        let mut emails: Vec<_> = users.into_iter().map(|u| u.email).collect();
        emails.sort();
        assert_eq!(emails, vec!["a@test.com", "b@test.com"]);
    }
}
