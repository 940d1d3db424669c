use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, Revision, User, UserChanges};
use crate::query::UserQuery;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under a freshly generated id
    async fn add(&self, user: NewUser) -> UserResult<User>;

    /// Overwrite the provided fields of an existing user
    async fn update(&self, changes: UserChanges) -> UserResult<Revision>;

    /// Remove a user, returning the removed record
    async fn delete(&self, id: String) -> UserResult<User>;

    /// Fresh, empty query
    fn query(&self) -> UserQuery {
        UserQuery::new()
    }

    /// Every user matching at least one criterion of `query`
    async fn search(&self, query: UserQuery) -> UserResult<Vec<User>>;
}

/// Primary store plus the unique email index.
///
/// Both maps sit behind one lock so they are never observed out of step.
#[derive(Debug, Default)]
struct Store {
    by_id: HashMap<String, User>,
    id_by_email: HashMap<String, String>,
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.store.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn add(&self, user: NewUser) -> UserResult<User> {
        let mut store = self.store.write().await;

        if store.id_by_email.contains_key(&user.email) {
            return Err(UserError::AlreadyExists(user.email));
        }

        let user = user.into_user(Uuid::now_v7().to_string());
        store
            .id_by_email
            .insert(user.email.clone(), user.id.clone());
        store.by_id.insert(user.id.clone(), user.clone());

        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn update(&self, changes: UserChanges) -> UserResult<Revision> {
        let mut store = self.store.write().await;

        let before = store
            .by_id
            .get(&changes.id)
            .cloned()
            .ok_or_else(|| UserError::NotFound(changes.id.clone()))?;

        if let Some(new_email) = changes.email_change(&before.email) {
            if store.id_by_email.contains_key(new_email) {
                return Err(UserError::AlreadyExists(new_email.to_string()));
            }
            store.id_by_email.remove(&before.email);
            store
                .id_by_email
                .insert(new_email.to_string(), before.id.clone());
        }

        let after = changes.apply_to(&before);
        store.by_id.insert(after.id.clone(), after.clone());

        tracing::info!(user_id = %after.id, "Updated user");
        Ok(Revision { before, after })
    }

    async fn delete(&self, id: String) -> UserResult<User> {
        let mut store = self.store.write().await;

        let user = store.by_id.remove(&id).ok_or(UserError::NotFound(id))?;
        store.id_by_email.remove(&user.email);

        tracing::info!(user_id = %user.id, "Deleted user");
        Ok(user)
    }

    async fn search(&self, query: UserQuery) -> UserResult<Vec<User>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let store = self.store.read().await;
        let users = store
            .by_id
            .values()
            .filter(|u| query.matches(u))
            .cloned()
            .collect();

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tokio::task::JoinSet;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "test".to_string(),
            last_name: "test".to_string(),
            nick_name: "test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            country: "FR".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_assigns_distinct_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.add(new_user("test-add-1")).await.unwrap();
        let second = repo.add(new_user("test-add-2")).await.unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(first.email, "test-add-1");
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_add_same_email_fails() {
        let repo = InMemoryUserRepository::new();
        repo.add(new_user("test-add-1")).await.unwrap();

        let result = repo.add(new_user("test-add-1")).await;

        assert!(matches!(result, Err(UserError::AlreadyExists(ref e)) if e == "test-add-1"));
        let found = repo
            .search(UserQuery::new().by_email("test-add-1"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_returned_copy_does_not_alias_store() {
        let repo = InMemoryUserRepository::new();
        let mut user = repo.add(new_user("alias@test.com")).await.unwrap();
        user.first_name = "mutated".to_string();

        let found = repo.search(repo.query().by_id(&user.id)).await.unwrap();
        assert_eq!(found[0].first_name, "test");
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let repo = InMemoryUserRepository::new();

        let result = repo
            .update(UserChanges {
                id: "unknown".to_string(),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(UserError::NotFound(ref id)) if id == "unknown"));
    }

    #[tokio::test]
    async fn test_update_email_repoints_index() {
        let repo = InMemoryUserRepository::new();
        let user = repo.add(new_user("test-update-1")).await.unwrap();

        let revision = repo
            .update(UserChanges {
                id: user.id.clone(),
                first_name: Some("updated".to_string()),
                email: Some("test-update-1-updated".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(revision.before, user);
        assert_eq!(revision.after.email, "test-update-1-updated");

        let by_new = repo
            .search(repo.query().by_email("test-update-1-updated"))
            .await
            .unwrap();
        assert_eq!(by_new.len(), 1);
        assert_eq!(by_new[0].first_name, "updated");
        assert_eq!(by_new[0].last_name, "test");
        assert_eq!(by_new[0].country, "FR");

        let by_old = repo
            .search(repo.query().by_email("test-update-1"))
            .await
            .unwrap();
        assert!(by_old.is_empty());

        // the old email is free again
        repo.add(new_user("test-update-1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_to_taken_email_fails_without_changes() {
        let repo = InMemoryUserRepository::new();
        let first = repo.add(new_user("first@test.com")).await.unwrap();
        repo.add(new_user("second@test.com")).await.unwrap();

        let result = repo
            .update(UserChanges {
                id: first.id.clone(),
                nick_name: Some("changed".to_string()),
                email: Some("second@test.com".to_string()),
                ..Default::default()
            })
            .await;

        assert!(matches!(result, Err(UserError::AlreadyExists(_))));
        let found = repo.search(repo.query().by_id(&first.id)).await.unwrap();
        assert_eq!(found[0], first);
    }

    #[tokio::test]
    async fn test_update_keeping_same_email() {
        let repo = InMemoryUserRepository::new();
        let user = repo.add(new_user("same@test.com")).await.unwrap();

        let revision = repo
            .update(UserChanges {
                id: user.id.clone(),
                email: Some("same@test.com".to_string()),
                country: Some("DE".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(revision.after.country, "DE");
        let found = repo
            .search(repo.query().by_email("same@test.com"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_after_add() {
        let repo = InMemoryUserRepository::new();
        let user = repo.add(new_user("test-delete-1")).await.unwrap();

        let deleted = repo.delete(user.id.clone()).await.unwrap();
        assert_eq!(deleted.id, user.id);

        assert!(repo.search(repo.query().by_id(&user.id)).await.unwrap().is_empty());
        assert!(
            repo.search(repo.query().by_email("test-delete-1"))
                .await
                .unwrap()
                .is_empty()
        );
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let result = repo.delete("unknown".to_string()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_semantics() {
        let repo = InMemoryUserRepository::new();
        let a = repo.add(new_user("a@test.com")).await.unwrap();
        let mut other = new_user("b@test.com");
        other.first_name = "other".to_string();
        other.country = "UK".to_string();
        let b = repo.add(other).await.unwrap();

        assert!(repo.search(repo.query()).await.unwrap().is_empty());

        let by_id = repo.search(repo.query().by_id(&a.id)).await.unwrap();
        assert_eq!(by_id, vec![a.clone()]);

        let by_first_name = repo
            .search(repo.query().by_first_name("other"))
            .await
            .unwrap();
        assert_eq!(by_first_name, vec![b.clone()]);

        // both criteria match `a`; it must appear once
        let union = repo
            .search(repo.query().by_id(&a.id).by_country("FR").by_country("UK"))
            .await
            .unwrap();
        let ids: HashSet<_> = union.iter().map(|u| u.id.clone()).collect();
        assert_eq!(union.len(), 2);
        assert_eq!(ids, HashSet::from([a.id, b.id]));
    }

    #[tokio::test]
    async fn test_concurrent_adds() {
        let repo = InMemoryUserRepository::new();
        let mut tasks = JoinSet::new();

        for i in 0..64 {
            let repo = repo.clone();
            tasks.spawn(async move { repo.add(new_user(&format!("user-{i}@test.com"))).await });
        }

        let mut ids = HashSet::new();
        while let Some(result) = tasks.join_next().await {
            let user = result.unwrap().unwrap();
            assert!(ids.insert(user.id));
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(repo.len().await, 64);
    }
}
