use std::sync::Arc;

use crate::error::UserResult;
use crate::hasher::PasswordHasher;
use crate::models::{
    CreateUserRequest, DeleteUserRequest, SearchUsersRequest, UpdateUserRequest, User,
};
use crate::notifier::ChangeNotifier;
use crate::repository::UserRepository;
use crate::usecases::{CreateUser, DeleteUser, SearchUsers, UpdateUser};

/// Entry point of the users domain: one pipeline per operation, all sharing
/// the same repository, notifier and hasher.
pub struct UserService<R, N, H> {
    create: CreateUser<R, N, H>,
    update: UpdateUser<R, N, H>,
    delete: DeleteUser<R, N>,
    search: SearchUsers<R>,
}

impl<R, N, H> UserService<R, N, H>
where
    R: UserRepository,
    N: ChangeNotifier + 'static,
    H: PasswordHasher,
{
    pub fn new(repository: R, notifier: N, hasher: H) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(notifier), Arc::new(hasher))
    }

    /// Build the service around dependencies the caller keeps a handle on,
    /// e.g. a notifier it subscribes to.
    pub fn from_shared(repository: Arc<R>, notifier: Arc<N>, hasher: Arc<H>) -> Self {
        Self {
            create: CreateUser::new(
                Arc::clone(&repository),
                Arc::clone(&notifier),
                Arc::clone(&hasher),
            ),
            update: UpdateUser::new(Arc::clone(&repository), Arc::clone(&notifier), hasher),
            delete: DeleteUser::new(Arc::clone(&repository), notifier),
            search: SearchUsers::new(repository),
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> UserResult<User> {
        self.create.execute(request).await
    }

    pub async fn update_user(&self, request: UpdateUserRequest) -> UserResult<User> {
        self.update.execute(request).await
    }

    pub async fn delete_user(&self, request: DeleteUserRequest) -> UserResult<User> {
        self.delete.execute(request).await
    }

    pub async fn search_users(&self, request: SearchUsersRequest) -> UserResult<Vec<User>> {
        self.search.execute(request).await
    }
}
