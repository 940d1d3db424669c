use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use axum_extra::extract::Query;
use axum_helpers::ErrorBody;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::hasher::PasswordHasher;
use crate::models::{
    CreateUserRequest, DeleteUserRequest, SearchUsersRequest, UpdateUserRequest, User,
    UserEnvelope, UsersEnvelope,
};
use crate::notifier::ChangeNotifier;
use crate::repository::UserRepository;
use crate::service::UserService;

const TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(create_user, update_user, delete_user, search_users),
    components(schemas(
        User,
        UserEnvelope,
        UsersEnvelope,
        CreateUserRequest,
        UpdateUserRequest,
        DeleteUserRequest,
        ErrorBody
    )),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R, N, H>(service: UserService<R, N, H>) -> Router
where
    R: UserRepository + 'static,
    N: ChangeNotifier + 'static,
    H: PasswordHasher + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/v1/user",
            post(create_user::<R, N, H>)
                .put(update_user::<R, N, H>)
                .delete(delete_user::<R, N, H>),
        )
        .route("/v1/users", get(search_users::<R, N, H>))
        .with_state(shared_service)
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/v1/user",
    tag = TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserEnvelope),
        (status = 400, description = "Invalid user", body = ErrorBody),
        (status = 500, description = "Email already used or internal error", body = ErrorBody)
    )
)]
async fn create_user<R, N, H>(
    State(service): State<Arc<UserService<R, N, H>>>,
    Json(request): Json<CreateUserRequest>,
) -> UserResult<Json<UserEnvelope>>
where
    R: UserRepository,
    N: ChangeNotifier + 'static,
    H: PasswordHasher,
{
    let user = service.create_user(request).await?;
    Ok(Json(UserEnvelope { user }))
}

/// Update the provided fields of a user
#[utoipa::path(
    put,
    path = "/v1/user",
    tag = TAG,
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserEnvelope),
        (status = 400, description = "Invalid user", body = ErrorBody),
        (status = 500, description = "Unknown user, email already used or internal error", body = ErrorBody)
    )
)]
async fn update_user<R, N, H>(
    State(service): State<Arc<UserService<R, N, H>>>,
    Json(request): Json<UpdateUserRequest>,
) -> UserResult<Json<UserEnvelope>>
where
    R: UserRepository,
    N: ChangeNotifier + 'static,
    H: PasswordHasher,
{
    let user = service
        .update_user(request)
        .await
        .map_err(UserError::not_found_as_internal)?;
    Ok(Json(UserEnvelope { user }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/v1/user",
    tag = TAG,
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "User deleted", body = UserEnvelope),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
async fn delete_user<R, N, H>(
    State(service): State<Arc<UserService<R, N, H>>>,
    Json(request): Json<DeleteUserRequest>,
) -> UserResult<Json<UserEnvelope>>
where
    R: UserRepository,
    N: ChangeNotifier + 'static,
    H: PasswordHasher,
{
    let user = service.delete_user(request).await?;
    Ok(Json(UserEnvelope { user }))
}

/// Search users; a user is returned when any parameter value matches.
///
/// Without parameters the result is empty.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = TAG,
    params(SearchUsersRequest),
    responses(
        (status = 200, description = "Matching users", body = UsersEnvelope)
    )
)]
async fn search_users<R, N, H>(
    State(service): State<Arc<UserService<R, N, H>>>,
    Query(request): Query<SearchUsersRequest>,
) -> UserResult<Json<UsersEnvelope>>
where
    R: UserRepository,
    N: ChangeNotifier + 'static,
    H: PasswordHasher,
{
    let users = service.search_users(request).await?;
    Ok(Json(UsersEnvelope { users }))
}
