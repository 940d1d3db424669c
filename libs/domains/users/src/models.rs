use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::{
    validate_email, validate_first_name, validate_last_name, validate_nick_name,
};

/// User entity as held by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Opaque identifier assigned by the repository, immutable
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nick_name: String,
    /// Unique across the store
    pub email: String,
    /// Hash of the password, never the raw secret
    #[serde(rename = "password")]
    pub password_hash: String,
    pub country: String,
}

/// A user about to be stored; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub nick_name: String,
    pub email: String,
    pub password_hash: String,
    pub country: String,
}

impl NewUser {
    pub(crate) fn into_user(self, id: String) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            nick_name: self.nick_name,
            email: self.email,
            password_hash: self.password_hash,
            country: self.country,
        }
    }
}

/// Partial update of a stored user.
///
/// `None` and `Some("")` both leave the stored field untouched, so a field
/// can never be cleared through an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nick_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub country: Option<String>,
}

impl UserChanges {
    /// New email, if the update actually changes it
    pub(crate) fn email_change<'a>(&'a self, current: &str) -> Option<&'a str> {
        provided(&self.email).filter(|email| *email != current)
    }

    /// Copy of `user` with every provided field overwritten
    pub(crate) fn apply_to(&self, user: &User) -> User {
        let mut updated = user.clone();
        overwrite(&mut updated.first_name, &self.first_name);
        overwrite(&mut updated.last_name, &self.last_name);
        overwrite(&mut updated.nick_name, &self.nick_name);
        overwrite(&mut updated.email, &self.email);
        overwrite(&mut updated.password_hash, &self.password_hash);
        overwrite(&mut updated.country, &self.country);
        updated
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn overwrite(field: &mut String, value: &Option<String>) {
    if let Some(v) = provided(value) {
        *field = v.to_string();
    }
}

/// State of a user on both sides of an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub before: User,
    pub after: User,
}

/// Kind of change carried by a [`ChangeEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Fact emitted after each change of the user base.
///
/// - create: only `after`
/// - update: `before` and `after`
/// - delete: only `before`, the removed record
///
/// No ordering is guaranteed between events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub before: Option<User>,
    pub after: Option<User>,
}

impl ChangeEvent {
    pub fn created(user: User) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            before: None,
            after: Some(user),
        }
    }

    pub fn updated(revision: Revision) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            before: Some(revision.before),
            after: Some(revision.after),
        }
    }

    pub fn deleted(user: User) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            before: Some(user),
            after: None,
        }
    }

    /// Id of the user the event is about
    pub fn user_id(&self) -> &str {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .map(|u| u.id.as_str())
            .unwrap_or_default()
    }
}

/// Body of `POST /v1/user`
///
/// Missing fields default to empty strings and fail validation instead of
/// being rejected by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: String,
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: String,
    #[validate(custom(function = "validate_nick_name"))]
    pub nick_name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    pub country: String,
    /// Raw password, hashed before storage
    pub password: String,
}

/// Body of `PUT /v1/user`
///
/// Absent or empty fields mean "no change".
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub id: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_first_name"))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_last_name"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_nick_name"))]
    pub nick_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(custom(function = "validate_email"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub country: Option<String>,
}

impl UpdateUserRequest {
    /// Turns `Some("")` into `None` so empty fields are neither validated
    /// nor applied.
    pub fn without_empty_fields(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            id: self.id,
            first_name: keep(self.first_name),
            last_name: keep(self.last_name),
            nick_name: keep(self.nick_name),
            email: keep(self.email),
            password: keep(self.password),
            country: keep(self.country),
        }
    }
}

/// Body of `DELETE /v1/user`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    pub id: String,
}

/// Query string of `GET /v1/users`; every parameter may repeat.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct SearchUsersRequest {
    pub id: Vec<String>,
    pub email: Vec<String>,
    pub first_name: Vec<String>,
    pub last_name: Vec<String>,
    pub nick_name: Vec<String>,
    pub country: Vec<String>,
}

/// `{ "user": ... }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEnvelope {
    pub user: User,
}

/// `{ "users": [...] }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersEnvelope {
    pub users: Vec<User>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}
