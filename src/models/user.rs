//! User domain models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User record (`users` table)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

/// Public view of a user; never carries the hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Register / login request body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(default, deserialize_with = "super::null_as_empty")]
    #[validate(length(min = 1, max = 255, message = "Username and password are required"))]
    pub username: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    #[validate(length(min = 1, message = "Username and password are required"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}
