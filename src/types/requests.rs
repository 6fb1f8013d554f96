use crate::db::models::{Role, User, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPayload {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemPayload {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemPayload {
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// User record as exposed over HTTP; the password never leaves the store.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
        }
    }
}
