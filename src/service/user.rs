use crate::db::models::{Role, User, UserId};
use crate::db::store::TodoStore;
use crate::error::HubError;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

/// Credential validation and registration against the store's user table.
#[derive(Clone)]
pub struct UserService {
    store: Arc<TodoStore>,
}

impl UserService {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }

    /// Linear scan for an exact username and password match.
    pub fn login(&self, username: &str, password: &str) -> Result<User, HubError> {
        if username.is_empty() || password.is_empty() {
            return Err(HubError::invalid_input("username and password are required"));
        }

        let matched = self.store.get_users()?.into_iter().find(|u| {
            u.username == username && bool::from(u.password.as_bytes().ct_eq(password.as_bytes()))
        });

        match matched {
            Some(user) => {
                info!(user_id = user.id, role = %user.role, "login succeeded");
                Ok(user)
            }
            None => {
                warn!(username, "login rejected");
                Err(HubError::InvalidCredentials)
            }
        }
    }

    /// Appends `user` without any uniqueness check. Returns it with its assigned ID.
    pub fn register(&self, user: User) -> Result<User, HubError> {
        let user = self.store.add_user(user)?;
        info!(user_id = user.id, username = %user.username, role = %user.role, "user registered");
        Ok(user)
    }

    /// Appends `user` only if no stored user has the same username.
    pub fn register_unique(&self, user: User) -> Result<User, HubError> {
        let user = self.store.add_unique_user(user)?;
        info!(user_id = user.id, username = %user.username, role = %user.role, "user registered");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, HubError> {
        self.store
            .get_users()?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or(HubError::NotFound("user"))
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, HubError> {
        Ok(self
            .store
            .get_users()?
            .into_iter()
            .find(|u| u.username == username))
    }

    /// Registers an admin account unless a user with that name already exists.
    pub fn ensure_admin(&self, username: &str, password: &str) -> Result<User, HubError> {
        if username.is_empty() || password.is_empty() {
            return Err(HubError::invalid_input("admin username and password are required"));
        }
        if let Some(existing) = self.find_by_username(username)? {
            if !existing.role.is_admin() {
                warn!(username, "bootstrap admin name is taken by a non-admin user");
            }
            return Ok(existing);
        }
        self.register(User {
            id: 0,
            username: username.to_string(),
            password: password.to_string(),
            role: Role::Admin,
        })
    }
}
