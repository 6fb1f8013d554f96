use crate::db::models::{Role, User, UserId};
use crate::error::HubError;
use crate::types::Caller;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// In-memory bearer token registry. Tokens do not survive a restart.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a fresh opaque token for an authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, HubError> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| HubError::Config("session ttl overflows the clock".to_string()))?;
        let token = Uuid::new_v4().simple().to_string();
        let session = Session {
            user_id: user.id,
            role: user.role,
            expires_at,
        };
        self.sessions
            .write()
            .map_err(|_| HubError::LockPoisoned)?
            .insert(token.clone(), session);
        debug!(user_id = user.id, "session issued");
        Ok(token)
    }

    /// Resolve a token to the caller identity; expired tokens are evicted.
    pub fn verify(&self, token: &str) -> Result<Caller, HubError> {
        let session = self
            .sessions
            .read()
            .map_err(|_| HubError::LockPoisoned)?
            .get(token)
            .cloned()
            .ok_or(HubError::Unauthorized)?;

        if session.expires_at <= Utc::now() {
            self.revoke(token)?;
            return Err(HubError::Unauthorized);
        }
        Ok(Caller::new(session.user_id, session.role))
    }

    pub fn revoke(&self, token: &str) -> Result<bool, HubError> {
        Ok(self
            .sessions
            .write()
            .map_err(|_| HubError::LockPoisoned)?
            .remove(token)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId, role: Role) -> User {
        User {
            id,
            username: format!("u{id}"),
            password: "pw".to_string(),
            role,
        }
    }

    #[test]
    fn issued_token_resolves_to_caller() {
        let registry = SessionRegistry::new(Duration::hours(1));
        let token = registry.issue(&user(3, Role::Admin)).unwrap();
        assert_eq!(registry.verify(&token).unwrap(), Caller::new(3, Role::Admin));
        assert!(matches!(registry.verify("bogus"), Err(HubError::Unauthorized)));
    }

    #[test]
    fn expired_tokens_are_rejected_and_evicted() {
        let registry = SessionRegistry::new(Duration::seconds(-1));
        let token = registry.issue(&user(1, Role::Member)).unwrap();
        assert!(matches!(registry.verify(&token), Err(HubError::Unauthorized)));
        assert!(!registry.revoke(&token).unwrap());
    }

    #[test]
    fn overflowing_ttl_is_an_error_not_a_panic() {
        let registry = SessionRegistry::new(Duration::MAX);
        assert!(matches!(
            registry.issue(&user(1, Role::Member)),
            Err(HubError::Config(_))
        ));
    }

    #[test]
    fn revoked_tokens_stop_working() {
        let registry = SessionRegistry::new(Duration::hours(1));
        let token = registry.issue(&user(1, Role::Member)).unwrap();
        assert!(registry.revoke(&token).unwrap());
        assert!(matches!(registry.verify(&token), Err(HubError::Unauthorized)));
    }
}
