use chrono::TimeDelta;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::HubError;

pub const ENV_PREFIX: &str = "TODO_HUB_";

/// Upper bound for `session_ttl_secs`: one year.
pub const MAX_SESSION_TTL_SECS: i64 = 366 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub data_path: PathBuf,
    pub loglevel: String,
    pub session_ttl_secs: i64,
    pub login_per_minute: u32,
    /// Bootstrap admin account, created on startup when both are set.
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_path: PathBuf::from("data/store.json"),
            loglevel: "info".to_string(),
            session_ttl_secs: 24 * 60 * 60,
            login_per_minute: 30,
            admin_username: None,
            admin_password: None,
        }
    }
}

impl Config {
    /// Defaults overridden by `TODO_HUB_*` environment variables, then validated.
    pub fn load() -> Result<Self, HubError> {
        let cfg: Config = Self::figment().extract()?;
        cfg.session_ttl()?;
        Ok(cfg)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    /// Session lifetime; must be positive and at most `MAX_SESSION_TTL_SECS`.
    pub fn session_ttl(&self) -> Result<TimeDelta, HubError> {
        let secs = self.session_ttl_secs;
        if !(1..=MAX_SESSION_TTL_SECS).contains(&secs) {
            return Err(HubError::Config(format!(
                "session_ttl_secs must be between 1 and {MAX_SESSION_TTL_SECS}, got {secs}"
            )));
        }
        TimeDelta::try_seconds(secs)
            .ok_or_else(|| HubError::Config(format!("session_ttl_secs {secs} is out of range")))
    }

    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_username.as_deref(), self.admin_password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}
