//! Command-line and environment configuration for the `todo` binary.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no user id configured; pass --user-id or set TODO_USER_ID")]
    MissingUserId,

    #[error("base url `{0}` must start with http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todo", about = "Terminal client for the todo API")]
pub struct Config {
    /// Root URL of the todo API.
    #[arg(long, env = "TODO_API_URL", default_value = "http://127.0.0.1:3000")]
    pub base_url: String,

    /// Owner of the todos shown in this session.
    #[arg(long, env = "TODO_USER_ID", default_value_t = 0)]
    pub user_id: u64,

    /// How long an error message stays on screen.
    #[arg(long, env = "TODO_DISMISS_AFTER_MS", default_value_t = 3000)]
    pub dismiss_after_ms: u64,

    #[arg(long, env = "TODO_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    pub request_timeout_ms: u64,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_id == 0 {
            return Err(ConfigError::MissingUserId);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(())
    }

    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
