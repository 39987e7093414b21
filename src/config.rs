//! Process configuration, read from the environment

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 666;
pub const DEFAULT_EMOTIONS_PATH: &str = "./emotion.json";
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Server-side long-poll wait per `getUpdates` call
pub const POLL_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause between polling rounds
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);
/// Self-ping period
pub const SELF_PING_INTERVAL: Duration = Duration::from_secs(240);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TOKEN is not set")]
    MissingToken,
    #[error("PORT is not a valid port number: {0:?}")]
    InvalidPort(String),
}

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub port: u16,
    pub emotions_path: PathBuf,
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            _ => DEFAULT_PORT,
        };

        Ok(Self {
            token,
            port,
            emotions_path: lookup("EMOTIONS_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_EMOTIONS_PATH), PathBuf::from),
            api_url: lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("port", &self.port)
            .field("emotions_path", &self.emotions_path)
            .field("api_url", &self.api_url)
            .finish()
    }
}
