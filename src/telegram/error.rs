//! Transport error types

use thiserror::Error;

/// Failure talking to the Bot API
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Connection problems, reset streams, unreadable bodies
    #[error("network error: {0}")]
    Network(String),
    /// The request did not complete in time
    #[error("request timed out")]
    Timeout,
    /// The API answered with `ok: false` or a non-success status
    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },
    /// The response was not the shape we expected
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl TelegramError {
    pub fn api(code: i64, description: impl Into<String>) -> Self {
        Self::Api {
            code,
            description: description.into(),
        }
    }
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL embeds the bot token; never let it reach a log line
        let e = e.without_url();
        if e.is_timeout() {
            TelegramError::Timeout
        } else if e.is_decode() {
            TelegramError::Decode(e.to_string())
        } else {
            TelegramError::Network(e.to_string())
        }
    }
}
