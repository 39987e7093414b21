//! HTTPS client for the Bot API

use super::types::{
    AnswerCallbackQueryRequest, ApiResponse, GetUpdatesRequest, InlineKeyboardMarkup,
    SendMessageRequest, Update,
};
use super::TelegramError;
use crate::keyboard::Keyboard;
use crate::state_machine::ChatId;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Slack on top of the long-poll timeout before the HTTP request gives up
const REQUEST_SLACK: Duration = Duration::from_secs(10);

/// Bot API client bound to one bot token
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout + REQUEST_SLACK)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    /// Long-poll for updates newer than `offset`
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message", "callback_query"],
        };
        self.call("getUpdates", &request).await
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup: keyboard.map(|k| InlineKeyboardMarkup {
                inline_keyboard: &k.rows,
            }),
        };
        // The sent Message object is of no interest
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }

    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<(), TelegramError> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id: callback_id,
        };
        let _: bool = self.call("answerCallbackQuery", &request).await?;
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_response(status, &body)
    }
}

/// Unwrap the `{ok, result}` envelope, classifying failures
fn decode_response<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<T, TelegramError> {
    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(TelegramError::Decode(e.to_string())),
        Err(_) => {
            return Err(TelegramError::api(
                i64::from(status.as_u16()),
                format!("HTTP {status}"),
            ))
        }
    };

    if !envelope.ok {
        return Err(TelegramError::api(
            envelope
                .error_code
                .unwrap_or_else(|| i64::from(status.as_u16())),
            envelope.description.unwrap_or_default(),
        ));
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::Decode("missing result".to_string()))
}
