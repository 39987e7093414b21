//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::keyboard::Keyboard;
use crate::state_machine::ChatId;
use crate::telegram::{TelegramClient, TelegramError};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound side of the messaging platform
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a plain text message
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError>;

    /// Send a message with an inline keyboard
    async fn send_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError>;

    /// Acknowledge a selection event so the platform stops waiting on it
    async fn acknowledge(&self, callback_id: &str) -> Result<(), TelegramError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        (**self).send_text(chat_id, text).await
    }

    async fn send_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        (**self).send_keyboard(chat_id, text, keyboard).await
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TelegramError> {
        (**self).acknowledge(callback_id).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        self.send_message(chat_id, text, None).await
    }

    async fn send_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        self.send_message(chat_id, text, Some(keyboard)).await
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.answer_callback_query(callback_id).await
    }
}
