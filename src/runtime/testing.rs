//! Mock implementations for testing
//!
//! These mocks enable runtime tests without a real Bot API.

use super::traits::Messenger;
use crate::keyboard::Keyboard;
use crate::state_machine::ChatId;
use crate::taxonomy::{BaseEmotion, EmotionCatalog};
use crate::telegram::TelegramError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Small catalog shared by runtime tests
pub fn test_catalog() -> EmotionCatalog {
    EmotionCatalog::new(vec![
        BaseEmotion::new("Joy", &["Delight", "Pride", "Relief"]),
        BaseEmotion::new("Sadness", &["Disappointment", "Grief", "Loneliness"]),
    ])
    .unwrap()
}

/// A message the mock delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// Mock messenger recording successful deliveries and acknowledgments
#[allow(dead_code)]
#[derive(Default)]
pub struct MockMessenger {
    sent: Mutex<Vec<SentMessage>>,
    acks: Mutex<Vec<String>>,
    fail_sends: AtomicBool,
    fail_acks: AtomicBool,
    ack_delay: Mutex<Option<Duration>>,
    stalled_chat: Mutex<Option<ChatId>>,
}

#[allow(dead_code)]
impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send fail until switched off again
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_acks(&self, fail: bool) {
        self.fail_acks.store(fail, Ordering::SeqCst);
    }

    /// Delay acknowledgments, to exercise the deadline
    pub fn delay_acks(&self, delay: Duration) {
        *self.ack_delay.lock().unwrap() = Some(delay);
    }

    /// Make every send to `chat_id` hang forever
    pub fn stall_sends(&self, chat_id: ChatId) {
        *self.stalled_chat.lock().unwrap() = Some(chat_id);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self, chat_id: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.text)
            .collect()
    }

    /// Last keyboard shown in a chat
    pub fn last_keyboard(&self, chat_id: ChatId) -> Option<Keyboard> {
        self.sent()
            .into_iter()
            .rev()
            .filter(|m| m.chat_id == chat_id)
            .find_map(|m| m.keyboard)
    }

    pub fn acks(&self) -> Vec<String> {
        self.acks.lock().unwrap().clone()
    }

    async fn stall_if_requested(&self, chat_id: ChatId) {
        let stalled = *self.stalled_chat.lock().unwrap() == Some(chat_id);
        if stalled {
            std::future::pending::<()>().await;
        }
    }

    fn record(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TelegramError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TelegramError::Network("mock send failure".to_string()));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), TelegramError> {
        self.stall_if_requested(chat_id).await;
        self.record(chat_id, text, None)
    }

    async fn send_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), TelegramError> {
        self.stall_if_requested(chat_id).await;
        self.record(chat_id, text, Some(keyboard))
    }

    async fn acknowledge(&self, callback_id: &str) -> Result<(), TelegramError> {
        let delay = *self.ack_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_acks.load(Ordering::SeqCst) {
            return Err(TelegramError::api(400, "query is too old"));
        }
        self.acks.lock().unwrap().push(callback_id.to_string());
        Ok(())
    }
}

/// Poll `cond` until it holds, failing the test after two seconds
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
