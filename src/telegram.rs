//! Telegram Bot API transport
//!
//! A thin HTTPS client for the handful of Bot API methods the bot needs, and
//! the long-poll loop that turns updates into inbound events.

mod client;
mod error;
mod poller;
mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use poller::UpdatePoller;
pub use types::*;
