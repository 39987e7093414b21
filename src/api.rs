//! HTTP liveness surface
//!
//! Not part of the conversation itself: it answers hosting-platform health
//! checks and the bot's own keepalive pings.

mod handlers;

pub use handlers::create_router;

use crate::session::SessionStore;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }
}
