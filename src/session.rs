//! In-memory session storage
//!
//! The store exclusively owns every session. Callers receive clones and hand
//! updated copies back; nothing outlives a process restart.

use crate::state_machine::{ChatId, Session};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage for per-chat form sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create or overwrite the session for `chat_id` in its initial state
    async fn start(&self, chat_id: ChatId) -> Session;

    /// Current session, if any
    async fn get(&self, chat_id: ChatId) -> Option<Session>;

    /// Replace the stored session
    async fn save(&self, chat_id: ChatId, session: Session);

    /// Remove the session, returning what was stored
    async fn end(&self, chat_id: ChatId) -> Option<Session>;

    /// Number of live sessions
    async fn len(&self) -> usize;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn start(&self, chat_id: ChatId) -> Session {
        (**self).start(chat_id).await
    }

    async fn get(&self, chat_id: ChatId) -> Option<Session> {
        (**self).get(chat_id).await
    }

    async fn save(&self, chat_id: ChatId, session: Session) {
        (**self).save(chat_id, session).await;
    }

    async fn end(&self, chat_id: ChatId) -> Option<Session> {
        (**self).end(chat_id).await
    }

    async fn len(&self) -> usize {
        (**self).len().await
    }
}

/// Process-local store; sessions never expire
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<ChatId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn start(&self, chat_id: ChatId) -> Session {
        let session = Session::new();
        let previous = self
            .sessions
            .write()
            .await
            .insert(chat_id, session.clone());
        if previous.is_some() {
            tracing::debug!(chat_id, "Discarding previous session");
        }
        session
    }

    async fn get(&self, chat_id: ChatId) -> Option<Session> {
        self.sessions.read().await.get(&chat_id).cloned()
    }

    async fn save(&self, chat_id: ChatId, session: Session) {
        self.sessions.write().await.insert(chat_id, session);
    }

    async fn end(&self, chat_id: ChatId) -> Option<Session> {
        self.sessions.write().await.remove(&chat_id)
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
