//! Runtime for executing conversations
//!
//! Inbound events are routed to one [`ChatRuntime`] task per chat, so a
//! chat's events are applied one at a time while different chats proceed
//! concurrently. Selection events are acknowledged before anything else
//! happens to them.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
pub use traits::*;

use crate::keyboard::Selection;
use crate::session::SessionStore;
use crate::state_machine::{ChatId, Event};
use crate::taxonomy::EmotionCatalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

/// Platform-side wait before an unanswered selection is abandoned is ~30 s;
/// we give up on our acknowledgment well before that.
pub const ACK_DEADLINE: Duration = Duration::from_secs(5);

/// Live chat runtimes by chat, shared with the runtimes so they can retire
pub(crate) type RuntimeRegistry = RwLock<HashMap<ChatId, mpsc::UnboundedSender<Event>>>;

/// An event as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Text {
        chat_id: ChatId,
        text: String,
    },
    Selection {
        /// Missing when the platform no longer knows the originating message
        chat_id: Option<ChatId>,
        callback_id: String,
        payload: Option<String>,
    },
}

/// Manager for all chat runtimes
pub struct RuntimeManager<S, M>
where
    S: SessionStore + 'static,
    M: Messenger + 'static,
{
    catalog: Arc<EmotionCatalog>,
    store: Arc<S>,
    messenger: Arc<M>,
    ack_deadline: Duration,
    runtimes: Arc<RuntimeRegistry>,
}

impl<S, M> RuntimeManager<S, M>
where
    S: SessionStore + 'static,
    M: Messenger + 'static,
{
    pub fn new(catalog: Arc<EmotionCatalog>, store: Arc<S>, messenger: Arc<M>) -> Self {
        Self {
            catalog,
            store,
            messenger,
            ack_deadline: ACK_DEADLINE,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    pub fn with_ack_deadline(mut self, deadline: Duration) -> Self {
        self.ack_deadline = deadline;
        self
    }

    /// Dispatch inbound events until the transport closes the channel
    pub async fn run(self: Arc<Self>, mut inbound_rx: mpsc::Receiver<InboundEvent>) {
        tracing::info!("Dispatcher started");
        while let Some(inbound) = inbound_rx.recv().await {
            self.dispatch(inbound).await;
        }
        tracing::info!("Dispatcher stopped");
    }

    /// Route one inbound event
    ///
    /// Text goes straight to the chat's queue so arrival order is kept.
    /// Chat queues are unbounded, so a chat whose runtime is stuck on a slow
    /// send never holds up the dispatcher. Selections are handed to a
    /// detached task that acknowledges first and only then forwards.
    pub async fn dispatch(self: &Arc<Self>, inbound: InboundEvent) {
        match inbound {
            InboundEvent::Text { chat_id, text } => {
                let event = if text.trim() == "/start" {
                    Event::Start
                } else {
                    Event::Text { text }
                };
                self.send_event(chat_id, event).await;
            }
            InboundEvent::Selection {
                chat_id,
                callback_id,
                payload,
            } => {
                let manager = Arc::clone(self);
                tokio::spawn(async move {
                    manager
                        .handle_selection(chat_id, &callback_id, payload.as_deref())
                        .await;
                });
            }
        }
    }

    async fn handle_selection(
        &self,
        chat_id: Option<ChatId>,
        callback_id: &str,
        payload: Option<&str>,
    ) {
        let ack = self.messenger.acknowledge(callback_id);
        match tokio::time::timeout(self.ack_deadline, ack).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(callback_id, error = %e, "Failed to acknowledge selection");
                return;
            }
            Err(_) => {
                tracing::error!(callback_id, "Acknowledgment deadline exceeded");
                return;
            }
        }

        let Some(chat_id) = chat_id else {
            tracing::debug!(callback_id, "Selection without originating chat dropped");
            return;
        };
        let Some(selection) = payload.and_then(Selection::parse) else {
            tracing::debug!(chat_id, ?payload, "Malformed selection payload dropped");
            return;
        };

        self.send_event(chat_id, Event::Select(selection)).await;
    }

    /// Queue an event on the chat's runtime, starting one if needed
    ///
    /// Sends happen under the registry lock, which a runtime also takes
    /// before it retires, so an event is never queued on a runtime that has
    /// already decided to exit.
    pub async fn send_event(&self, chat_id: ChatId, event: Event) {
        let event = {
            let runtimes = self.runtimes.read().await;
            match runtimes.get(&chat_id) {
                Some(tx) => match tx.send(event) {
                    Ok(()) => return,
                    Err(mpsc::error::SendError(event)) => event,
                },
                None => event,
            }
        };

        let mut runtimes = self.runtimes.write().await;
        // Another task may have started a runtime while we waited for the lock
        let event = match runtimes.get(&chat_id) {
            Some(tx) => match tx.send(event) {
                Ok(()) => return,
                Err(mpsc::error::SendError(event)) => {
                    // The runtime task died (a panic inside a handler); replace it
                    tracing::warn!(chat_id, "Chat runtime gone, restarting it");
                    event
                }
            },
            None => event,
        };

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let runtime = ChatRuntime::new(
            chat_id,
            self.catalog.clone(),
            self.store.clone(),
            self.messenger.clone(),
            event_rx,
        );
        tokio::spawn(runtime.run(Arc::clone(&self.runtimes)));

        if event_tx.send(event).is_err() {
            tracing::error!(chat_id, "Failed to queue event for chat runtime");
        }
        runtimes.insert(chat_id, event_tx);
    }

    #[cfg(test)]
    pub async fn runtime_count(&self) -> usize {
        self.runtimes.read().await.len()
    }
}
