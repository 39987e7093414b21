//! Per-chat runtime executor

use super::traits::Messenger;
use super::RuntimeRegistry;
use crate::session::SessionStore;
use crate::state_machine::{transition, ChatId, Effect, Event, Session};
use crate::taxonomy::EmotionCatalog;
use crate::telegram::TelegramError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Applies one chat's events strictly in arrival order
pub struct ChatRuntime<S, M>
where
    S: SessionStore + 'static,
    M: Messenger + 'static,
{
    chat_id: ChatId,
    catalog: Arc<EmotionCatalog>,
    store: Arc<S>,
    messenger: Arc<M>,
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl<S, M> ChatRuntime<S, M>
where
    S: SessionStore + 'static,
    M: Messenger + 'static,
{
    pub fn new(
        chat_id: ChatId,
        catalog: Arc<EmotionCatalog>,
        store: Arc<S>,
        messenger: Arc<M>,
        event_rx: mpsc::UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            chat_id,
            catalog,
            store,
            messenger,
            event_rx,
        }
    }

    /// Process events until the chat has no session and nothing queued
    pub async fn run(mut self, registry: Arc<RuntimeRegistry>) {
        tracing::debug!(chat_id = self.chat_id, "Starting chat runtime");

        let mut next = self.event_rx.recv().await;
        while let Some(event) = next {
            self.process_event(event).await;
            next = if self.store.get(self.chat_id).await.is_some() {
                self.event_rx.recv().await
            } else {
                self.retire(&registry).await
            };
        }

        tracing::debug!(chat_id = self.chat_id, "Chat runtime stopped");
    }

    /// Deregister this runtime unless an event is already waiting, which is
    /// returned instead. Holding the write lock keeps senders out meanwhile.
    async fn retire(&mut self, registry: &RuntimeRegistry) -> Option<Event> {
        let mut runtimes = registry.write().await;
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(_) => {
                runtimes.remove(&self.chat_id);
                None
            }
        }
    }

    /// Run one event through the state machine and carry out its effects
    ///
    /// Effects run in order. A failed send is logged and the remaining effects
    /// still run; session writes already made are kept.
    pub(crate) async fn process_event(&self, event: Event) {
        let kind = event.kind();
        let current = self.store.get(self.chat_id).await;

        let result = match transition(current.as_ref(), &self.catalog, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    chat_id = self.chat_id,
                    event = kind,
                    reason = %e,
                    "Event dropped"
                );
                return;
            }
        };

        if let Some(session) = &result.new_session {
            tracing::debug!(
                chat_id = self.chat_id,
                event = kind,
                step = %session.step,
                "Transition"
            );
        }

        for effect in result.effects {
            if let Err(e) = self.execute_effect(effect, result.new_session.as_ref()).await {
                tracing::error!(chat_id = self.chat_id, error = %e, "Failed to deliver message");
            }
        }
    }

    async fn execute_effect(
        &self,
        effect: Effect,
        session: Option<&Session>,
    ) -> Result<(), TelegramError> {
        match effect {
            Effect::StartSession => {
                self.store.start(self.chat_id).await;
                tracing::info!(chat_id = self.chat_id, "Session started");
                Ok(())
            }
            Effect::PersistSession => {
                if let Some(session) = session {
                    self.store.save(self.chat_id, session.clone()).await;
                }
                Ok(())
            }
            Effect::EndSession => {
                self.store.end(self.chat_id).await;
                tracing::info!(chat_id = self.chat_id, "Session completed");
                Ok(())
            }
            Effect::SendText { text } => self.messenger.send_text(self.chat_id, &text).await,
            Effect::SendKeyboard { text, keyboard } => {
                self.messenger
                    .send_keyboard(self.chat_id, &text, &keyboard)
                    .await
            }
        }
    }
}
