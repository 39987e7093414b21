//! Long-poll update source

use super::{TelegramClient, Update};
use crate::runtime::InboundEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Pulls updates with `getUpdates` and forwards them as inbound events
pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    interval: Duration,
    timeout: Duration,
    offset: i64,
}

impl UpdatePoller {
    pub fn new(client: Arc<TelegramClient>, interval: Duration, timeout: Duration) -> Self {
        Self {
            client,
            interval,
            timeout,
            offset: 0,
        }
    }

    /// Poll until cancelled or until the receiving side goes away
    pub async fn run(mut self, sink: mpsc::Sender<InboundEvent>, cancel: CancellationToken) {
        tracing::info!(
            interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            timeout_s = self.timeout.as_secs(),
            "Polling for updates"
        );

        loop {
            let round = tokio::select! {
                () = cancel.cancelled() => break,
                round = self.client.get_updates(self.offset, self.timeout) => round,
            };

            match round {
                Ok(updates) => {
                    for update in updates {
                        self.offset = self.offset.max(update.update_id + 1);
                        let Some(event) = into_inbound(update) else {
                            continue;
                        };
                        if sink.send(event).await.is_err() {
                            tracing::warn!("Dispatcher gone, stopping update polling");
                            return;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Polling for updates failed");
                    // Back off one extra interval before trying again
                    tokio::time::sleep(self.interval).await;
                }
            }

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Update polling stopped");
    }
}

/// Map a raw update to an inbound event; `None` for updates the bot ignores
pub fn into_inbound(update: Update) -> Option<InboundEvent> {
    if let Some(query) = update.callback_query {
        return Some(InboundEvent::Selection {
            chat_id: query.message.map(|m| m.chat.id),
            callback_id: query.id,
            payload: query.data,
        });
    }

    let message = update.message?;
    let text = message.text?;
    Some(InboundEvent::Text {
        chat_id: message.chat.id,
        text,
    })
}
