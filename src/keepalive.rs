//! Periodic self-ping
//!
//! Some hosting platforms idle a service that sees no HTTP traffic; hitting
//! our own health surface on a fixed interval keeps the process awake.

use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Ping `url` every `interval` until cancelled. Failures are only logged.
pub async fn run(url: String, interval: Duration, cancel: CancellationToken) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create keepalive client");
            return;
        }
    };

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the first ping is due after one interval
    ticker.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match client.get(&url).send().await {
            Ok(response) => tracing::info!(status = response.status().as_u16(), "Self-ping"),
            Err(e) => tracing::warn!(error = %e, "Self-ping failed"),
        }
    }

    tracing::debug!("Keepalive stopped");
}
