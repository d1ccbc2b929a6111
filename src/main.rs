//! jaseats-client event monitor entry point.
//!
//! Connects the realtime dispatcher against the configured backend and
//! logs every classified event. Useful as a smoke client for backend
//! development; the real shells embed the library directly.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use jaseats_client::api::ApiClient;
use jaseats_client::config::ClientConfig;
use jaseats_client::persistence::SqliteStore;
use jaseats_client::realtime::{Channel, RealtimeDispatcher};
use jaseats_client::session::SessionContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = ClientConfig::from_env();
    tracing::info!(api = %config.api_base_url, ws = %config.ws_url, "starting jaseats-client monitor");

    // Rehydrate the session from durable storage
    let store = Arc::new(SqliteStore::open(&config.store_path).await?);
    let session = SessionContext::new(store);
    session.load().await?;
    tracing::info!(
        authenticated = session.is_authenticated().await,
        "session loaded"
    );

    // Build the API client (kept alive so a future login can reuse it)
    let api = ApiClient::new(&config, session.clone())?;
    tracing::debug!(base_url = api.base_url(), "api client ready");

    // Connect the realtime dispatcher and watch every channel
    let dispatcher = RealtimeDispatcher::new(config.channel_capacity);
    let mut lifecycle = dispatcher.subscribe_lifecycle();
    let mut receivers: Vec<_> = Channel::ALL
        .into_iter()
        .map(|channel| (channel, dispatcher.subscribe(channel)))
        .collect();

    dispatcher.connect(&config.ws_url).await?;

    loop {
        tokio::select! {
            notification = lifecycle.recv() => {
                match notification {
                    Ok(notification) => tracing::info!(?notification, "lifecycle"),
                    Err(_) => break,
                }
            }
            event = next_event(&mut receivers) => {
                let Some((channel, event)) = event else { break };
                tracing::info!(channel = channel.as_str(), tag = %event.tag, payload = %event.payload, "event");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                dispatcher.disconnect().await;
                break;
            }
        }
    }

    Ok(())
}

/// Awaits the next event across all channel receivers.
///
/// A lagging receiver drops its oldest events and keeps going; only a
/// closed channel ends the stream.
async fn next_event(
    receivers: &mut [(
        Channel,
        tokio::sync::broadcast::Receiver<jaseats_client::realtime::InboundEvent>,
    )],
) -> Option<(Channel, jaseats_client::realtime::InboundEvent)> {
    loop {
        let futures = receivers.iter_mut().map(|(channel, receiver)| {
            let channel = *channel;
            Box::pin(async move { (channel, receiver.recv().await) })
        });
        let ((channel, result), _, _) = futures_util::future::select_all(futures).await;
        match result {
            Ok(event) => return Some((channel, event)),
            Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, channel = channel.as_str(), "monitor lagged behind");
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => return None,
        }
    }
}
