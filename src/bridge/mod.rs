//! Privileged-process capability surface.
//!
//! On the desktop shell, an isolated privileged process exposes three
//! capability groups to the UI process: durable key/value store
//! operations, image-upload processing, and the realtime dispatcher
//! operations with typed listener registrations. [`ClientBridge`] is
//! that surface, expressed as an injectable service; the IPC transport
//! wrapping it is shell packaging and lives outside this crate.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::error::BridgeError;
use crate::persistence::KvStore;
use crate::realtime::{Channel, InboundEvent, RealtimeDispatcher, RealtimeNotification};

pub mod image;

pub use image::UploadedImage;

/// Capability surface handed to the UI process.
#[derive(Debug, Clone)]
pub struct ClientBridge {
    store: Arc<dyn KvStore>,
    dispatcher: RealtimeDispatcher,
}

impl ClientBridge {
    /// Creates the bridge over the given store and dispatcher.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>, dispatcher: RealtimeDispatcher) -> Self {
        Self { store, dispatcher }
    }

    // --- durable key/value store -----------------------------------------

    /// Reads a durable entry.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] on backend failure.
    pub async fn store_get(&self, key: &str) -> Result<Option<String>, BridgeError> {
        Ok(self.store.get(key).await?)
    }

    /// Writes a durable entry.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] on backend failure.
    pub async fn store_set(&self, key: &str, value: &str) -> Result<(), BridgeError> {
        Ok(self.store.set(key, value).await?)
    }

    /// Deletes a durable entry.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] on backend failure.
    pub async fn store_delete(&self, key: &str) -> Result<(), BridgeError> {
        Ok(self.store.delete(key).await?)
    }

    /// Clears the durable store.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] on backend failure.
    pub async fn store_clear(&self) -> Result<(), BridgeError> {
        Ok(self.store.clear().await?)
    }

    // --- image upload ----------------------------------------------------

    /// Processes an uploaded image off the async runtime threads.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] when the payload or mime type is invalid.
    pub async fn upload_image(
        &self,
        base64_data: String,
        mime: String,
    ) -> Result<UploadedImage, BridgeError> {
        tokio::task::spawn_blocking(move || image::process_upload(&base64_data, &mime))
            .await
            .map_err(|e| BridgeError::InvalidImage(e.to_string()))?
    }

    // --- realtime dispatcher ---------------------------------------------

    /// Connects the realtime dispatcher.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] when the handshake fails.
    pub async fn connect(&self, url: &str) -> Result<(), BridgeError> {
        Ok(self.dispatcher.connect(url).await?)
    }

    /// Sends a message over the realtime connection.
    ///
    /// # Errors
    ///
    /// Returns a [`BridgeError`] when no connection is live or the send
    /// fails.
    pub async fn send(&self, message: &serde_json::Value) -> Result<(), BridgeError> {
        Ok(self.dispatcher.send(message).await?)
    }

    /// Disconnects the realtime connection; trivially succeeds when none
    /// is live.
    pub async fn disconnect(&self) -> bool {
        self.dispatcher.disconnect().await
    }

    /// Subscribes to lifecycle and error notifications (open, close,
    /// transport errors, parse failures).
    #[must_use]
    pub fn on_lifecycle(&self) -> broadcast::Receiver<RealtimeNotification> {
        self.dispatcher.subscribe_lifecycle()
    }

    /// Subscribes to authentication events.
    #[must_use]
    pub fn on_auth(&self) -> broadcast::Receiver<InboundEvent> {
        self.dispatcher.subscribe(Channel::Auth)
    }

    /// Subscribes to order updates.
    #[must_use]
    pub fn on_order_update(&self) -> broadcast::Receiver<InboundEvent> {
        self.dispatcher.subscribe(Channel::Order)
    }

    /// Subscribes to chat messages.
    #[must_use]
    pub fn on_chat(&self) -> broadcast::Receiver<InboundEvent> {
        self.dispatcher.subscribe(Channel::Chat)
    }

    /// Subscribes to merchant and menu updates.
    #[must_use]
    pub fn on_merchant_update(&self) -> broadcast::Receiver<InboundEvent> {
        self.dispatcher.subscribe(Channel::Merchant)
    }

    /// Subscribes to recommendation events.
    #[must_use]
    pub fn on_recommend(&self) -> broadcast::Receiver<InboundEvent> {
        self.dispatcher.subscribe(Channel::Recommendation)
    }

    /// Subscribes to notification events.
    #[must_use]
    pub fn on_notification(&self) -> broadcast::Receiver<InboundEvent> {
        self.dispatcher.subscribe(Channel::Notification)
    }

    /// Subscribes to the generic message channel (unmapped tags).
    #[must_use]
    pub fn on_message(&self) -> broadcast::Receiver<InboundEvent> {
        self.dispatcher.subscribe(Channel::Message)
    }
}
