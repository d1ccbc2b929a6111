//! Broadcast fan-out for classified events and lifecycle notifications.
//!
//! One [`tokio::sync::broadcast`] channel per event category plus one
//! lifecycle stream. Single producer (the dispatcher's reader task),
//! multiple independent consumers; a lagging consumer drops its own
//! oldest events and never blocks the others.

use std::collections::HashMap;

use tokio::sync::broadcast;

use super::event::{Channel, InboundEvent, RealtimeNotification};

/// Named broadcast channels consumed by UI layers.
///
/// Events are delivered to exactly the channel their tag maps to, in
/// transport receipt order.
#[derive(Debug, Clone)]
pub struct EventChannels {
    senders: HashMap<Channel, broadcast::Sender<InboundEvent>>,
    lifecycle: broadcast::Sender<RealtimeNotification>,
}

impl EventChannels {
    /// Creates the channel set with the given per-channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut senders = HashMap::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            let (sender, _) = broadcast::channel(capacity);
            senders.insert(channel, sender);
        }
        let (lifecycle, _) = broadcast::channel(capacity);
        Self { senders, lifecycle }
    }

    /// Publishes a classified event to its mapped channel only.
    ///
    /// Returns the number of receivers that got the event; zero when
    /// nobody subscribes to that channel.
    pub fn publish_event(&self, event: InboundEvent) -> usize {
        match self.senders.get(&event.channel) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Publishes a lifecycle or error notification.
    pub fn publish_lifecycle(&self, notification: RealtimeNotification) -> usize {
        self.lifecycle.send(notification).unwrap_or(0)
    }

    /// Subscribes to one named channel.
    #[must_use]
    pub fn subscribe(&self, channel: Channel) -> broadcast::Receiver<InboundEvent> {
        match self.senders.get(&channel) {
            Some(sender) => sender.subscribe(),
            // Unreachable: every Channel variant is registered in `new`.
            None => broadcast::channel(1).0.subscribe(),
        }
    }

    /// Subscribes to lifecycle and error notifications.
    #[must_use]
    pub fn subscribe_lifecycle(&self) -> broadcast::Receiver<RealtimeNotification> {
        self.lifecycle.subscribe()
    }

    /// Returns the number of active receivers on one channel.
    #[must_use]
    pub fn receiver_count(&self, channel: Channel) -> usize {
        self.senders
            .get(&channel)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}
