//! In-memory signal bus for tests/dev and single-process UIs.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::bus::{SignalBus, Subscription};

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// - Unbounded per-subscriber queues (publish never waits)
/// - Best-effort fan-out
/// - Detached subscribers are pruned on publish
#[derive(Debug)]
pub struct InMemorySignalBus<M> {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<M>>>,
}

impl<M> InMemorySignalBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subscriptions that are still attached.
    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(mut subs) => {
                subs.retain(|tx| !tx.is_closed());
                subs.len()
            }
            Err(_) => 0,
        }
    }
}

impl<M> Default for InMemorySignalBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> SignalBus<M> for InMemorySignalBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any detached subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::unbounded_channel();

        // A poisoned lock still yields a subscription; it just never receives.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{DrawerSignal, SignalKind};
    use remedy_core::DrawerId;

    #[tokio::test]
    async fn every_subscriber_receives_published_signals() {
        let bus = InMemorySignalBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        let drawer = DrawerId::new();

        bus.publish(DrawerSignal::event(drawer, "densityUpdated")).unwrap();

        assert!(a.recv().await.unwrap().is_event(drawer, "densityUpdated"));
        assert!(b.recv().await.unwrap().is_event(drawer, "densityUpdated"));
    }

    #[tokio::test]
    async fn late_subscribers_see_no_history() {
        let bus = InMemorySignalBus::new();
        let drawer = DrawerId::new();
        bus.publish(DrawerSignal::dismissed(drawer)).unwrap();

        let mut late = bus.subscribe();
        assert!(late.try_recv().is_err());

        bus.publish(DrawerSignal::dismissed(drawer)).unwrap();
        assert_eq!(late.recv().await.unwrap().kind(), &SignalKind::Dismissed);
    }

    #[test]
    fn unsubscribe_releases_the_listener() {
        let bus: InMemorySignalBus<DrawerSignal> = InMemorySignalBus::new();
        let sub = bus.subscribe();
        let _kept = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(DrawerSignal::dismissed(DrawerId::new())).unwrap();
        assert_eq!(bus.subscriber_count(), 1);
    }
}
