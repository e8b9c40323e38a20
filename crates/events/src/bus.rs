//! Signal publishing/subscription abstraction (mechanics only).
//!
//! Corrective surfaces publish [`DrawerSignal`](crate::DrawerSignal)s; the
//! orchestrator subscribes while a drawer is open and suspends on
//! [`Subscription::recv`] until the signal it waits for arrives.
//!
//! ## Delivery
//!
//! - **Broadcast**: every live subscription receives every published message.
//! - **No replay**: a subscription only sees messages published after it was
//!   created, so listeners must subscribe *before* opening a drawer.
//! - **No persistence**: signals are transient UI notifications.
//!
//! ## Unsubscribing
//!
//! Dropping a [`Subscription`] detaches it; [`Subscription::unsubscribe`] does
//! the same explicitly. Buses prune detached subscribers on the next publish,
//! so listeners never leak past the recovery that created them.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;

/// A subscription to a signal stream.
///
/// Designed for a single consumer. Messages arrive in publish order.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: UnboundedReceiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: UnboundedReceiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message.
    ///
    /// Returns `None` once the bus has gone away and all buffered messages
    /// were consumed.
    pub async fn recv(&mut self) -> Option<M> {
        self.receiver.recv().await
    }

    /// Try to receive a message without waiting.
    pub fn try_recv(&mut self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Detach from the bus. Buffered messages are discarded.
    pub fn unsubscribe(mut self) {
        self.receiver.close();
    }
}

/// Domain-agnostic signal bus (pub/sub).
///
/// `publish` is synchronous and never waits on subscribers; implementations
/// must be safe to share across tasks.
pub trait SignalBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> SignalBus<M> for Arc<B>
where
    B: SignalBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
