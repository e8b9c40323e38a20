//! Action interceptor: the entry point callers use to run recoverable actions.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use remedy_core::{ActionKey, Outcome};
use remedy_events::{DrawerSignal, SignalBus};

use crate::failure::RecoveryFailure;
use crate::protocol::DrawerProtocol;
use crate::surface::CorrectiveSurface;

/// Runs actions and routes structured failures into the drawer protocol.
///
/// Stateless between calls; clones share the same protocol and may run
/// independent actions concurrently.
pub struct Interceptor<S, B> {
    protocol: Arc<DrawerProtocol<S, B>>,
}

impl<S, B> Clone for Interceptor<S, B> {
    fn clone(&self) -> Self {
        Self {
            protocol: Arc::clone(&self.protocol),
        }
    }
}

impl<S, B> Interceptor<S, B> {
    pub fn new(protocol: Arc<DrawerProtocol<S, B>>) -> Self {
        Self { protocol }
    }

    pub fn protocol(&self) -> &DrawerProtocol<S, B> {
        &self.protocol
    }
}

impl<S, B> Interceptor<S, B>
where
    S: CorrectiveSurface,
    B: SignalBus<DrawerSignal>,
{
    /// Run `action` as its own logical action.
    pub async fn execute<T, E, F, Fut>(&self, action: F) -> Result<T, RecoveryFailure<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        self.execute_keyed(ActionKey::unique(), action).await
    }

    /// Run `action` under `key`.
    ///
    /// Successes and unrecoverable failures pass straight through. A
    /// structured failure is handed to the drawer protocol, which may replay
    /// `action` once the user resolves the underlying problem; the replay uses
    /// the same closure, so inputs are identical on both attempts.
    pub async fn execute_keyed<T, E, F, Fut>(
        &self,
        key: ActionKey,
        action: F,
    ) -> Result<T, RecoveryFailure<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Outcome<T, E>>,
    {
        match action().await {
            Outcome::Success(value) => Ok(value),
            Outcome::Unrecoverable(err) => {
                debug!(action = %key, "action failed outside the recovery taxonomy");
                Err(RecoveryFailure::Action(err))
            }
            Outcome::Recoverable(error) => self.protocol.recover(&key, error, &action).await,
        }
    }
}
