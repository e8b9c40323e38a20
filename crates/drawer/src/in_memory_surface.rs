//! In-process corrective surface for tests, drills and embedded UIs.
//!
//! Records every drawer it is asked to open and publishes the signals a real
//! UI would publish (`complete`, `dismiss`, `emit`) onto the shared bus.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use remedy_core::{ActionKey, DrawerId};
use remedy_events::{DrawerSignal, InMemorySignalBus, SignalBus};

use crate::surface::{CorrectiveSurface, DrawerOpening, SurfaceError};

/// How the surface reacts when a drawer is opened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SurfaceScript {
    /// Wait for explicit `complete` / `dismiss` / `emit` calls.
    #[default]
    Manual,
    /// Immediately emit the drawer's completion event.
    AutoComplete,
    /// Immediately dismiss the drawer.
    AutoDismiss,
    /// Refuse to open drawers.
    Reject,
}

/// Cheap to clone; clones share the same recorded state.
#[derive(Debug, Clone)]
pub struct InMemorySurface {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    bus: Arc<InMemorySignalBus<DrawerSignal>>,
    script: Mutex<SurfaceScript>,
    openings: Mutex<Vec<DrawerOpening>>,
    opened: watch::Sender<usize>,
}

impl InMemorySurface {
    pub fn new(bus: Arc<InMemorySignalBus<DrawerSignal>>) -> Self {
        Self::with_script(bus, SurfaceScript::Manual)
    }

    pub fn with_script(bus: Arc<InMemorySignalBus<DrawerSignal>>, script: SurfaceScript) -> Self {
        let (opened, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                bus,
                script: Mutex::new(script),
                openings: Mutex::new(Vec::new()),
                opened,
            }),
        }
    }

    pub fn set_script(&self, script: SurfaceScript) {
        *self.inner.script.lock().unwrap_or_else(PoisonError::into_inner) = script;
    }

    /// Every drawer opened so far, in order.
    pub fn openings(&self) -> Vec<DrawerOpening> {
        self.inner
            .openings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn opening_count(&self) -> usize {
        *self.inner.opened.borrow()
    }

    /// Most recent drawer opened for `action`.
    pub fn opening_for(&self, action: &ActionKey) -> Option<DrawerOpening> {
        self.openings()
            .into_iter()
            .rev()
            .find(|o| o.action() == action)
    }

    /// Wait until at least `count` drawers have been opened.
    pub async fn wait_for_openings(&self, count: usize) {
        let mut rx = self.inner.opened.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(|opened| *opened >= count).await;
    }

    /// Emit the drawer's completion event.
    pub fn complete(&self, drawer_id: DrawerId) -> Result<(), SurfaceError> {
        let opening = self.find(drawer_id)?;
        let event = opening
            .completion_event()
            .ok_or_else(|| SurfaceError::Rejected("standalone drawers have no completion event".into()))?;
        self.publish(DrawerSignal::event(drawer_id, event))
    }

    /// Close the drawer without resolving it.
    pub fn dismiss(&self, drawer_id: DrawerId) -> Result<(), SurfaceError> {
        self.find(drawer_id)?;
        self.publish(DrawerSignal::dismissed(drawer_id))
    }

    /// Emit an arbitrary named event from the drawer.
    pub fn emit(&self, drawer_id: DrawerId, event: &str) -> Result<(), SurfaceError> {
        self.find(drawer_id)?;
        self.publish(DrawerSignal::event(drawer_id, event))
    }

    fn find(&self, drawer_id: DrawerId) -> Result<DrawerOpening, SurfaceError> {
        self.openings()
            .into_iter()
            .find(|o| o.drawer_id() == drawer_id)
            .ok_or(SurfaceError::UnknownDrawer(drawer_id))
    }

    fn publish(&self, signal: DrawerSignal) -> Result<(), SurfaceError> {
        self.inner
            .bus
            .publish(signal)
            .map_err(|_| SurfaceError::Unavailable)
    }
}

#[async_trait]
impl CorrectiveSurface for InMemorySurface {
    async fn open(&self, opening: &DrawerOpening) -> Result<(), SurfaceError> {
        let script = *self.inner.script.lock().unwrap_or_else(PoisonError::into_inner);
        if script == SurfaceScript::Reject {
            return Err(SurfaceError::Rejected(format!("refused {}", opening.endpoint())));
        }

        debug!(
            drawer_id = %opening.drawer_id(),
            action = %opening.action(),
            endpoint = %opening.endpoint(),
            "drawer opened"
        );
        self.inner
            .openings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(opening.clone());
        self.inner.opened.send_modify(|n| *n += 1);

        match (script, opening.completion_event()) {
            (SurfaceScript::AutoComplete, Some(event)) => {
                self.publish(DrawerSignal::event(opening.drawer_id(), event))
            }
            (SurfaceScript::AutoDismiss, Some(_)) => {
                self.publish(DrawerSignal::dismissed(opening.drawer_id()))
            }
            _ => Ok(()),
        }
    }
}
