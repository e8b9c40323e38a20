use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remedy_core::DrawerId;

/// What a corrective surface reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum SignalKind {
    /// A named event (e.g. `inventoryRestocked`).
    Event(String),
    /// The surface was closed without resolving anything.
    Dismissed,
}

/// A signal from one drawer instance.
///
/// Signals are always scoped to the drawer that emitted them; listeners
/// filter on `drawer_id` before looking at the event name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawerSignal {
    drawer_id: DrawerId,
    kind: SignalKind,
    emitted_at: DateTime<Utc>,
}

impl DrawerSignal {
    pub fn new(drawer_id: DrawerId, kind: SignalKind, emitted_at: DateTime<Utc>) -> Self {
        Self {
            drawer_id,
            kind,
            emitted_at,
        }
    }

    pub fn event(drawer_id: DrawerId, name: impl Into<String>) -> Self {
        Self::new(drawer_id, SignalKind::Event(name.into()), Utc::now())
    }

    pub fn dismissed(drawer_id: DrawerId) -> Self {
        Self::new(drawer_id, SignalKind::Dismissed, Utc::now())
    }

    pub fn drawer_id(&self) -> DrawerId {
        self.drawer_id
    }

    pub fn kind(&self) -> &SignalKind {
        &self.kind
    }

    pub fn emitted_at(&self) -> DateTime<Utc> {
        self.emitted_at
    }

    /// Whether this is the named event for the given drawer.
    pub fn is_event(&self, drawer_id: DrawerId, name: &str) -> bool {
        self.drawer_id == drawer_id && matches!(&self.kind, SignalKind::Event(n) if n == name)
    }
}
