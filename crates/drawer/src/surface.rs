//! Outbound contract to the corrective UI.
//!
//! The orchestrator asks a [`CorrectiveSurface`] to show a drawer; the surface
//! later reports back through the signal bus with either the drawer's
//! completion event or a dismissal. The surface never retries anything.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use remedy_core::{ActionKey, DrawerId, Endpoint};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface refused to show the drawer.
    #[error("drawer rejected: {0}")]
    Rejected(String),

    /// The surface (or its signal channel) is gone.
    #[error("corrective surface unavailable")]
    Unavailable,

    /// No drawer with this id was opened.
    #[error("unknown drawer {0}")]
    UnknownDrawer(DrawerId),
}

/// Instruction to open one drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawerOpening {
    drawer_id: DrawerId,
    action: ActionKey,
    endpoint: Endpoint,
    completion_event: Option<String>,
    opened_at: DateTime<Utc>,
}

impl DrawerOpening {
    pub fn new(
        drawer_id: DrawerId,
        action: ActionKey,
        endpoint: Endpoint,
        completion_event: Option<String>,
    ) -> Self {
        Self {
            drawer_id,
            action,
            endpoint,
            completion_event,
            opened_at: Utc::now(),
        }
    }

    pub fn drawer_id(&self) -> DrawerId {
        self.drawer_id
    }

    pub fn action(&self) -> &ActionKey {
        &self.action
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Event that signals resolution; `None` for standalone surfaces.
    pub fn completion_event(&self) -> Option<&str> {
        self.completion_event.as_deref()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }
}

#[async_trait]
pub trait CorrectiveSurface: Send + Sync {
    /// Show a drawer rendering `opening.endpoint()`.
    async fn open(&self, opening: &DrawerOpening) -> Result<(), SurfaceError>;
}

#[async_trait]
impl<S> CorrectiveSurface for Arc<S>
where
    S: CorrectiveSurface + ?Sized,
{
    async fn open(&self, opening: &DrawerOpening) -> Result<(), SurfaceError> {
        (**self).open(opening).await
    }
}
