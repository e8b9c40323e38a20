//! Per-action recovery state machine.
//!
//! ```text
//! Idle → Dispatching → AwaitingResolution → Retrying → Resolved
//!            │                 │    │           │
//!            └──▶ Aborted ◀────┘    │           ├──▶ Aborted
//!                                   │           └──▶ Dispatching   (chained recovery, bounded)
//!                                   └──▶ Resolved                   (standalone surface, no replay)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use remedy_core::{ActionKey, CorrectiveRequest, DrawerId, StructuredError};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryState {
    Idle,
    Dispatching,
    AwaitingResolution,
    Retrying,
    Resolved,
    Aborted,
}

impl RecoveryState {
    pub fn can_advance_to(self, next: RecoveryState) -> bool {
        use self::RecoveryState::*;
        matches!(
            (self, next),
            (Idle, Dispatching)
                | (Dispatching, AwaitingResolution)
                | (Dispatching, Aborted)
                | (AwaitingResolution, Retrying)
                | (AwaitingResolution, Resolved)
                | (AwaitingResolution, Aborted)
                | (Retrying, Resolved)
                | (Retrying, Aborted)
                | (Retrying, Dispatching)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RecoveryState::Resolved | RecoveryState::Aborted)
    }
}

impl core::fmt::Display for RecoveryState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            RecoveryState::Idle => "idle",
            RecoveryState::Dispatching => "dispatching",
            RecoveryState::AwaitingResolution => "awaiting_resolution",
            RecoveryState::Retrying => "retrying",
            RecoveryState::Resolved => "resolved",
            RecoveryState::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Orchestrator-owned state for one logical action under recovery.
///
/// The re-invocable action itself stays with the orchestrator call that owns
/// this session; the session tracks what is open and how far it got.
#[derive(Debug, Clone)]
pub struct InFlightRecovery {
    action: ActionKey,
    original: StructuredError,
    current: StructuredError,
    drawer_id: Option<DrawerId>,
    corrective: Option<CorrectiveRequest>,
    attempt: u32,
    state: RecoveryState,
    started_at: DateTime<Utc>,
}

impl InFlightRecovery {
    pub fn begin(action: ActionKey, original: StructuredError) -> Self {
        Self {
            action,
            current: original.clone(),
            original,
            drawer_id: None,
            corrective: None,
            attempt: 1,
            state: RecoveryState::Idle,
            started_at: Utc::now(),
        }
    }

    pub fn action(&self) -> &ActionKey {
        &self.action
    }

    /// The error that started this recovery.
    pub fn original(&self) -> &StructuredError {
        &self.original
    }

    /// The error the current cycle is recovering from.
    pub fn current(&self) -> &StructuredError {
        &self.current
    }

    pub fn drawer_id(&self) -> Option<DrawerId> {
        self.drawer_id
    }

    pub fn corrective(&self) -> Option<&CorrectiveRequest> {
        self.corrective.as_ref()
    }

    /// 1-based recovery cycle.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn state(&self) -> RecoveryState {
        self.state
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn advance(&mut self, next: RecoveryState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal recovery transition {} -> {}",
            self.state,
            next
        );
        trace!(action = %self.action, from = %self.state, to = %next, "recovery transition");
        self.state = next;
    }

    /// Record the drawer opened for the current cycle.
    pub fn attach(&mut self, drawer_id: DrawerId, corrective: CorrectiveRequest) {
        self.drawer_id = Some(drawer_id);
        self.corrective = Some(corrective);
    }

    /// Start another cycle for a new recoverable error raised by the retry.
    pub fn chain(&mut self, next: StructuredError) {
        self.current = next;
        self.drawer_id = None;
        self.corrective = None;
        self.attempt += 1;
    }
}
