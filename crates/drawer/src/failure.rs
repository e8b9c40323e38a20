//! Terminal failures surfaced to the caller.

use remedy_core::{DomainId, Endpoint, StructuredError};
use remedy_handlers::NotHandled;
use thiserror::Error;

use crate::surface::SurfaceError;

/// Why a structured error could not be routed to a handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnroutableReason {
    #[error("error has no domain")]
    MissingDomain,

    #[error("error has no code")]
    MissingCode,

    #[error("no handler registered for domain `{0}`")]
    UnregisteredDomain(DomainId),
}

/// Routing failure before any drawer is opened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Unroutable(#[from] UnroutableReason),

    #[error(transparent)]
    Unhandled(#[from] NotHandled),
}

impl RouteError {
    /// Attach the error being routed.
    pub fn into_failure<E>(self, error: StructuredError) -> RecoveryFailure<E> {
        match self {
            RouteError::Unroutable(reason) => RecoveryFailure::Unroutable { error, reason },
            RouteError::Unhandled(reason) => RecoveryFailure::Unhandled { error, reason },
        }
    }
}

/// Final failure of an intercepted action.
///
/// Every variant except `Action` carries the *original* structured error, so
/// the caller's failure message is the one the user started with.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecoveryFailure<E> {
    /// The action failed outside the recovery taxonomy; passed through untouched.
    #[error("action failed: {0}")]
    Action(E),

    /// Malformed error or unregistered domain; no recovery attempted.
    #[error("unroutable error {error}: {reason}")]
    Unroutable {
        error: StructuredError,
        reason: UnroutableReason,
    },

    /// Known domain, but the handler declined the error.
    #[error("no recovery for {error}: {reason}")]
    Unhandled {
        error: StructuredError,
        reason: NotHandled,
    },

    /// The drawer was closed without its completion event.
    #[error("recovery of {error} was cancelled")]
    Cancelled { error: StructuredError },

    /// The replayed action failed recoverably again and no cycles were left.
    #[error("recovery of {error} exhausted after {attempts} retr(ies); last failure: {last}")]
    Exhausted {
        error: StructuredError,
        last: StructuredError,
        attempts: u32,
    },

    /// A standalone surface took over; the action is not replayed.
    #[error("{error} handed off to {endpoint}")]
    Detached {
        error: StructuredError,
        endpoint: Endpoint,
    },

    /// The corrective surface could not be opened.
    #[error("could not open a drawer for {error}: {reason}")]
    SurfaceUnavailable {
        error: StructuredError,
        reason: SurfaceError,
    },
}

impl<E> RecoveryFailure<E> {
    /// The structured error the user started with, if any.
    pub fn original(&self) -> Option<&StructuredError> {
        match self {
            RecoveryFailure::Action(_) => None,
            RecoveryFailure::Unroutable { error, .. }
            | RecoveryFailure::Unhandled { error, .. }
            | RecoveryFailure::Cancelled { error }
            | RecoveryFailure::Exhausted { error, .. }
            | RecoveryFailure::Detached { error, .. }
            | RecoveryFailure::SurfaceUnavailable { error, .. } => Some(error),
        }
    }

    /// Whether a drawer was opened for this failure.
    pub fn reached_drawer(&self) -> bool {
        matches!(
            self,
            RecoveryFailure::Cancelled { .. }
                | RecoveryFailure::Exhausted { .. }
                | RecoveryFailure::Detached { .. }
        )
    }
}
