//! Tagged result of a single action attempt.

use serde_json::Value as JsonValue;

use crate::error::StructuredError;

/// Result of running an action once.
///
/// Actions classify their own failures: a failure carrying a
/// [`StructuredError`] is `Recoverable`, everything else is `Unrecoverable`.
/// The interceptor matches on this exhaustively instead of probing error
/// shapes at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, E> {
    Success(T),
    Recoverable(StructuredError),
    Unrecoverable(E),
}

impl<T, E> Outcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, Outcome::Recoverable(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Recoverable(err) => Outcome::Recoverable(err),
            Outcome::Unrecoverable(err) => Outcome::Unrecoverable(err),
        }
    }

    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Recoverable(err) => Outcome::Recoverable(err),
            Outcome::Unrecoverable(err) => Outcome::Unrecoverable(f(err)),
        }
    }
}

impl<T> Outcome<T, JsonValue> {
    /// Classify a collaborator response whose failure side is a JSON body.
    ///
    /// Bodies shaped like a structured error become `Recoverable`; any other
    /// body is passed through untouched as `Unrecoverable`.
    pub fn from_json_result(result: Result<T, JsonValue>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(body) => match StructuredError::from_body(&body) {
                Some(err) => Outcome::Recoverable(err),
                None => Outcome::Unrecoverable(body),
            },
        }
    }
}

impl<T, E> From<Result<T, StructuredError>> for Outcome<T, E> {
    fn from(value: Result<T, StructuredError>) -> Self {
        match value {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::Recoverable(err),
        }
    }
}
