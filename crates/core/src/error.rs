//! Structured, recoverable failures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::domain::{DomainId, ErrorCode};

/// Domain-defined identifier fields carried by a [`StructuredError`].
///
/// Opaque to the orchestrator; only domain handlers interpret it.
pub type Payload = Map<String, JsonValue>;

/// A recoverable failure reported by an action-execution collaborator.
///
/// Produced once per failed attempt and never mutated afterwards. Construction
/// does not validate: an error with an empty `domain` or `code` is still a
/// `StructuredError`, and the orchestrator reports it as unroutable instead of
/// attempting recovery.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("{domain}/{code}")]
pub struct StructuredError {
    #[serde(default)]
    domain: DomainId,
    #[serde(default)]
    code: ErrorCode,
    #[serde(default)]
    payload: Payload,
}

impl StructuredError {
    pub fn new(domain: impl Into<DomainId>, code: impl Into<ErrorCode>) -> Self {
        Self {
            domain: domain.into(),
            code: code.into(),
            payload: Payload::new(),
        }
    }

    /// Attach a payload field.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.payload.insert(field.into(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Recognize a collaborator failure body as part of the taxonomy.
    ///
    /// A body belongs to the taxonomy iff it is a JSON object carrying a
    /// `domain` or `code` key. Anything else returns `None` and must be treated
    /// as a non-recoverable failure. Missing or mistyped fields fall back to
    /// empty values so the orchestrator can report them as unroutable.
    pub fn from_body(body: &JsonValue) -> Option<Self> {
        let object = body.as_object()?;
        if !object.contains_key("domain") && !object.contains_key("code") {
            return None;
        }

        let text = |key: &str| {
            object
                .get(key)
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let payload = object
            .get("payload")
            .and_then(JsonValue::as_object)
            .cloned()
            .unwrap_or_default();

        Some(Self {
            domain: DomainId::new(text("domain")),
            code: ErrorCode::new(text("code")),
            payload,
        })
    }

    pub fn domain(&self) -> &DomainId {
        &self.domain
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}
