use remedy_core::{CorrectiveRequest, DomainId, ErrorCode, Payload};
use thiserror::Error;

/// Result of asking a handler to resolve an error.
pub type Resolution = Result<CorrectiveRequest, NotHandled>;

/// Why a handler declined to produce a corrective request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotHandled {
    /// The code is not part of this domain's recovery vocabulary.
    #[error("{domain} has no recovery for code {code}")]
    UnknownCode { domain: DomainId, code: ErrorCode },

    /// A field the code needs to target the right resource is missing.
    #[error("{code} requires payload field `{field}`")]
    MissingField { code: ErrorCode, field: &'static str },
}

impl NotHandled {
    /// Report an unknown code against the domain the handler was registered under.
    pub fn in_domain(self, registered: &DomainId) -> Self {
        match self {
            NotHandled::UnknownCode { code, .. } => NotHandled::UnknownCode {
                domain: registered.clone(),
                code,
            },
            other => other,
        }
    }
}

/// Maps a domain's error codes to corrective requests.
///
/// Implementations must be pure: the same `(code, payload)` always yields the
/// same request, and resolving never touches shared state or performs IO.
/// Missing identifier fields yield [`NotHandled::MissingField`] rather than a
/// request that cannot target its resource.
pub trait DomainHandler: Send + Sync {
    /// Domain this handler is registered under by default.
    fn domain(&self) -> DomainId;

    /// Codes this handler knows how to recover.
    fn codes(&self) -> &'static [&'static str];

    fn resolve(&self, code: &ErrorCode, payload: &Payload) -> Resolution;
}
