//! Corrective requests: where to send the user and what signals success.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Bytes escaped inside a path segment: everything outside the RFC 3986 unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Location of a corrective surface, relative to the drawer base path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Start building an endpoint from a static path prefix (e.g. `/drawers/batch`).
    pub fn builder(path: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Prefix this endpoint with a base path (e.g. `/app`).
    pub fn with_base(&self, base: &str) -> Endpoint {
        let base = base.trim_end_matches('/');
        if base.is_empty() {
            return self.clone();
        }
        Endpoint(format!("{}{}", base, self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `value` is one of this endpoint's path segments or query values.
    pub fn references(&self, value: &str) -> bool {
        let (path, query) = match self.0.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.0.as_str(), None),
        };

        let in_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .any(|segment| percent_decode_str(segment).decode_utf8_lossy() == value);

        in_path
            || query.is_some_and(|query| {
                form_urlencoded::parse(query.as_bytes()).any(|(_, v)| v == value)
            })
    }
}

impl core::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builder that percent-encodes identifiers as they are added.
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    path: String,
    query: Vec<(String, String)>,
}

impl EndpointBuilder {
    /// Append a literal path segment (not encoded).
    pub fn route(mut self, segment: &str) -> Self {
        self.path.push('/');
        self.path.push_str(segment.trim_matches('/'));
        self
    }

    /// Append an identifier as an encoded path segment.
    pub fn segment(mut self, value: &str) -> Self {
        self.path.push('/');
        self.path.extend(utf8_percent_encode(value, SEGMENT));
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> Endpoint {
        if self.query.is_empty() {
            return Endpoint(self.path);
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        Endpoint(format!("{}?{}", self.path, query))
    }
}

/// What the orchestrator waits for once the surface is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum Completion {
    /// Wait for this named event, then replay the original action once.
    Event(String),
    /// Open a standalone surface and consider the error handled; never replay.
    Standalone,
}

/// Declarative instruction produced by a domain handler for one error.
///
/// Constructed per error and consumed immediately by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectiveRequest {
    endpoint: Endpoint,
    completion: Completion,
}

impl CorrectiveRequest {
    pub fn awaiting(endpoint: Endpoint, event: impl Into<String>) -> Self {
        Self {
            endpoint,
            completion: Completion::Event(event.into()),
        }
    }

    pub fn standalone(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            completion: Completion::Standalone,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    /// Name of the completion event, or `None` for standalone surfaces.
    pub fn completion_event(&self) -> Option<&str> {
        match &self.completion {
            Completion::Event(name) => Some(name),
            Completion::Standalone => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn builds_path_and_query() {
        let endpoint = Endpoint::builder("/drawers/inventory")
            .route("restock")
            .segment("I1")
            .query("required_amount", "5")
            .build();
        assert_eq!(endpoint.as_str(), "/drawers/inventory/restock/I1?required_amount=5");
    }

    #[test]
    fn identifiers_are_encoded() {
        let endpoint = Endpoint::builder("/drawers/conversion")
            .route("unit-mapping")
            .query("from_unit", "fl oz")
            .query("to_unit", "g/ml")
            .build();
        assert_eq!(
            endpoint.as_str(),
            "/drawers/conversion/unit-mapping?from_unit=fl+oz&to_unit=g%2Fml"
        );
        assert!(endpoint.references("fl oz"));
        assert!(endpoint.references("g/ml"));
    }

    #[test]
    fn references_match_whole_segments_and_values() {
        let endpoint = Endpoint::builder("/drawers/inventory")
            .route("restock")
            .segment("I15")
            .query("required_amount", "50")
            .build();
        assert!(endpoint.references("I15"));
        assert!(endpoint.references("50"));
        assert!(!endpoint.references("5"));
        assert!(!endpoint.references("I1"));
        assert!(!endpoint.references("required_amount"));

        let spaced = Endpoint::builder("/drawers/batch").segment("lot 7/b").build();
        assert_eq!(spaced.as_str(), "/drawers/batch/lot%207%2Fb");
        assert!(spaced.references("lot 7/b"));
        assert!(!spaced.references("lot 7"));
    }

    #[test]
    fn base_path_is_prefixed_once() {
        let endpoint = Endpoint::builder("/drawers/batch").segment("B1").build();
        assert_eq!(endpoint.with_base("/app/").as_str(), "/app/drawers/batch/B1");
        assert_eq!(endpoint.with_base("").as_str(), "/drawers/batch/B1");
    }

    #[test]
    fn standalone_requests_have_no_completion_event() {
        let req = CorrectiveRequest::standalone(Endpoint::builder("/units").build());
        assert_eq!(req.completion_event(), None);
        let req = CorrectiveRequest::awaiting(Endpoint::builder("/x").build(), "done");
        assert_eq!(req.completion_event(), Some("done"));
    }

    proptest! {
        /// Property: a segment never leaks reserved characters into the path.
        #[test]
        fn encoded_segments_stay_single_segments(value in "\\PC{1,40}") {
            let endpoint = Endpoint::builder("/drawers").segment(&value).build();
            let tail = endpoint.as_str().trim_start_matches("/drawers/");
            prop_assert!(!tail.contains('/'));
            prop_assert!(!tail.contains('?'));
            prop_assert!(endpoint.references(&value));
        }
    }
}
