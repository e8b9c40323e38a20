//! `remedy-core`: error taxonomy and recovery vocabulary.
//!
//! This crate contains the **pure** building blocks shared by every other crate:
//! structured errors, action outcomes, corrective requests and identifiers.
//! No IO, no async, no logging.

pub mod corrective;
pub mod domain;
pub mod error;
pub mod id;
pub mod outcome;

pub use corrective::{Completion, CorrectiveRequest, Endpoint, EndpointBuilder};
pub use domain::{DomainId, ErrorCode};
pub use error::{Payload, StructuredError};
pub use id::{ActionKey, DrawerId, InvalidId};
pub use outcome::Outcome;
