//! Batch production recovery: container shortages, stuck and invalid batches.

use remedy_core::{CorrectiveRequest, DomainId, Endpoint, ErrorCode, Payload};

use crate::handler::{DomainHandler, NotHandled, Resolution};
use crate::payload::require;

pub const CONTAINER_SHORTAGE: &str = "CONTAINER_SHORTAGE";
pub const STUCK_BATCH: &str = "STUCK_BATCH";
pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";

const CODES: &[&str] = &[CONTAINER_SHORTAGE, STUCK_BATCH, VALIDATION_FAILED];

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchHandler;

impl DomainHandler for BatchHandler {
    fn domain(&self) -> DomainId {
        DomainId::batch()
    }

    fn codes(&self) -> &'static [&'static str] {
        CODES
    }

    fn resolve(&self, code: &ErrorCode, payload: &Payload) -> Resolution {
        let (surface, event) = match code.as_str() {
            CONTAINER_SHORTAGE => ("containers", "containersUpdated"),
            STUCK_BATCH => ("stuck", "batchUnstuck"),
            VALIDATION_FAILED => ("validation", "batchValidationFixed"),
            _ => {
                return Err(NotHandled::UnknownCode {
                    domain: self.domain(),
                    code: code.clone(),
                });
            }
        };

        let batch_id = require(payload, code, "batch_id")?;
        let endpoint = Endpoint::builder("/drawers/batch")
            .route(surface)
            .segment(&batch_id)
            .build();
        Ok(CorrectiveRequest::awaiting(endpoint, event))
    }
}
