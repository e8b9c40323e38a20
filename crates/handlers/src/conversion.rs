//! Unit conversion recovery: densities, custom mappings, unknown units.
//!
//! Unknown-unit codes are the exception to the usual replay contract: they
//! open the standalone unit-management surface and are considered handled
//! once it is open. The original conversion is never replayed automatically.

use remedy_core::{CorrectiveRequest, DomainId, Endpoint, ErrorCode, Payload};

use crate::handler::{DomainHandler, NotHandled, Resolution};
use crate::payload::require;

pub const MISSING_DENSITY: &str = "MISSING_DENSITY";
pub const MISSING_CUSTOM_MAPPING: &str = "MISSING_CUSTOM_MAPPING";
pub const UNSUPPORTED_CONVERSION: &str = "UNSUPPORTED_CONVERSION";
pub const UNKNOWN_SOURCE_UNIT: &str = "UNKNOWN_SOURCE_UNIT";
pub const UNKNOWN_TARGET_UNIT: &str = "UNKNOWN_TARGET_UNIT";

const CODES: &[&str] = &[
    MISSING_DENSITY,
    MISSING_CUSTOM_MAPPING,
    UNSUPPORTED_CONVERSION,
    UNKNOWN_SOURCE_UNIT,
    UNKNOWN_TARGET_UNIT,
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ConversionHandler;

impl DomainHandler for ConversionHandler {
    fn domain(&self) -> DomainId {
        DomainId::conversion()
    }

    fn codes(&self) -> &'static [&'static str] {
        CODES
    }

    fn resolve(&self, code: &ErrorCode, payload: &Payload) -> Resolution {
        match code.as_str() {
            MISSING_DENSITY => {
                let ingredient_id = require(payload, code, "ingredient_id")?;
                let endpoint = Endpoint::builder("/drawers/conversion")
                    .route("density")
                    .segment(&ingredient_id)
                    .build();
                Ok(CorrectiveRequest::awaiting(endpoint, "densityUpdated"))
            }
            MISSING_CUSTOM_MAPPING | UNSUPPORTED_CONVERSION => {
                let from_unit = require(payload, code, "from_unit")?;
                let to_unit = require(payload, code, "to_unit")?;
                let endpoint = Endpoint::builder("/drawers/conversion")
                    .route("unit-mapping")
                    .query("from_unit", &from_unit)
                    .query("to_unit", &to_unit)
                    .build();
                Ok(CorrectiveRequest::awaiting(endpoint, "unitMappingCreated"))
            }
            UNKNOWN_SOURCE_UNIT | UNKNOWN_TARGET_UNIT => {
                let unit = require(payload, code, "unit")?;
                let endpoint = Endpoint::builder("/units/manage")
                    .query("unit", &unit)
                    .build();
                Ok(CorrectiveRequest::standalone(endpoint))
            }
            _ => Err(NotHandled::UnknownCode {
                domain: self.domain(),
                code: code.clone(),
            }),
        }
    }
}
