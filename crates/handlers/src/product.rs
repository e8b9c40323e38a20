//! Product publishing recovery: SKU conflicts and pricing errors.

use remedy_core::{CorrectiveRequest, DomainId, Endpoint, ErrorCode, Payload};

use crate::handler::{DomainHandler, NotHandled, Resolution};
use crate::payload::require;

pub const SKU_CONFLICT: &str = "SKU_CONFLICT";
pub const PRICING_ERROR: &str = "PRICING_ERROR";

const CODES: &[&str] = &[SKU_CONFLICT, PRICING_ERROR];

#[derive(Debug, Default, Clone, Copy)]
pub struct ProductHandler;

impl DomainHandler for ProductHandler {
    fn domain(&self) -> DomainId {
        DomainId::product()
    }

    fn codes(&self) -> &'static [&'static str] {
        CODES
    }

    fn resolve(&self, code: &ErrorCode, payload: &Payload) -> Resolution {
        let base = Endpoint::builder("/drawers/product");
        match code.as_str() {
            SKU_CONFLICT => {
                let product_id = require(payload, code, "product_id")?;
                let sku = require(payload, code, "sku")?;
                let endpoint = base
                    .route("sku-conflict")
                    .segment(&product_id)
                    .query("sku", &sku)
                    .build();
                Ok(CorrectiveRequest::awaiting(endpoint, "skuConflictResolved"))
            }
            PRICING_ERROR => {
                let product_id = require(payload, code, "product_id")?;
                let endpoint = base.route("pricing").segment(&product_id).build();
                Ok(CorrectiveRequest::awaiting(endpoint, "pricingFixed"))
            }
            _ => Err(NotHandled::UnknownCode {
                domain: self.domain(),
                code: code.clone(),
            }),
        }
    }
}
