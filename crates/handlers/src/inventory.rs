//! Inventory recovery: shortages, expired lots, FIFO allocation conflicts.

use remedy_core::{CorrectiveRequest, DomainId, Endpoint, ErrorCode, Payload};

use crate::handler::{DomainHandler, NotHandled, Resolution};
use crate::payload::require;

pub const STOCK_SHORTAGE: &str = "STOCK_SHORTAGE";
pub const LOT_EXPIRED: &str = "LOT_EXPIRED";
pub const FIFO_CONFLICT: &str = "FIFO_CONFLICT";

const CODES: &[&str] = &[STOCK_SHORTAGE, LOT_EXPIRED, FIFO_CONFLICT];

#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryHandler;

impl DomainHandler for InventoryHandler {
    fn domain(&self) -> DomainId {
        DomainId::inventory()
    }

    fn codes(&self) -> &'static [&'static str] {
        CODES
    }

    fn resolve(&self, code: &ErrorCode, payload: &Payload) -> Resolution {
        let base = Endpoint::builder("/drawers/inventory");
        match code.as_str() {
            STOCK_SHORTAGE => {
                let item_id = require(payload, code, "item_id")?;
                let amount = require(payload, code, "required_amount")?;
                let endpoint = base
                    .route("restock")
                    .segment(&item_id)
                    .query("required_amount", &amount)
                    .build();
                Ok(CorrectiveRequest::awaiting(endpoint, "inventoryRestocked"))
            }
            LOT_EXPIRED => {
                let lot_id = require(payload, code, "lot_id")?;
                let endpoint = base.route("expired-lot").segment(&lot_id).build();
                Ok(CorrectiveRequest::awaiting(endpoint, "expiredLotHandled"))
            }
            FIFO_CONFLICT => {
                let item_id = require(payload, code, "item_id")?;
                let endpoint = base.route("fifo-conflict").segment(&item_id).build();
                Ok(CorrectiveRequest::awaiting(endpoint, "fifoConflictResolved"))
            }
            _ => Err(NotHandled::UnknownCode {
                domain: self.domain(),
                code: code.clone(),
            }),
        }
    }
}
