//! Recipe recovery: missing ingredients, scaling and yield problems.

use remedy_core::{CorrectiveRequest, DomainId, Endpoint, ErrorCode, Payload};

use crate::handler::{DomainHandler, NotHandled, Resolution};
use crate::payload::require;

pub const MISSING_INGREDIENT: &str = "MISSING_INGREDIENT";
pub const SCALING_VALIDATION: &str = "SCALING_VALIDATION";
pub const INVALID_YIELD: &str = "INVALID_YIELD";

const CODES: &[&str] = &[MISSING_INGREDIENT, SCALING_VALIDATION, INVALID_YIELD];

#[derive(Debug, Default, Clone, Copy)]
pub struct RecipeHandler;

impl DomainHandler for RecipeHandler {
    fn domain(&self) -> DomainId {
        DomainId::recipe()
    }

    fn codes(&self) -> &'static [&'static str] {
        CODES
    }

    fn resolve(&self, code: &ErrorCode, payload: &Payload) -> Resolution {
        let base = Endpoint::builder("/drawers/recipe");
        match code.as_str() {
            MISSING_INGREDIENT => {
                let recipe_id = require(payload, code, "recipe_id")?;
                let endpoint = base.route("missing-ingredient").segment(&recipe_id).build();
                Ok(CorrectiveRequest::awaiting(endpoint, "ingredientAdded"))
            }
            SCALING_VALIDATION => {
                let recipe_id = require(payload, code, "recipe_id")?;
                let scale = require(payload, code, "scale")?;
                let detail = require(payload, code, "error_detail")?;
                let endpoint = base
                    .route("scaling")
                    .segment(&recipe_id)
                    .query("scale", &scale)
                    .query("error", &detail)
                    .build();
                Ok(CorrectiveRequest::awaiting(endpoint, "recipeScalingFixed"))
            }
            INVALID_YIELD => {
                let recipe_id = require(payload, code, "recipe_id")?;
                let endpoint = base.route("yield").segment(&recipe_id).build();
                Ok(CorrectiveRequest::awaiting(endpoint, "recipeYieldFixed"))
            }
            _ => Err(NotHandled::UnknownCode {
                domain: self.domain(),
                code: code.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn scaling_carries_scale_and_detail() {
        let req = RecipeHandler
            .resolve(
                &ErrorCode::new(SCALING_VALIDATION),
                &payload(json!({ "recipe_id": "R1", "scale": 2.5, "error_detail": "yield < 0" })),
            )
            .unwrap();
        assert_eq!(
            req.endpoint().as_str(),
            "/drawers/recipe/scaling/R1?scale=2.5&error=yield+%3C+0"
        );
        assert_eq!(req.completion_event(), Some("recipeScalingFixed"));
    }

    #[test]
    fn scaling_without_detail_is_not_handled() {
        let err = RecipeHandler
            .resolve(
                &ErrorCode::new(SCALING_VALIDATION),
                &payload(json!({ "recipe_id": "R1", "scale": 2 })),
            )
            .unwrap_err();
        assert!(matches!(err, NotHandled::MissingField { field: "error_detail", .. }));
    }

    #[test]
    fn ingredient_and_yield_codes() {
        let p = payload(json!({ "recipe_id": "R1" }));
        let req = RecipeHandler.resolve(&ErrorCode::new(MISSING_INGREDIENT), &p).unwrap();
        assert_eq!(req.endpoint().as_str(), "/drawers/recipe/missing-ingredient/R1");
        assert_eq!(req.completion_event(), Some("ingredientAdded"));

        let req = RecipeHandler.resolve(&ErrorCode::new(INVALID_YIELD), &p).unwrap();
        assert_eq!(req.endpoint().as_str(), "/drawers/recipe/yield/R1");
        assert_eq!(req.completion_event(), Some("recipeYieldFixed"));
    }
}
