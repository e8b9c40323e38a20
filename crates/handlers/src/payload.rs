//! Payload field extraction shared by the built-in handlers.

use remedy_core::{ErrorCode, Payload};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::handler::NotHandled;

/// Read a required identifier field as text.
///
/// Strings, numbers and booleans are accepted; `null`, empty strings, arrays
/// and objects count as missing. A missing field is logged as a data defect
/// and returned as [`NotHandled::MissingField`].
pub fn require(payload: &Payload, code: &ErrorCode, field: &'static str) -> Result<String, NotHandled> {
    match payload.get(field).and_then(render) {
        Some(value) => Ok(value),
        None => {
            warn!(%code, field, "payload is missing a field required for recovery");
            Err(NotHandled::MissingField {
                code: code.clone(),
                field,
            })
        }
    }
}

fn render(value: &JsonValue) -> Option<String> {
    let text = match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: JsonValue) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn scalars_are_rendered() {
        let code = ErrorCode::new("STOCK_SHORTAGE");
        let p = payload(json!({ "item_id": "I1", "required_amount": 5, "scale": 2.5, "flag": true }));
        assert_eq!(require(&p, &code, "item_id").unwrap(), "I1");
        assert_eq!(require(&p, &code, "required_amount").unwrap(), "5");
        assert_eq!(require(&p, &code, "scale").unwrap(), "2.5");
        assert_eq!(require(&p, &code, "flag").unwrap(), "true");
    }

    #[test]
    fn blanks_and_containers_are_missing() {
        let code = ErrorCode::new("STOCK_SHORTAGE");
        let p = payload(json!({ "a": null, "b": "  ", "c": [1], "d": {} }));
        for field in ["a", "b", "c", "d", "absent"] {
            assert_eq!(
                require(&p, &code, field),
                Err(NotHandled::MissingField { code: code.clone(), field })
            );
        }
    }
}
