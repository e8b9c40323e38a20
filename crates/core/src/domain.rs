//! Domain and error-code vocabulary.

use serde::{Deserialize, Serialize};

/// Name of a subsystem whose failures share a recovery vocabulary.
///
/// The set is open: a new domain exists as soon as a handler is registered
/// for it. Values are normalized (trimmed, lowercased) on construction so
/// `"Inventory "` and `"inventory"` route to the same handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub struct DomainId(String);

impl DomainId {
    pub const BATCH: &'static str = "batch";
    pub const INVENTORY: &'static str = "inventory";
    pub const CONVERSION: &'static str = "conversion";
    pub const RECIPE: &'static str = "recipe";
    pub const PRODUCT: &'static str = "product";

    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_ascii_lowercase())
    }

    pub fn batch() -> Self {
        Self::new(Self::BATCH)
    }

    pub fn inventory() -> Self {
        Self::new(Self::INVENTORY)
    }

    pub fn conversion() -> Self {
        Self::new(Self::CONVERSION)
    }

    pub fn recipe() -> Self {
        Self::new(Self::RECIPE)
    }

    pub fn product() -> Self {
        Self::new(Self::PRODUCT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for DomainId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for DomainId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<DomainId> for String {
    fn from(value: DomainId) -> Self {
        value.0
    }
}

impl core::fmt::Display for DomainId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error code, meaningful only within its [`DomainId`].
///
/// The same code string in two domains is unrelated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub struct ErrorCode(String);

impl ErrorCode {
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ErrorCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ErrorCode> for String {
    fn from(value: ErrorCode) -> Self {
        value.0
    }
}

impl PartialEq<str> for ErrorCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ErrorCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_ids_are_normalized() {
        assert_eq!(DomainId::new("  Inventory "), DomainId::inventory());
        assert_eq!(DomainId::from("BATCH").as_str(), "batch");
    }

    #[test]
    fn codes_are_trimmed_but_case_preserved() {
        let code = ErrorCode::new(" STOCK_SHORTAGE\n");
        assert_eq!(code, "STOCK_SHORTAGE");
        assert_ne!(ErrorCode::new("stock_shortage"), code);
    }

    #[test]
    fn serde_normalizes_on_the_way_in() {
        let domain: DomainId = serde_json::from_str("\" Recipe\"").unwrap();
        assert_eq!(domain, DomainId::recipe());
        assert_eq!(serde_json::to_string(&domain).unwrap(), "\"recipe\"");
    }
}
