//! Identifiers for actions and drawer instances.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid identifier: {0}")]
pub struct InvalidId(String);

/// Identifier of one opened corrective surface.
///
/// Completion and dismissal signals are scoped to a `DrawerId`, so two drawers
/// listening for the same event name never see each other's signals.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawerId(Uuid);

impl DrawerId {
    /// Create a new identifier (UUIDv7, time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DrawerId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for DrawerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for DrawerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for DrawerId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s).map_err(|e| InvalidId(format!("DrawerId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Logical source of a user action (e.g. `"batch.start:B1"`).
///
/// At most one recovery runs per key; errors from independent keys recover
/// concurrently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(String);

impl ActionKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A key no other action shares.
    pub fn unique() -> Self {
        Self(format!("action:{}", Uuid::now_v7()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ActionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
