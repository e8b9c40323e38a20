//! Recovery configuration.

use thiserror::Error;
use tracing::warn;

pub const ENV_MAX_RECOVERY_CYCLES: &str = "REMEDY_MAX_RECOVERY_CYCLES";
pub const ENV_DRAWER_BASE_PATH: &str = "REMEDY_DRAWER_BASE_PATH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Orchestrator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// How many corrective drawers one logical action may open. `1` means a
    /// recoverable failure on retry is final.
    max_recovery_cycles: u32,
    /// Prefix applied to every drawer endpoint (e.g. `/app`).
    drawer_base_path: Option<String>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_recovery_cycles: 1,
            drawer_base_path: None,
        }
    }
}

impl RecoveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values below 1 are clamped to 1: every action gets one recovery.
    pub fn with_max_recovery_cycles(mut self, cycles: u32) -> Self {
        if cycles == 0 {
            warn!("max_recovery_cycles of 0 clamped to 1");
        }
        self.max_recovery_cycles = cycles.max(1);
        self
    }

    pub fn with_drawer_base_path(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.drawer_base_path = (!base.trim().is_empty()).then_some(base);
        self
    }

    pub fn max_recovery_cycles(&self) -> u32 {
        self.max_recovery_cycles
    }

    pub fn drawer_base_path(&self) -> Option<&str> {
        self.drawer_base_path.as_deref()
    }

    /// Load from `REMEDY_MAX_RECOVERY_CYCLES` and `REMEDY_DRAWER_BASE_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MAX_RECOVERY_CYCLES) {
            let cycles = raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidValue {
                key: ENV_MAX_RECOVERY_CYCLES,
                value: raw.clone(),
                reason: e.to_string(),
            })?;
            config = config.with_max_recovery_cycles(cycles);
        }

        if let Some(base) = lookup(ENV_DRAWER_BASE_PATH) {
            if !base.trim().is_empty() && !base.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    key: ENV_DRAWER_BASE_PATH,
                    value: base,
                    reason: "must start with `/`".to_string(),
                });
            }
            config = config.with_drawer_base_path(base);
        }

        Ok(config)
    }
}
