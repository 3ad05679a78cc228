use crate::{ConfigError, ConfigErrorResult, ConfigSection};

use serde::Deserialize;

pub const MIN_INTAKE_CAPACITY: usize = 1;
pub const MAX_INTAKE_CAPACITY: usize = 65536;
pub const DEFAULT_INTAKE_CAPACITY: usize = 256;

pub const MIN_JOIN_ATTEMPTS: u32 = 1;
pub const MAX_JOIN_ATTEMPTS: u32 = 10;
pub const DEFAULT_JOIN_ATTEMPTS: u32 = 3;

/// Per-document hub settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Capacity of the register and broadcast intake channels
    pub intake_capacity: usize,
    /// How often a join retries when it races a hub that is shutting down
    pub join_attempts: u32,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            intake_capacity: DEFAULT_INTAKE_CAPACITY,
            join_attempts: DEFAULT_JOIN_ATTEMPTS,
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        ConfigError::check_range(
            ConfigSection::Hub,
            "intake_capacity",
            MIN_INTAKE_CAPACITY as u64,
            MAX_INTAKE_CAPACITY as u64,
            self.intake_capacity as u64,
        )?;
        ConfigError::check_range(
            ConfigSection::Hub,
            "join_attempts",
            u64::from(MIN_JOIN_ATTEMPTS),
            u64::from(MAX_JOIN_ATTEMPTS),
            u64::from(self.join_attempts),
        )
    }
}
