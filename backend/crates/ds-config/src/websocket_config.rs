use crate::{ConfigError, ConfigErrorResult, ConfigSection};

use serde::Deserialize;

// Per-client outbound queue constraints
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 256;

// Heartbeat interval constraints (seconds)
pub const MIN_HEARTBEAT_INTERVAL_SECS: u64 = 5;
pub const MAX_HEARTBEAT_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 30;

// Read deadline constraints (seconds)
pub const MIN_HEARTBEAT_TIMEOUT_SECS: u64 = 10;
pub const MAX_HEARTBEAT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_HEARTBEAT_TIMEOUT_SECS: u64 = 60;

/// Per-connection settings: outbound queue depth, server ping cadence and
/// the read deadline a silent client is disconnected after.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outbound queue capacity per client; a full queue drops the client
    pub send_buffer_size: usize,
    /// Server ping interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Read deadline in seconds, renewed by every received frame
    pub heartbeat_timeout_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
        }
    }
}

impl WebSocketConfig {
    /// The read deadline must outlast the ping interval.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        ConfigError::check_range(
            ConfigSection::WebSocket,
            "send_buffer_size",
            MIN_SEND_BUFFER_SIZE as u64,
            MAX_SEND_BUFFER_SIZE as u64,
            self.send_buffer_size as u64,
        )?;
        ConfigError::check_range(
            ConfigSection::WebSocket,
            "heartbeat_interval_secs",
            MIN_HEARTBEAT_INTERVAL_SECS,
            MAX_HEARTBEAT_INTERVAL_SECS,
            self.heartbeat_interval_secs,
        )?;
        ConfigError::check_range(
            ConfigSection::WebSocket,
            "heartbeat_timeout_secs",
            MIN_HEARTBEAT_TIMEOUT_SECS,
            MAX_HEARTBEAT_TIMEOUT_SECS,
            self.heartbeat_timeout_secs,
        )?;

        if self.heartbeat_timeout_secs <= self.heartbeat_interval_secs {
            return Err(ConfigError::invalid(
                ConfigSection::WebSocket,
                format!(
                    "heartbeat_timeout_secs ({}) must be greater than heartbeat_interval_secs ({})",
                    self.heartbeat_timeout_secs, self.heartbeat_interval_secs
                ),
            ));
        }

        Ok(())
    }
}
