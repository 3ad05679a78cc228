use std::time::Duration;

/// Configuration for WebSocket clients
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound queue capacity (a full queue gets the client dropped)
    pub send_buffer_size: usize,
    /// Server ping interval in seconds
    pub heartbeat_interval_secs: u64,
    /// Read deadline in seconds
    pub heartbeat_timeout_secs: u64,
    /// Join retries when racing a hub that is shutting down
    pub join_attempts: u32,
}

impl ConnectionConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 256,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 60,
            join_attempts: 3,
        }
    }
}
