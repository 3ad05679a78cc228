use metrics::{counter, gauge};

/// Metrics collector for hub and connection activity
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "ds_ws" }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}_connections_established", self.prefix)).increment(1);
        gauge!(format!("{}_connections_active", self.prefix)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, reason: &'static str) {
        counter!(format!("{}_connections_closed", self.prefix), "reason" => reason).increment(1);
        gauge!(format!("{}_connections_active", self.prefix)).decrement(1.0);
    }

    /// Record message received from client
    pub fn message_received(&self, message_type: &'static str) {
        counter!(format!("{}_messages_received", self.prefix), "type" => message_type)
            .increment(1);
    }

    /// Record message written to a client
    pub fn message_sent(&self, message_type: &'static str) {
        counter!(format!("{}_messages_sent", self.prefix), "type" => message_type).increment(1);
    }

    /// Record an inbound frame that could not be decoded
    pub fn malformed_frame(&self) {
        counter!(format!("{}_messages_malformed", self.prefix)).increment(1);
    }

    /// Record a hub fan-out
    pub fn broadcast_published(&self, message_type: &'static str, recipients: usize) {
        counter!(format!("{}_broadcasts_published", self.prefix), "type" => message_type)
            .increment(1);
        counter!(format!("{}_broadcast_recipients", self.prefix)).increment(recipients as u64);
    }

    /// Record a member dropped because its outbound queue was full or closed
    pub fn client_dropped(&self) {
        counter!(format!("{}_clients_dropped", self.prefix)).increment(1);
    }

    pub fn hub_created(&self) {
        counter!(format!("{}_hubs_created", self.prefix)).increment(1);
        gauge!(format!("{}_hubs_active", self.prefix)).increment(1.0);
    }

    pub fn hub_terminated(&self) {
        counter!(format!("{}_hubs_terminated", self.prefix)).increment(1);
        gauge!(format!("{}_hubs_active", self.prefix)).decrement(1.0);
    }

    /// Record error occurrence
    pub fn error_occurred(&self, error_type: &'static str) {
        counter!(format!("{}_errors", self.prefix), "type" => error_type).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
