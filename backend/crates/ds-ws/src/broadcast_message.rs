use crate::{Message, Result as WsErrorResult};

use axum::extract::ws::Utf8Bytes;

/// A message encoded once and shared by every recipient's outbound queue
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    /// Serialized JSON (ready to send on wire); clones share the buffer
    pub payload: Utf8Bytes,
    /// Message type for metrics/logging
    pub message_type: &'static str,
}

impl BroadcastMessage {
    pub fn encode(message: &Message) -> WsErrorResult<Self> {
        Ok(Self {
            payload: Utf8Bytes::from(message.encode()?),
            message_type: message.kind().metric_label(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.payload.as_str()
    }
}
