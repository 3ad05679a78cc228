pub mod app_state;
pub mod broadcast_message;
pub mod client;
pub mod client_id;
pub mod client_identity;
pub mod connection_config;
pub mod error;
mod hub;
pub mod hub_handle;
pub mod hub_registry;
pub mod identity;
pub mod message;
pub mod metrics;
pub mod shutdown_coordinator;
pub mod shutdown_guard;

pub use app_state::{AppState, handler};
pub use broadcast_message::BroadcastMessage;
pub use client::{Client, connect};
pub use client_id::ClientId;
pub use client_identity::ClientIdentity;
pub use connection_config::ConnectionConfig;
pub use error::{Result, WsError};
pub use hub_handle::{HubHandle, HubId};
pub use hub_registry::HubRegistry;
pub use identity::resolve_identity;
pub use message::{Message, MessageType};
pub use metrics::Metrics;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one WebSocket connection.
/// All log entries from its read and write loops carry these fields.
pub fn create_connection_span(
    client_id: &ClientId,
    document_id: &str,
    user_id: &str,
) -> tracing::Span {
    info_span!(
        "ws_connection",
        client_id = %client_id,
        document_id = %document_id,
        user_id = %user_id,
    )
}
