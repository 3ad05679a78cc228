use crate::{
    Client, ClientIdentity, ConnectionConfig, HubRegistry, Metrics, ShutdownCoordinator, WsError,
    identity,
};
use axum::{
    extract::{
        Query, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use ds_auth::JwtValidator;

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, warn};

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    /// Present when authentication is enabled
    pub jwt_validator: Option<Arc<JwtValidator>>,
    pub hubs: HubRegistry,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Result<Response, (StatusCode, &'static str)> {
    if state.shutdown.is_shutdown() {
        return Err((StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down"));
    }

    let document_id = identity::document_id(&params)
        .map_err(|_| (StatusCode::BAD_REQUEST, "Missing document ID"))?
        .to_string();

    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let identity = identity::resolve_identity(
        &params,
        authorization,
        state.jwt_validator.as_deref(),
    )
    .map_err(|e| {
        state.metrics.error_occurred(e.error_code());
        debug!("Upgrade rejected: {}", e);
        (StatusCode::UNAUTHORIZED, "Unauthorized")
    })?;

    debug!(
        "WebSocket upgrade for document {} from {}",
        document_id, identity.user_id
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, document_id, identity, state)))
}

/// Join the document's hub and hand the socket to the client pumps
async fn handle_socket(
    socket: WebSocket,
    document_id: String,
    identity: ClientIdentity,
    state: AppState,
) {
    let client = match Client::join(
        &state.hubs,
        &document_id,
        identity,
        &state.config,
        &state.metrics,
    )
    .await
    {
        Ok(client) => client,
        Err(e @ WsError::HubClosed { .. }) => {
            warn!("Giving up joining document {}: {}", document_id, e);
            state.metrics.error_occurred(e.error_code());
            return;
        }
        Err(e) => {
            error!("Failed to join document {}: {}", document_id, e);
            state.metrics.error_occurred(e.error_code());
            return;
        }
    };

    client.start(socket, state.shutdown.subscribe_guard());
}
