//! Administrative endpoints.

use crate::ApiResult;
use crate::api::ApiError;

use ds_ws::{AppState, Message, WsError};

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, header::AUTHORIZATION},
};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub document_id: String,
    /// False when nobody had the document open
    pub delivered: bool,
}

/// POST /admin/documents/{id}/broadcast
///
/// Pushes a wire message into the document's hub, for changes made outside
/// the realtime channel (e.g. a save through the REST API). No hub is
/// started for a document nobody has open.
///
/// With authentication enabled the caller must present a valid bearer token.
pub async fn broadcast_handler(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<Json<BroadcastResponse>> {
    if state.shutdown.is_shutdown() {
        return Err(ApiError::unavailable("Server is shutting down"));
    }

    authorize(&state, &headers)?;

    let message = Message::decode(&body)?;
    if message.is_heartbeat() {
        return Err(ApiError::bad_request("ping messages cannot be broadcast"));
    }

    let delivered = match state.hubs.get(&document_id).await {
        Some(hub) => match hub.inject_broadcast(message).await {
            Ok(()) => true,
            Err(WsError::HubClosed { .. }) => {
                debug!("Hub for document {} closed before injection", document_id);
                false
            }
            Err(e) => return Err(e.into()),
        },
        None => false,
    };

    info!(
        "Admin broadcast to document {} (delivered: {})",
        document_id, delivered
    );

    Ok(Json(BroadcastResponse {
        document_id,
        delivered,
    }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let Some(validator) = state.jwt_validator.as_deref() else {
        return Ok(());
    };

    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let claims = validator.validate(ds_auth::bearer_token(header)?)?;
    debug!("Admin broadcast authorized for user {}", claims.sub);

    Ok(())
}
