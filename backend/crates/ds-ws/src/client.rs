use crate::{
    BroadcastMessage, ClientId, ClientIdentity, ConnectionConfig, HubHandle, HubRegistry, Message,
    Metrics, Result as WsErrorResult, ShutdownGuard, WsError, create_connection_span,
};

use std::time::Duration;

use axum::extract::ws::{Message as WsMessage, WebSocket};
use bytes::Bytes;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use log::{debug, info, trace, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, timeout};
use tracing::Instrument;

/// Server-side state of one participant, registered with a hub but not yet
/// attached to its socket.
pub struct Client {
    client_id: ClientId,
    identity: ClientIdentity,
    hub: HubHandle,
    outbound_rx: mpsc::Receiver<BroadcastMessage>,
    config: ConnectionConfig,
    metrics: Metrics,
}

impl Client {
    /// Registration handshake with one specific hub.
    pub async fn register(
        hub: &HubHandle,
        identity: ClientIdentity,
        config: &ConnectionConfig,
        metrics: &Metrics,
    ) -> WsErrorResult<Self> {
        let client_id = ClientId::new();
        let (outbound_tx, outbound_rx) = mpsc::channel(config.send_buffer_size.max(1));

        hub.register(client_id, identity.clone(), outbound_tx).await?;

        Ok(Self {
            client_id,
            identity,
            hub: hub.clone(),
            outbound_rx,
            config: config.clone(),
            metrics: metrics.clone(),
        })
    }

    /// Register with the hub for `document_id`, creating it if needed.
    ///
    /// A hub can terminate between lookup and registration; the join then
    /// retries against the registry, which hands out a fresh hub.
    pub async fn join(
        registry: &HubRegistry,
        document_id: &str,
        identity: ClientIdentity,
        config: &ConnectionConfig,
        metrics: &Metrics,
    ) -> WsErrorResult<Self> {
        let attempts = config.join_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let hub = registry.get_or_create(document_id).await;
            match Self::register(&hub, identity.clone(), config, metrics).await {
                Ok(client) => return Ok(client),
                Err(e @ WsError::HubClosed { .. }) => {
                    debug!(
                        "Hub {} for document {} closed during join (attempt {}/{})",
                        hub.hub_id(),
                        document_id,
                        attempt,
                        attempts
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| WsError::hub_closed(document_id)))
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    /// Attach the socket and start the read and write loops.
    ///
    /// Returns immediately; the loops run until the connection ends.
    pub fn start(self, socket: WebSocket, shutdown_guard: ShutdownGuard) -> ClientId {
        let Self {
            client_id,
            identity,
            hub,
            outbound_rx,
            config,
            metrics,
        } = self;

        let span = create_connection_span(&client_id, hub.document_id(), &identity.user_id);
        let (ws_sender, ws_receiver) = socket.split();

        metrics.connection_established();
        info!(
            "Client {} ({}) connected to document {}",
            client_id,
            identity.display_name,
            hub.document_id()
        );

        tokio::spawn(
            write_pump(
                ws_sender,
                outbound_rx,
                config.heartbeat_interval(),
                client_id,
                metrics.clone(),
            )
            .instrument(span.clone()),
        );

        tokio::spawn(
            read_pump(
                ws_receiver,
                hub,
                client_id,
                config.heartbeat_timeout(),
                metrics,
                shutdown_guard,
            )
            .instrument(span),
        );

        client_id
    }
}

/// Register with `hub` and start serving `socket`.
///
/// Returns once the client is a member and both loops are running.
pub async fn connect(
    hub: &HubHandle,
    socket: WebSocket,
    identity: ClientIdentity,
    config: &ConnectionConfig,
    metrics: &Metrics,
    shutdown_guard: ShutdownGuard,
) -> WsErrorResult<ClientId> {
    let client = Client::register(hub, identity, config, metrics).await?;
    Ok(client.start(socket, shutdown_guard))
}

/// Forward client frames to the hub until the connection ends, then
/// unregister.
async fn read_pump(
    mut receiver: SplitStream<WebSocket>,
    hub: HubHandle,
    client_id: ClientId,
    read_timeout: Duration,
    metrics: Metrics,
    mut shutdown_guard: ShutdownGuard,
) {
    let reason = loop {
        let frame = tokio::select! {
            frame = timeout(read_timeout, receiver.next()) => frame,
            _ = shutdown_guard.wait() => {
                info!("Closing client {} for server shutdown", client_id);
                break "shutdown";
            }
        };

        let frame = match frame {
            Err(_) => {
                let timeout_error = WsError::heartbeat_timeout(read_timeout.as_secs());
                warn!("Client {}: {}", client_id, timeout_error);
                metrics.error_occurred(timeout_error.error_code());
                break "heartbeat_timeout";
            }
            Ok(None) => {
                debug!("Client {} stream ended", client_id);
                break "closed";
            }
            Ok(Some(Err(e))) => {
                warn!("Read error on client {}: {}", client_id, e);
                metrics.error_occurred("read");
                break "error";
            }
            Ok(Some(Ok(frame))) => frame,
        };

        let raw = match &frame {
            WsMessage::Text(text) => text.as_str(),
            WsMessage::Binary(data) => match std::str::from_utf8(data.as_ref()) {
                Ok(text) => text,
                Err(_) => {
                    warn!("Discarding non UTF-8 binary frame from client {}", client_id);
                    metrics.malformed_frame();
                    continue;
                }
            },
            // Liveness only; the deadline was already renewed.
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            WsMessage::Close(_) => {
                debug!("Client {} sent close frame", client_id);
                break "closed";
            }
        };

        let message = match Message::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!("Discarding malformed frame from client {}: {}", client_id, e);
                metrics.malformed_frame();
                continue;
            }
        };

        if message.is_heartbeat() {
            trace!("Heartbeat from client {}", client_id);
            continue;
        }

        // Forwarded as-is: the sender is not checked against the type it claims.
        metrics.message_received(message.kind().metric_label());
        if let Err(e) = hub.broadcast(message).await {
            info!("Client {} stops reading: {}", client_id, e);
            break "hub_closed";
        }
    };

    hub.unregister(client_id);
    metrics.connection_closed(reason);
    info!(
        "Client {} disconnected from document {} ({})",
        client_id,
        hub.document_id(),
        reason
    );
}

/// Write queued messages to the socket in order, pinging the peer between
/// them. Ends when the hub closes the queue or a write fails.
async fn write_pump(
    mut sender: SplitSink<WebSocket, WsMessage>,
    mut outbound_rx: mpsc::Receiver<BroadcastMessage>,
    heartbeat_interval: Duration,
    client_id: ClientId,
    metrics: Metrics,
) {
    let mut heartbeat = interval_at(Instant::now() + heartbeat_interval, heartbeat_interval);

    loop {
        tokio::select! {
            queued = outbound_rx.recv() => match queued {
                Some(message) => {
                    if let Err(e) = sender.send(WsMessage::Text(message.payload)).await {
                        debug!("Write to client {} failed: {}", client_id, e);
                        metrics.error_occurred("write");
                        break;
                    }
                    metrics.message_sent(message.message_type);
                }
                None => {
                    debug!("Outbound queue for client {} closed", client_id);
                    let _ = sender.send(WsMessage::Close(None)).await;
                    break;
                }
            },
            _ = heartbeat.tick() => {
                if let Err(e) = sender.send(WsMessage::Ping(Bytes::new())).await {
                    debug!("Ping to client {} failed: {}", client_id, e);
                    break;
                }
            }
        }
    }

    let _ = sender.close().await;
}
