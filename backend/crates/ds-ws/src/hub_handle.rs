use crate::{BroadcastMessage, ClientId, ClientIdentity, Message, Result as WsErrorResult, WsError};

use std::sync::Arc;

use log::debug;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Identifies one hub instance; a document that empties and is reopened
/// gets a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HubId(Uuid);

impl HubId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for HubId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A client asking to join; acknowledged once it is a member.
pub(crate) struct Registration {
    pub client_id: ClientId,
    pub identity: ClientIdentity,
    pub outbound: mpsc::Sender<BroadcastMessage>,
    pub ack: oneshot::Sender<()>,
}

/// Non-owning handle on a running hub.
///
/// Only carries the hub's intake senders; all membership state stays
/// inside the hub task.
#[derive(Clone)]
pub struct HubHandle {
    hub_id: HubId,
    document_id: Arc<str>,
    register_tx: mpsc::Sender<Registration>,
    unregister_tx: mpsc::UnboundedSender<ClientId>,
    broadcast_tx: mpsc::Sender<Message>,
}

impl HubHandle {
    pub(crate) fn new(
        hub_id: HubId,
        document_id: Arc<str>,
        register_tx: mpsc::Sender<Registration>,
        unregister_tx: mpsc::UnboundedSender<ClientId>,
        broadcast_tx: mpsc::Sender<Message>,
    ) -> Self {
        Self {
            hub_id,
            document_id,
            register_tx,
            unregister_tx,
            broadcast_tx,
        }
    }

    pub fn hub_id(&self) -> HubId {
        self.hub_id
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// True once the hub has terminated and stopped accepting requests.
    pub fn is_closed(&self) -> bool {
        self.broadcast_tx.is_closed()
    }

    /// Add a client to the membership, waiting until the hub has accepted it.
    ///
    /// `outbound` must be the only sender of the client's queue: the hub
    /// closes the queue by dropping it.
    pub async fn register(
        &self,
        client_id: ClientId,
        identity: ClientIdentity,
        outbound: mpsc::Sender<BroadcastMessage>,
    ) -> WsErrorResult<()> {
        let (ack, accepted) = oneshot::channel();
        self.register_tx
            .send(Registration {
                client_id,
                identity,
                outbound,
                ack,
            })
            .await
            .map_err(|_| WsError::hub_closed(self.document_id()))?;

        accepted
            .await
            .map_err(|_| WsError::hub_closed(self.document_id()))
    }

    /// Remove a client. A no-op when the hub is already gone.
    pub fn unregister(&self, client_id: ClientId) {
        if self.unregister_tx.send(client_id).is_err() {
            debug!(
                "Hub {} already terminated, skipping unregister of client {}",
                self.hub_id, client_id
            );
        }
    }

    /// Queue a message for fan-out to every member.
    pub async fn broadcast(&self, message: Message) -> WsErrorResult<()> {
        self.broadcast_tx
            .send(message)
            .await
            .map_err(|_| WsError::hub_closed(self.document_id()))
    }

    /// Push an event from outside the realtime layer (e.g. a document
    /// save over HTTP) into this hub's fan-out.
    pub async fn inject_broadcast(&self, message: Message) -> WsErrorResult<()> {
        debug!(
            "Injecting '{}' into hub {} for document {}",
            message.kind(),
            self.hub_id,
            self.document_id
        );
        self.broadcast(message).await
    }
}

impl PartialEq for HubHandle {
    fn eq(&self, other: &Self) -> bool {
        self.hub_id == other.hub_id
    }
}

impl Eq for HubHandle {}

impl std::fmt::Debug for HubHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubHandle")
            .field("hub_id", &self.hub_id)
            .field("document_id", &self.document_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
