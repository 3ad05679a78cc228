use crate::hub_handle::Registration;
use crate::{
    BroadcastMessage, ClientId, ClientIdentity, HubHandle, HubId, HubRegistry, Message, Metrics,
};

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// What the control loop does after handling a request.
///
/// `Empty` ends the loop; the hub then passes through [`Hub::terminate`]
/// and is terminated for good. There is no way back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HubState {
    Active,
    Empty,
}

struct Member {
    identity: ClientIdentity,
    /// Sole sender of the client's outbound queue; dropping it closes the queue.
    outbound: mpsc::Sender<BroadcastMessage>,
}

/// Per-document coordinator.
///
/// Owns the membership set and is its only writer. Register, unregister and
/// broadcast requests arrive on three channels and are handled one at a
/// time, so no request ever observes another one half-applied.
pub(crate) struct Hub {
    hub_id: HubId,
    document_id: Arc<str>,
    members: HashMap<ClientId, Member>,
    registry: HubRegistry,
    metrics: Metrics,
    register_rx: mpsc::Receiver<Registration>,
    unregister_rx: mpsc::UnboundedReceiver<ClientId>,
    broadcast_rx: mpsc::Receiver<Message>,
}

impl Hub {
    /// Start the control loop for `document_id` and return a handle on it.
    pub(crate) fn spawn(
        document_id: &str,
        registry: HubRegistry,
        metrics: Metrics,
        intake_capacity: usize,
    ) -> HubHandle {
        let hub_id = HubId::new();
        let document_id: Arc<str> = Arc::from(document_id);

        let (register_tx, register_rx) = mpsc::channel(intake_capacity);
        let (unregister_tx, unregister_rx) = mpsc::unbounded_channel();
        let (broadcast_tx, broadcast_rx) = mpsc::channel(intake_capacity);

        let hub = Hub {
            hub_id,
            document_id: Arc::clone(&document_id),
            members: HashMap::new(),
            registry,
            metrics,
            register_rx,
            unregister_rx,
            broadcast_rx,
        };
        tokio::spawn(hub.run());

        HubHandle::new(
            hub_id,
            document_id,
            register_tx,
            unregister_tx,
            broadcast_tx,
        )
    }

    async fn run(mut self) {
        info!("Hub {} started for document {}", self.hub_id, self.document_id);
        self.metrics.hub_created();

        loop {
            // Pending broadcasts go out before pending unregisters, so a
            // client's last messages reach the others ahead of its user_left.
            let state = tokio::select! {
                biased;
                Some(registration) = self.register_rx.recv() => self.handle_register(registration),
                Some(message) = self.broadcast_rx.recv() => self.handle_broadcast(message),
                Some(client_id) = self.unregister_rx.recv() => self.handle_unregister(client_id),
                else => HubState::Empty,
            };

            if state == HubState::Empty {
                break;
            }
        }

        self.terminate().await;
    }

    fn handle_register(&mut self, registration: Registration) -> HubState {
        let Registration {
            client_id,
            identity,
            outbound,
            ack,
        } = registration;

        if ack.send(()).is_err() {
            debug!(
                "Client {} gave up joining document {} before it was accepted",
                client_id, self.document_id
            );
            return self.state();
        }

        let announce = identity.announces_presence().then(|| {
            Message::user_joined(&self.document_id, &identity)
        });

        self.members.insert(client_id, Member { identity, outbound });
        info!(
            "Client {} joined document {} ({} members)",
            client_id,
            self.document_id,
            self.members.len()
        );

        if let Some(joined) = announce {
            self.fan_out(&joined, Some(client_id));
        }

        self.state()
    }

    fn handle_unregister(&mut self, client_id: ClientId) -> HubState {
        let Some(member) = self.members.remove(&client_id) else {
            debug!(
                "Client {} already left document {}",
                client_id, self.document_id
            );
            return HubState::Active;
        };

        let Member { identity, outbound } = member;
        drop(outbound);

        info!(
            "Client {} left document {} ({} members)",
            client_id,
            self.document_id,
            self.members.len()
        );

        if identity.announces_presence() && !self.members.is_empty() {
            let left = Message::user_left(&self.document_id, &identity);
            self.fan_out(&left, None);
        }

        self.state()
    }

    fn handle_broadcast(&mut self, message: Message) -> HubState {
        let had_members = !self.members.is_empty();
        let delivered = self.fan_out(&message, None);

        debug!(
            "Broadcast '{}' to {} members of document {}",
            message.kind(),
            delivered,
            self.document_id
        );

        // A broadcast only empties the hub by dropping its last slow member.
        if had_members {
            self.state()
        } else {
            HubState::Active
        }
    }

    /// Encode once and offer the message to every member except `exclude`.
    ///
    /// Members whose queue is full or closed are removed on the spot,
    /// without a `user_left` event. Returns the number of members reached.
    fn fan_out(&mut self, message: &Message, exclude: Option<ClientId>) -> usize {
        let encoded = match BroadcastMessage::encode(message) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(
                    "Failed to encode '{}' for document {}: {}",
                    message.kind(),
                    self.document_id,
                    e
                );
                self.metrics.error_occurred("encode");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut dropped = Vec::new();

        for (client_id, member) in &self.members {
            if exclude == Some(*client_id) {
                continue;
            }

            match member.outbound.try_send(encoded.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "Client {} is too slow, dropping it from document {}",
                        client_id, self.document_id
                    );
                    dropped.push(*client_id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(
                        "Client {} stopped reading, dropping it from document {}",
                        client_id, self.document_id
                    );
                    dropped.push(*client_id);
                }
            }
        }

        for client_id in dropped {
            if self.members.remove(&client_id).is_some() {
                self.metrics.client_dropped();
            }
        }

        self.metrics
            .broadcast_published(encoded.message_type, delivered);

        delivered
    }

    fn state(&self) -> HubState {
        if self.members.is_empty() {
            HubState::Empty
        } else {
            HubState::Active
        }
    }

    /// Transition into the terminated state. Intake is closed for good and
    /// the registry entry is released; a later join creates a new hub.
    async fn terminate(&mut self) {
        // Shut intake first so the registry stops handing out this hub and
        // pending joiners fail over to a fresh one.
        self.register_rx.close();
        self.unregister_rx.close();
        self.broadcast_rx.close();

        self.registry.remove(&self.document_id, self.hub_id).await;
        self.metrics.hub_terminated();

        info!(
            "Hub {} for document {} terminated",
            self.hub_id, self.document_id
        );
    }
}
