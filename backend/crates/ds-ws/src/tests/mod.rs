
use crate::{BroadcastMessage, ClientId, ClientIdentity, HubHandle, HubRegistry, Metrics, WsError};

use tokio::sync::mpsc;
use tokio::time::{Duration, sleep, timeout};

pub(crate) const RECV_TIMEOUT: Duration = Duration::from_secs(1);

pub(crate) fn test_registry() -> HubRegistry {
    HubRegistry::new(64, Metrics::default())
}

/// Register a member with a queue of `capacity`, retrying through the
/// registry if the hub it found was shutting down.
pub(crate) async fn join(
    registry: &HubRegistry,
    document_id: &str,
    identity: ClientIdentity,
    capacity: usize,
) -> (ClientId, HubHandle, mpsc::Receiver<BroadcastMessage>) {
    for _ in 0..10 {
        let hub = registry.get_or_create(document_id).await;
        let client_id = ClientId::new();
        let (tx, rx) = mpsc::channel(capacity);

        match hub.register(client_id, identity.clone(), tx).await {
            Ok(()) => return (client_id, hub, rx),
            Err(WsError::HubClosed { .. }) => continue,
            Err(e) => panic!("unexpected register error: {e}"),
        }
    }
    panic!("could not join document {document_id}");
}

pub(crate) async fn recv_text(rx: &mut mpsc::Receiver<BroadcastMessage>) -> String {
    timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("outbound queue closed")
        .as_str()
        .to_string()
}

/// Wait until the hub has closed the queue, discarding anything still in it.
pub(crate) async fn expect_closed(rx: &mut mpsc::Receiver<BroadcastMessage>) -> Vec<String> {
    let mut leftover = Vec::new();
    timeout(RECV_TIMEOUT, async {
        while let Some(message) = rx.recv().await {
            leftover.push(message.as_str().to_string());
        }
    })
    .await
    .expect("outbound queue was never closed");
    leftover
}

pub(crate) async fn wait_until_removed(registry: &HubRegistry, document_id: &str) {
    timeout(RECV_TIMEOUT, async {
        while registry
            .document_ids()
            .await
            .iter()
            .any(|id| id == document_id)
        {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("hub was never removed from the registry");
}
