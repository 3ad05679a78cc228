use crate::hub::Hub;
use crate::{HubHandle, HubId, Metrics};

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::RwLock;

/// Process-wide directory of live hubs, one per document.
///
/// Hubs are created on first use and remove themselves once their last
/// member leaves. The lock only guards map bookkeeping.
#[derive(Clone)]
pub struct HubRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    metrics: Metrics,
    intake_capacity: usize,
}

struct RegistryInner {
    hubs: HashMap<String, HubHandle>,
}

impl HubRegistry {
    pub fn new(intake_capacity: usize, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                hubs: HashMap::new(),
            })),
            metrics,
            intake_capacity: intake_capacity.max(1),
        }
    }

    /// Return the live hub for `document_id`, starting one if needed.
    ///
    /// Concurrent callers for the same document all get the same hub.
    pub async fn get_or_create(&self, document_id: &str) -> HubHandle {
        let mut inner = self.inner.write().await;

        if let Some(hub) = inner.hubs.get(document_id)
            && !hub.is_closed()
        {
            return hub.clone();
        }

        let hub = Hub::spawn(
            document_id,
            self.clone(),
            self.metrics.clone(),
            self.intake_capacity,
        );
        inner.hubs.insert(document_id.to_string(), hub.clone());

        info!(
            "Created hub {} for document {} ({} active)",
            hub.hub_id(),
            document_id,
            inner.hubs.len()
        );

        hub
    }

    /// Look up a live hub without creating one.
    pub async fn get(&self, document_id: &str) -> Option<HubHandle> {
        let inner = self.inner.read().await;
        inner
            .hubs
            .get(document_id)
            .filter(|hub| !hub.is_closed())
            .cloned()
    }

    /// Drop the entry for `document_id` if it still points at `hub_id`.
    ///
    /// Called by a hub on its way out; a replacement created in the meantime
    /// is left alone.
    pub(crate) async fn remove(&self, document_id: &str, hub_id: HubId) -> bool {
        let mut inner = self.inner.write().await;

        match inner.hubs.get(document_id) {
            Some(current) if current.hub_id() == hub_id => {
                inner.hubs.remove(document_id);
                info!(
                    "Removed hub {} for document {} ({} active)",
                    hub_id,
                    document_id,
                    inner.hubs.len()
                );
                true
            }
            _ => {
                debug!(
                    "Hub {} for document {} was already replaced",
                    hub_id, document_id
                );
                false
            }
        }
    }

    /// Number of documents with a hub entry
    pub async fn hub_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.hubs.len()
    }

    /// Documents that currently have a hub entry
    pub async fn document_ids(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        inner.hubs.keys().cloned().collect()
    }
}
