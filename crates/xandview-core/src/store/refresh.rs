// ── Refresh application logic ──
//
// Applies one fetch cycle's results to the DataStore. A failed cycle
// records its error and leaves the previous snapshot in place.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::DataStore;
use super::data_store::NodeIndex;
use crate::fetch::FetchOutcome;
use crate::model::{NetworkMetrics, NodeRecord};

/// Everything fetched during a single refresh cycle.
#[derive(Debug, Clone)]
pub struct RefreshSnapshot {
    pub nodes: FetchOutcome<Arc<Vec<NodeRecord>>>,
    pub metrics: FetchOutcome<NetworkMetrics>,
}

impl RefreshSnapshot {
    pub fn error(&self) -> Option<&str> {
        self.nodes.error.as_deref().or(self.metrics.error.as_deref())
    }
}

impl DataStore {
    /// Publish a refresh cycle. Returns `true` if a new snapshot was published.
    pub fn apply(&self, snap: RefreshSnapshot) -> bool {
        if let Some(error) = snap.error() {
            warn!(error, "refresh failed, keeping previous snapshot");
            let error = error.to_owned();
            self.last_error.send_replace(Some(error));
            return false;
        }

        let nodes = snap.nodes.data;
        debug!(count = nodes.len(), cached = snap.nodes.cached, "publishing node snapshot");

        self.index.send_replace(NodeIndex::build(Arc::clone(&nodes)));
        self.nodes.send_replace(nodes);
        self.metrics.send_replace(snap.metrics.data);
        self.last_refresh.send_replace(Some(Utc::now()));
        self.last_error.send_replace(None);
        true
    }
}
