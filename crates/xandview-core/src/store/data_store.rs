// ── Central reactive data store ──
//
// Holds the latest node collection and its aggregate. Every publish is
// broadcast to subscribers via `watch` channels.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{NetworkMetrics, NodeId, NodeRecord};
use crate::stream::SnapshotStream;

/// Id lookup table paired with the snapshot its positions point into.
#[derive(Debug, Default)]
pub(crate) struct NodeIndex {
    pub(crate) nodes: Arc<Vec<NodeRecord>>,
    pub(crate) positions: HashMap<NodeId, usize>,
}

impl NodeIndex {
    pub(crate) fn build(nodes: Arc<Vec<NodeRecord>>) -> Self {
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.node_id.clone(), position))
            .collect();
        Self { nodes, positions }
    }

    fn get(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.positions.get(id).and_then(|&position| self.nodes.get(position))
    }
}

/// Latest dashboard state.
///
/// Reads are cheap `Arc` clones; a refresh replaces the whole snapshot at
/// once, so readers never see a half-applied collection.
pub struct DataStore {
    pub(crate) nodes: watch::Sender<Arc<Vec<NodeRecord>>>,
    /// Replaced as one value so a lookup never mixes two snapshots.
    pub(crate) index: watch::Sender<NodeIndex>,
    pub(crate) metrics: watch::Sender<NetworkMetrics>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) last_error: watch::Sender<Option<String>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (nodes, _) = watch::channel(Arc::new(Vec::new()));
        let (metrics, _) = watch::channel(NetworkMetrics::default());
        let (last_refresh, _) = watch::channel(None);
        let (last_error, _) = watch::channel(None);
        let (index, _) = watch::channel(NodeIndex::default());

        Self {
            nodes,
            index,
            metrics,
            last_refresh,
            last_error,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn nodes_snapshot(&self) -> Arc<Vec<NodeRecord>> {
        self.nodes.borrow().clone()
    }

    pub fn metrics_snapshot(&self) -> NetworkMetrics {
        *self.metrics.borrow()
    }

    // ── Single-node lookups ──────────────────────────────────────────

    pub fn node_by_id(&self, id: &NodeId) -> Option<NodeRecord> {
        self.index.borrow().get(id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_nodes(&self) -> SnapshotStream<Arc<Vec<NodeRecord>>> {
        SnapshotStream::new(self.nodes.subscribe())
    }

    pub fn subscribe_metrics(&self) -> SnapshotStream<NetworkMetrics> {
        SnapshotStream::new(self.metrics.subscribe())
    }

    pub fn subscribe_errors(&self) -> SnapshotStream<Option<String>> {
        SnapshotStream::new(self.last_error.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// Message of the most recent failed refresh, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
