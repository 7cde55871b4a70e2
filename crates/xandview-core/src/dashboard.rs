// ── Dashboard lifecycle ──
//
// Facade owning the fetcher and the data store. One refresh pulls nodes
// and metrics through the cached fetcher and publishes them; `start`
// keeps doing that on an interval until `stop`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::fetch::{Fetcher, MockNodeSource, NodeSource};
use crate::model::{HistoricalPoint, NetworkMetrics, NodeId, NodeRecord, TimeRange};
use crate::series::ChartMetric;
use crate::store::{DataStore, RefreshSnapshot};
use crate::stream::SnapshotStream;

/// Refreshing view over one node source.
///
/// Cheaply cloneable: clones share the store, the cache and the
/// background task.
pub struct Dashboard<S: NodeSource = MockNodeSource> {
    inner: Arc<DashboardInner<S>>,
}

impl<S: NodeSource> Clone for Dashboard<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DashboardInner<S> {
    config: DashboardConfig,
    fetcher: Fetcher<S>,
    store: Arc<DataStore>,
    cancel: CancellationToken,
    /// Child token for the current run; replaced on restart.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Dashboard<MockNodeSource> {
    /// Dashboard backed by the mock source described by `config`.
    pub fn mock(config: DashboardConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let source = config.mock_source();
        Ok(Self::new(config, source))
    }

    /// One-shot: refresh once, run the closure, stop.
    pub async fn oneshot<F, Fut, T>(config: DashboardConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Self) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let dashboard = Self::mock(config)?;
        dashboard.refresh().await?;
        let result = f(dashboard.clone()).await;
        dashboard.stop().await;
        result
    }
}

impl<S: NodeSource> Dashboard<S> {
    /// Build a dashboard without fetching anything. Call
    /// [`refresh`](Self::refresh) or [`start`](Self::start) to load data.
    pub fn new(config: DashboardConfig, source: S) -> Self {
        let fetcher = Fetcher::new(source, config.cache_ttl, config.retry);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(DashboardInner {
                config,
                fetcher,
                store: Arc::new(DataStore::new()),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    pub fn fetcher(&self) -> &Fetcher<S> {
        &self.inner.fetcher
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Fetch through the cache and publish the result.
    ///
    /// On failure the store keeps its previous snapshot and records the
    /// error, which is also returned.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let nodes = self.inner.fetcher.fetch_nodes().await;
        let metrics = self.inner.fetcher.fetch_network_metrics().await;
        let snap = RefreshSnapshot { nodes, metrics };
        let error = snap.error().map(CoreError::source_unavailable);

        self.inner.store.apply(snap);
        error.map_or(Ok(()), Err)
    }

    /// Drop cached data, then refresh.
    pub async fn force_refresh(&self) -> Result<(), CoreError> {
        self.inner.fetcher.invalidate();
        self.refresh().await
    }

    /// Load initial data and spawn the periodic refresh task.
    ///
    /// Each tick bypasses the cache so subscribers get a new snapshot
    /// every interval.
    ///
    /// An initial failure is recorded in the store, not returned: the
    /// background task keeps trying on its next tick. Calling `start` on a
    /// running dashboard is a no-op.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            debug!("dashboard already running");
            return;
        }

        let child = {
            let mut guard = self.inner.cancel_child.lock().await;
            if guard.is_cancelled() {
                *guard = self.inner.cancel.child_token();
            }
            guard.clone()
        };

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "initial refresh failed");
        }

        let interval = self.inner.config.refresh_interval;
        if !interval.is_zero() {
            handles.push(tokio::spawn(refresh_task(self.clone(), interval, child)));
        }
        info!(
            nodes = self.inner.config.node_count,
            interval_secs = interval.as_secs(),
            "dashboard started"
        );
    }

    /// Cancel the background task and wait for it to finish.
    pub async fn stop(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("dashboard stopped");
    }

    pub async fn is_running(&self) -> bool {
        !self.inner.task_handles.lock().await.is_empty()
    }

    // ── Snapshots ────────────────────────────────────────────────

    pub fn nodes_snapshot(&self) -> Arc<Vec<NodeRecord>> {
        self.inner.store.nodes_snapshot()
    }

    pub fn metrics_snapshot(&self) -> NetworkMetrics {
        self.inner.store.metrics_snapshot()
    }

    pub fn node(&self, id: &NodeId) -> Option<NodeRecord> {
        self.inner.store.node_by_id(id)
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.store.last_error()
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn nodes(&self) -> SnapshotStream<Arc<Vec<NodeRecord>>> {
        self.inner.store.subscribe_nodes()
    }

    pub fn metrics(&self) -> SnapshotStream<NetworkMetrics> {
        self.inner.store.subscribe_metrics()
    }

    // ── Charts ───────────────────────────────────────────────────

    /// Synthetic history for `metric`, anchored on the current snapshot.
    pub fn series(&self, metric: ChartMetric, range: TimeRange) -> Vec<HistoricalPoint> {
        metric.series(&self.nodes_snapshot(), &self.metrics_snapshot(), range)
    }
}

impl<S> Drop for DashboardInner<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn refresh_task<S: NodeSource>(dashboard: Dashboard<S>, interval: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(interval);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                debug!("periodic refresh");
                // a tick always reaches the source, whatever the cache TTL
                if let Err(e) = dashboard.force_refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
