// ── Cached, retrying fetch layer ──
//
// Wraps a `NodeSource` with a per-endpoint TTL cache and bounded linear
// retry. Nothing past this boundary returns `Err`: failures come back as
// an empty fallback plus an error message in `FetchOutcome`.

mod cache;
mod retry;
mod source;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::aggregate_network;
use crate::model::{NetworkMetrics, NodeId, NodeRecord};

pub use cache::{DEFAULT_MAX_ENTRIES, TtlCache};
pub use retry::{RetryPolicy, retry_linear};
pub use source::{MockNodeSource, NodeSource};

/// Cache key for the node collection.
pub const NODES_ENDPOINT: &str = "nodes";
/// Cache key for the network aggregate.
pub const METRICS_ENDPOINT: &str = "network-metrics";

/// Default freshness window for cached endpoints.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Result of a fetch that has already absorbed its failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome<T> {
    pub data: T,
    /// Last error message when every attempt failed.
    pub error: Option<String>,
    /// Whether `data` was served from cache.
    pub cached: bool,
}

impl<T> FetchOutcome<T> {
    fn fresh(data: T) -> Self {
        Self { data, error: None, cached: false }
    }

    fn hit(data: T) -> Self {
        Self { data, error: None, cached: true }
    }

    fn failed(fallback: T, error: String) -> Self {
        Self {
            data: fallback,
            error: Some(error),
            cached: false,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        FetchOutcome {
            data: f(self.data),
            error: self.error,
            cached: self.cached,
        }
    }
}

/// Node fetcher with caching and retry.
pub struct Fetcher<S> {
    source: S,
    nodes: TtlCache<Vec<NodeRecord>>,
    metrics: TtlCache<NetworkMetrics>,
    retry: RetryPolicy,
}

impl<S: NodeSource> Fetcher<S> {
    pub fn new(source: S, ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            source,
            nodes: TtlCache::new(ttl),
            metrics: TtlCache::new(ttl),
            retry,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current node collection, from cache while fresh.
    pub async fn fetch_nodes(&self) -> FetchOutcome<Arc<Vec<NodeRecord>>> {
        if let Some(nodes) = self.nodes.get(NODES_ENDPOINT) {
            return FetchOutcome::hit(nodes);
        }

        debug!(endpoint = NODES_ENDPOINT, "cache miss, fetching");
        match retry_linear(&self.retry, || self.source.fetch_nodes()).await {
            Ok(nodes) => FetchOutcome::fresh(self.nodes.insert(NODES_ENDPOINT, nodes)),
            Err(e) => {
                warn!(endpoint = NODES_ENDPOINT, error = %e, "fetch failed, serving empty fallback");
                FetchOutcome::failed(Arc::new(Vec::new()), e.to_string())
            }
        }
    }

    /// Network aggregate of the current node collection.
    ///
    /// Computed from the same collection `fetch_nodes` serves, so the
    /// counts always agree with the node table.
    pub async fn fetch_network_metrics(&self) -> FetchOutcome<NetworkMetrics> {
        if let Some(metrics) = self.metrics.get(METRICS_ENDPOINT) {
            return FetchOutcome::hit(*metrics);
        }

        let nodes = self.fetch_nodes().await;
        if let Some(error) = nodes.error {
            return FetchOutcome::failed(NetworkMetrics::default(), error);
        }
        let metrics = aggregate_network(&nodes.data);
        self.metrics.insert(METRICS_ENDPOINT, metrics);
        FetchOutcome::fresh(metrics)
    }

    /// Look up one node in the current collection.
    pub async fn fetch_node(&self, id: &NodeId) -> FetchOutcome<Option<NodeRecord>> {
        self.fetch_nodes()
            .await
            .map(|nodes| nodes.iter().find(|n| &n.node_id == id).cloned())
    }

    /// Drop every cached endpoint so the next fetch hits the source.
    pub fn invalidate(&self) {
        self.nodes.clear();
        self.metrics.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::{Instant, advance};

    fn fetcher(source: MockNodeSource) -> Fetcher<MockNodeSource> {
        Fetcher::new(source, DEFAULT_CACHE_TTL, RetryPolicy::default())
    }

    /// Fails the first `failures` calls, then serves `MockNodeSource` data.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
        inner: MockNodeSource,
    }

    impl Flaky {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                inner: MockNodeSource::new(5).with_latency(Duration::ZERO),
            }
        }
    }

    impl NodeSource for Flaky {
        async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, CoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                return Err(CoreError::source_unavailable(format!("attempt {n} refused")));
            }
            self.inner.fetch_nodes().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn second_fetch_within_ttl_is_cached() {
        let f = fetcher(MockNodeSource::new(8));
        let first = f.fetch_nodes().await;
        assert!(!first.cached);
        assert_eq!(first.data.len(), 8);

        let start = Instant::now();
        let second = f.fetch_nodes().await;
        assert!(second.cached);
        assert!(Arc::ptr_eq(&first.data, &second.data));
        // served without the simulated round trip
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(f.source().fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_cache_refetches() {
        let f = fetcher(MockNodeSource::new(3).with_latency(Duration::ZERO));
        f.fetch_nodes().await;
        advance(DEFAULT_CACHE_TTL).await;
        let again = f.fetch_nodes().await;
        assert!(!again.cached);
        assert_eq!(f.source().fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_refetch() {
        let f = fetcher(MockNodeSource::new(3).with_latency(Duration::ZERO));
        f.fetch_nodes().await;
        f.fetch_network_metrics().await;
        f.invalidate();
        assert!(!f.fetch_network_metrics().await.cached);
        assert_eq!(f.source().fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn metrics_agree_with_nodes() {
        let f = fetcher(MockNodeSource::new(12).with_seed(Some(4)));
        let nodes = f.fetch_nodes().await;
        let metrics = f.fetch_network_metrics().await;
        assert!(metrics.is_ok());
        assert_eq!(metrics.data, aggregate_network(&nodes.data));
        assert_eq!(metrics.data.total_nodes, 12);
        assert!(f.fetch_network_metrics().await.cached);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried() {
        let f = Fetcher::new(Flaky::new(2), DEFAULT_CACHE_TTL, RetryPolicy::default());
        let start = Instant::now();
        let outcome = f.fetch_nodes().await;
        assert!(outcome.is_ok());
        assert_eq!(outcome.data.len(), 5);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_yield_empty_fallback() {
        let f = Fetcher::new(Flaky::new(u32::MAX), DEFAULT_CACHE_TTL, RetryPolicy::default());
        let outcome = f.fetch_nodes().await;
        assert!(outcome.data.is_empty());
        assert!(!outcome.cached);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Node data source unavailable: attempt 3 refused")
        );

        let metrics = f.fetch_network_metrics().await;
        assert_eq!(metrics.data, NetworkMetrics::default());
        assert!(metrics.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_cached() {
        let f = Fetcher::new(Flaky::new(3), DEFAULT_CACHE_TTL, RetryPolicy::default());
        assert!(!f.fetch_nodes().await.is_ok());
        let recovered = f.fetch_nodes().await;
        assert!(recovered.is_ok());
        assert!(!recovered.cached);
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_node_by_id() {
        let f = fetcher(MockNodeSource::new(5).with_latency(Duration::ZERO));
        let found = f.fetch_node(&NodeId::new("XN-0003")).await;
        assert_eq!(found.data.unwrap().node_id.as_str(), "XN-0003");
        let missing = f.fetch_node(&NodeId::new("XN-0099")).await;
        assert!(missing.data.is_none());
        assert!(missing.is_ok());
    }
}
