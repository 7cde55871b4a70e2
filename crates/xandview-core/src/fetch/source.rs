// ── Node data sources ──

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::error::CoreError;
use crate::model::NodeRecord;
use crate::synth::{DEFAULT_NODE_COUNT, NodeSynthesizer, SynthesisProfile};

/// Where node collections come from.
///
/// Implementations return classified records. The [`Fetcher`](super::Fetcher)
/// layers caching and retry on top.
pub trait NodeSource: Send + Sync + 'static {
    fn fetch_nodes(&self) -> impl Future<Output = Result<Vec<NodeRecord>, CoreError>> + Send;
}

/// Synthesizes a fresh node collection on every fetch after a simulated
/// round-trip delay.
///
/// With a base seed, fetch `n` uses seed `base + n`: consecutive fetches
/// differ, and a new source with the same seed replays the same sequence.
#[derive(Debug)]
pub struct MockNodeSource {
    node_count: usize,
    latency: Duration,
    seed: Option<u64>,
    profile: SynthesisProfile,
    fetches: AtomicU64,
}

impl Default for MockNodeSource {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_COUNT)
    }
}

impl MockNodeSource {
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            latency: Self::DEFAULT_LATENCY,
            seed: None,
            profile: SynthesisProfile::default(),
            fetches: AtomicU64::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_profile(mut self, profile: SynthesisProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    fn synthesize(&self) -> Vec<NodeRecord> {
        let n = self.fetches.fetch_add(1, Ordering::Relaxed);
        let synth = match self.seed {
            Some(base) => NodeSynthesizer::seeded(base.wrapping_add(n)),
            None => NodeSynthesizer::from_entropy(),
        };
        synth.with_profile(self.profile).synthesize_at(self.node_count, Utc::now())
    }
}

impl NodeSource for MockNodeSource {
    async fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, CoreError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let nodes = self.synthesize();
        debug!(count = nodes.len(), "mock source produced nodes");
        Ok(nodes)
    }
}
