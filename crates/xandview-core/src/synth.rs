//! Mock node synthesis.
//!
//! Builds node collections whose fields are correlated the way a real
//! network's would be: latency depends on where a node lives, rewards
//! follow stake and performance, failed operations follow success rate.
//! Records come back classified and sorted by health, best first.
//!
//! Which nodes land in the "good" bands is decided by an explicit
//! [`BandSplit`] per attribute rather than by index thresholds baked into
//! the generator, so the distribution shape is tunable and testable.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Location, NodeId, NodeRecord};
use crate::numeric::{round1, round2};
use crate::random::Random;

const LOCATIONS: &[(&str, &str)] = &[
    ("New York", "United States"),
    ("San Francisco", "United States"),
    ("London", "United Kingdom"),
    ("Frankfurt", "Germany"),
    ("Amsterdam", "Netherlands"),
    ("Tokyo", "Japan"),
    ("Singapore", "Singapore"),
    ("Sydney", "Australia"),
    ("Toronto", "Canada"),
    ("Paris", "France"),
    ("Stockholm", "Sweden"),
    ("Zurich", "Switzerland"),
    ("Seoul", "South Korea"),
    ("Hong Kong", "Hong Kong"),
    ("Dublin", "Ireland"),
    ("Mumbai", "India"),
    ("São Paulo", "Brazil"),
    ("Moscow", "Russia"),
    ("Dubai", "UAE"),
    ("Oslo", "Norway"),
];

/// Countries served from the low-latency range.
const LOW_LATENCY_COUNTRIES: &[&str] = &["United States", "United Kingdom"];

const NODE_VERSIONS: &[&str] = &["1.2.3", "1.2.4", "1.2.5", "1.3.0", "1.3.1"];

/// Node count used when none is requested.
pub const DEFAULT_NODE_COUNT: usize = 25;

// ── Split policy ────────────────────────────────────────────────────

/// "The first K of N nodes (in construction order) get the good band."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandSplit {
    /// K scales with N: `round(N * fraction)`, clamped to `[0, N]`.
    Proportional(f64),
    /// K is an absolute cutoff, capped at N.
    Fixed(usize),
}

impl BandSplit {
    /// How many of `count` nodes fall in the good band.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        clippy::as_conversions
    )]
    pub fn cutoff(self, count: usize) -> usize {
        match self {
            Self::Proportional(fraction) => {
                let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
                ((count as f64 * fraction).round() as usize).min(count)
            }
            Self::Fixed(k) => k.min(count),
        }
    }

    pub fn is_high(self, index: usize, count: usize) -> bool {
        index < self.cutoff(count)
    }
}

/// Distribution shape for a synthesized collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisProfile {
    /// Nodes drawing uptime from `[85, 99.9)` instead of `[50, 85)`.
    pub uptime: BandSplit,
    /// Nodes drawing success rate from `[95, 99.9)` instead of `[80, 95)`.
    pub success_rate: BandSplit,
    /// Nodes seen within the last 2 hours instead of 2–48 hours ago.
    pub recent_activity: BandSplit,
}

impl Default for SynthesisProfile {
    /// At 25 nodes this yields 20 / 22 / 23 nodes in the good bands.
    fn default() -> Self {
        Self {
            uptime: BandSplit::Proportional(0.80),
            success_rate: BandSplit::Proportional(0.88),
            recent_activity: BandSplit::Proportional(0.92),
        }
    }
}

// ── Synthesizer ─────────────────────────────────────────────────────

/// Generator for correlated mock node records.
pub struct NodeSynthesizer<R = rand_chacha::ChaCha8Rng> {
    random: Random<R>,
    profile: SynthesisProfile,
}

impl NodeSynthesizer {
    /// Reproducible synthesizer: the same seed yields the same records
    /// relative to `now`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Random::seeded(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(Random::from_entropy())
    }
}

impl<R: Rng> NodeSynthesizer<R> {
    pub fn new(random: Random<R>) -> Self {
        Self {
            random,
            profile: SynthesisProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: SynthesisProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Synthesize `count` classified nodes as of the current time.
    pub fn synthesize(&mut self, count: usize) -> Vec<NodeRecord> {
        self.synthesize_at(count, Utc::now())
    }

    /// Synthesize `count` nodes, classify them against `now`, and sort by
    /// health descending. Ties keep construction order.
    pub fn synthesize_at(&mut self, count: usize, now: DateTime<Utc>) -> Vec<NodeRecord> {
        let mut nodes: Vec<NodeRecord> = (0..count)
            .map(|i| self.raw_node(i, count, now).classified(now))
            .collect();
        nodes.sort_by(|a, b| b.health_or_zero().cmp(&a.health_or_zero()));
        nodes
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn raw_node(&mut self, index: usize, count: usize, now: DateTime<Utc>) -> NodeRecord {
        let r = &mut self.random;
        let profile = self.profile;

        let (city, country) = r.pick(LOCATIONS).copied().unwrap_or(("London", "United Kingdom"));

        let uptime = if profile.uptime.is_high(index, count) {
            r.uniform(85.0, 99.9)
        } else {
            r.uniform(50.0, 85.0)
        };

        let capacity = r.uniform(10.0, 500.0);
        let used = capacity * r.uniform(0.15, 0.95);

        let base_latency = if LOW_LATENCY_COUNTRIES.contains(&country) {
            r.uniform(10.0, 50.0)
        } else {
            r.uniform(20.0, 150.0)
        };
        let latency = (base_latency + r.uniform(-5.0, 5.0)).max(0.0);

        let bandwidth = r.uniform(100.0, 10_000.0);
        let redundancy = r.uniform(2.0, 5.0);

        let stake = r.uniform(10_000.0, 500_000.0);
        let performance = ((uptime / 100.0) * (1.0 - latency / 200.0)).max(0.0);
        let rewards = stake * r.uniform(0.05, 0.25) * performance;

        let success_rate = if profile.success_rate.is_high(index, count) {
            r.uniform(95.0, 99.9)
        } else {
            r.uniform(80.0, 95.0)
        };
        let total_operations = r.uniform(10_000.0, 100_000.0);
        let failed_operations = (total_operations * (1.0 - success_rate / 100.0)).round().max(0.0) as u64;

        let data_served = used * r.uniform(0.5, 3.0) * (uptime / 100.0);

        let hours_ago = if profile.recent_activity.is_high(index, count) {
            r.uniform(0.0, 2.0)
        } else {
            r.uniform(2.0, 48.0)
        };
        let last_seen = now - Duration::milliseconds((hours_ago * 3_600_000.0) as i64);

        let node_version = r.pick(NODE_VERSIONS).copied().unwrap_or("1.3.1");

        let capacity = round2(capacity);
        let used = round2(used);

        NodeRecord {
            node_id: NodeId::from_index(index),
            uptime_percentage: round1(uptime),
            storage_capacity_tb: capacity,
            storage_used_tb: used,
            storage_available_tb: round2(capacity - used),
            latency_ms: round1(latency),
            bandwidth_mbps: round1(bandwidth),
            data_redundancy_factor: round1(redundancy),
            total_rewards_earned: round2(rewards),
            stake_amount: round2(stake),
            last_seen,
            location: Location::new(city, country),
            node_version: node_version.to_owned(),
            success_rate_percentage: round1(success_rate),
            failed_operations_count: failed_operations,
            data_served_tb: round2(data_served),
            health: None,
            status: None,
        }
    }
}

/// Synthesize `count` classified nodes from an entropy-seeded source.
pub fn synthesize_nodes(count: usize) -> Vec<NodeRecord> {
    NodeSynthesizer::from_entropy().synthesize(count)
}
