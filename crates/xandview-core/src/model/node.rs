// ── Node domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::node_id::NodeId;

/// Coarse operational classification derived from a node's telemetry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NodeStatus {
    Online,
    Degraded,
    Offline,
}

/// Where a node is physically hosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
        }
    }
}

/// One node's telemetry snapshot.
///
/// Raw fields are fixed once the record is built. `health` and `status`
/// are derived: they stay `None` until [`NodeRecord::classify`] runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: NodeId,
    pub uptime_percentage: f64,

    // Storage
    pub storage_capacity_tb: f64,
    pub storage_used_tb: f64,
    pub storage_available_tb: f64,

    // Network
    pub latency_ms: f64,
    pub bandwidth_mbps: f64,
    pub data_redundancy_factor: f64,

    // Economics (token units)
    pub total_rewards_earned: f64,
    pub stake_amount: f64,

    pub last_seen: DateTime<Utc>,
    pub location: Location,
    pub node_version: String,

    // Operations
    pub success_rate_percentage: f64,
    pub failed_operations_count: u64,
    pub data_served_tb: f64,

    // Derived
    #[serde(default)]
    pub health: Option<u8>,
    #[serde(default)]
    pub status: Option<NodeStatus>,
}

impl NodeRecord {
    /// Attach health and status computed against `now`.
    pub fn classify(&mut self, now: DateTime<Utc>) {
        self.health = Some(crate::health::compute_health_at(self, now));
        self.status = Some(crate::health::classify_status_at(self, now));
    }

    /// By-value form of [`classify`](Self::classify).
    pub fn classified(mut self, now: DateTime<Utc>) -> Self {
        self.classify(now);
        self
    }

    /// Percentage of capacity in use, or `None` for a zero-capacity node.
    pub fn utilization_pct(&self) -> Option<f64> {
        (self.storage_capacity_tb > 0.0)
            .then(|| self.storage_used_tb / self.storage_capacity_tb * 100.0)
    }

    /// Health with a missing score read as 0.
    pub fn health_or_zero(&self) -> u8 {
        self.health.unwrap_or(0)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A well-behaved node last seen at `now`; tests tweak fields from here.
    pub(crate) fn healthy_node(now: DateTime<Utc>) -> NodeRecord {
        NodeRecord {
            node_id: NodeId::from("XN-0001"),
            uptime_percentage: 99.9,
            storage_capacity_tb: 100.0,
            storage_used_tb: 50.0,
            storage_available_tb: 50.0,
            latency_ms: 10.0,
            bandwidth_mbps: 1000.0,
            data_redundancy_factor: 3.0,
            total_rewards_earned: 1500.0,
            stake_amount: 20_000.0,
            last_seen: now,
            location: Location::new("London", "United Kingdom"),
            node_version: "1.3.1".into(),
            success_rate_percentage: 99.9,
            failed_operations_count: 12,
            data_served_tb: 80.0,
            health: None,
            status: None,
        }
    }
}
