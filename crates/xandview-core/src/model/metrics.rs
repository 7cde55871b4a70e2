// ── Network-wide aggregate snapshot ──

use serde::{Deserialize, Serialize};

/// Aggregate statistics over one node collection.
///
/// Built fresh by [`aggregate_network`](crate::aggregate::aggregate_network);
/// it has no lifecycle of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub total_nodes: usize,
    pub online_nodes: usize,
    pub offline_nodes: usize,
    /// Bytes.
    pub total_storage: u64,
    /// Bytes.
    pub used_storage: u64,
    /// Tokens, 2 dp.
    pub total_staked: f64,
    /// Percent, 1 dp.
    pub average_uptime: f64,
    /// Milliseconds, 1 dp.
    pub average_response_time: f64,
    /// Mean node health, 1 dp.
    pub network_health: f64,
    /// Mean redundancy factor, 1 dp.
    pub data_redundancy: f64,
}

impl NetworkMetrics {
    /// Nodes counted as neither online nor offline.
    pub fn degraded_nodes(&self) -> usize {
        self.total_nodes
            .saturating_sub(self.online_nodes)
            .saturating_sub(self.offline_nodes)
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn storage_utilization_pct(&self) -> f64 {
        if self.total_storage == 0 {
            return 0.0;
        }
        self.used_storage as f64 / self.total_storage as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_is_the_remainder() {
        let m = NetworkMetrics {
            total_nodes: 25,
            online_nodes: 18,
            offline_nodes: 2,
            ..NetworkMetrics::default()
        };
        assert_eq!(m.degraded_nodes(), 5);
    }

    #[test]
    fn utilization_of_empty_network_is_zero() {
        assert!(NetworkMetrics::default().storage_utilization_pct().abs() < f64::EPSILON);
        let m = NetworkMetrics {
            total_storage: 200,
            used_storage: 50,
            ..NetworkMetrics::default()
        };
        assert!((m.storage_utilization_pct() - 25.0).abs() < f64::EPSILON);
    }
}
