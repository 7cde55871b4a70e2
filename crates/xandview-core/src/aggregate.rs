// ── Network aggregation ──
//
// Reduces a classified node collection into one `NetworkMetrics`
// snapshot. Total over its input: an empty slice yields all zeros.

use crate::model::{NetworkMetrics, NodeRecord, NodeStatus};
use crate::numeric::{mean, round1, round2};

/// Bytes per terabyte (binary: 1024^4).
pub const TB_TO_BYTES: f64 = 1_099_511_627_776.0;

/// Convert a terabyte figure into whole bytes.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn tb_to_bytes(tb: f64) -> u64 {
    (tb * TB_TO_BYTES).round() as u64
}

/// Convert bytes back into terabytes.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn bytes_to_tb(bytes: u64) -> f64 {
    bytes as f64 / TB_TO_BYTES
}

/// Aggregate a node collection into network-wide metrics.
///
/// Nodes without a status count toward neither the online nor the
/// offline total; a missing health score counts as 0 in the mean.
pub fn aggregate_network(nodes: &[NodeRecord]) -> NetworkMetrics {
    let count = nodes.len();
    let with_status = |status: NodeStatus| nodes.iter().filter(|n| n.status == Some(status)).count();

    let total_storage: f64 = nodes.iter().map(|n| n.storage_capacity_tb * TB_TO_BYTES).sum();
    let used_storage: f64 = nodes.iter().map(|n| n.storage_used_tb * TB_TO_BYTES).sum();
    let total_staked: f64 = nodes.iter().map(|n| n.stake_amount).sum();

    let uptime: f64 = nodes.iter().map(|n| n.uptime_percentage).sum();
    let latency: f64 = nodes.iter().map(|n| n.latency_ms).sum();
    let redundancy: f64 = nodes.iter().map(|n| n.data_redundancy_factor).sum();
    let health: f64 = nodes.iter().map(|n| f64::from(n.health_or_zero())).sum();

    NetworkMetrics {
        total_nodes: count,
        online_nodes: with_status(NodeStatus::Online),
        offline_nodes: with_status(NodeStatus::Offline),
        total_storage: round_bytes(total_storage),
        used_storage: round_bytes(used_storage),
        total_staked: round2(total_staked),
        average_uptime: round1(mean(uptime, count)),
        average_response_time: round1(mean(latency, count)),
        network_health: round1(mean(health, count)),
        data_redundancy: round1(mean(redundancy, count)),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn round_bytes(bytes: f64) -> u64 {
    bytes.round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::fixtures::healthy_node;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_collection_is_all_zero() {
        assert_eq!(aggregate_network(&[]), NetworkMetrics::default());
        let m = aggregate_network(&[]);
        assert!(m.average_uptime.is_finite());
        assert!(m.network_health.is_finite());
    }

    #[test]
    fn storage_uses_binary_terabytes() {
        let now = Utc::now();
        let nodes: Vec<_> = [10.0, 20.0, 30.0]
            .into_iter()
            .map(|cap| {
                let mut n = healthy_node(now);
                n.storage_capacity_tb = cap;
                n.storage_used_tb = cap / 2.0;
                n.storage_available_tb = cap / 2.0;
                n
            })
            .collect();

        let m = aggregate_network(&nodes);
        assert_eq!(m.total_storage, 60 * 1024_u64.pow(4));
        assert_eq!(m.used_storage, 30 * 1024_u64.pow(4));
    }

    #[test]
    fn counts_and_means() {
        let now = Utc::now();
        let mut a = healthy_node(now);
        a.uptime_percentage = 99.0;
        a.latency_ms = 10.0;
        a.data_redundancy_factor = 2.0;
        a.stake_amount = 100.004;

        let mut b = healthy_node(now);
        b.uptime_percentage = 90.0;
        b.latency_ms = 40.0;
        b.data_redundancy_factor = 3.0;
        b.stake_amount = 200.0;

        let mut c = healthy_node(now);
        c.uptime_percentage = 30.0;
        c.latency_ms = 100.0;
        c.data_redundancy_factor = 4.0;
        c.stake_amount = 300.0;
        c.last_seen = now - Duration::hours(48);

        let nodes: Vec<_> = [a, b, c].into_iter().map(|n| n.classified(now)).collect();
        let m = aggregate_network(&nodes);

        assert_eq!(m.total_nodes, 3);
        assert_eq!(m.online_nodes, 1);
        assert_eq!(m.offline_nodes, 1);
        assert_eq!(m.degraded_nodes(), 1);
        assert!((m.total_staked - 600.0).abs() < 1e-9);
        assert!((m.average_uptime - 73.0).abs() < 1e-9);
        assert!((m.average_response_time - 50.0).abs() < 1e-9);
        assert!((m.data_redundancy - 3.0).abs() < 1e-9);
    }

    #[test]
    fn network_health_is_mean_of_node_health() {
        let now = Utc::now();
        let mut a = healthy_node(now);
        a.health = Some(90);
        let mut b = healthy_node(now);
        b.health = Some(75);
        let mut c = healthy_node(now);
        c.health = None;

        let m = aggregate_network(&[a, b, c]);
        assert!((m.network_health - 55.0).abs() < 1e-9);
        // unclassified nodes count toward neither bucket
        assert_eq!(m.online_nodes + m.offline_nodes, 0);
    }

    #[test]
    fn tb_conversions_round_trip_whole_terabytes() {
        assert_eq!(tb_to_bytes(1.0), 1_099_511_627_776);
        assert!((bytes_to_tb(tb_to_bytes(12.5)) - 12.5).abs() < 1e-12);
    }
}
