//! Synthetic historical series for charting.
//!
//! A series is a bounded random walk: it starts at the seed value and
//! drifts by at most `±seed·variance/2` per hour, never going below zero.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::aggregate::bytes_to_tb;
use crate::model::{HistoricalPoint, NetworkMetrics, NodeRecord, TimeRange};
use crate::numeric::{mean, round2};
use crate::random::Random;

/// Generate `hours + 1` hourly points ending now.
///
/// `hours` is capped at [`TimeRange::MAX_WINDOW_HOURS`].
pub fn generate_series(hours: u32, seed: f64, variance: f64) -> Vec<HistoricalPoint> {
    generate_series_at(&mut Random::from_entropy(), Utc::now(), hours, seed, variance)
}

/// Generate `hours + 1` points one hour apart, ascending, the last at `now`.
///
/// The first value is `seed` (floored at 0). Each following value moves by
/// `(u - 0.5) · seed · variance` for `u` uniform in `[0, 1)`, floored at 0.
/// Stored values are rounded to 2 dp; the walk itself keeps full precision.
/// Windows longer than [`TimeRange::MAX_WINDOW_HOURS`] are truncated to it.
pub fn generate_series_at<R: Rng>(
    random: &mut Random<R>,
    now: DateTime<Utc>,
    hours: u32,
    seed: f64,
    variance: f64,
) -> Vec<HistoricalPoint> {
    let hours = hours.min(TimeRange::MAX_WINDOW_HOURS);
    let step = seed * variance;
    let mut current = floor_zero(seed);

    (0..=hours)
        .map(|i| {
            if i > 0 {
                current = floor_zero(current + (random.unit() - 0.5) * step);
            }
            HistoricalPoint {
                timestamp: now - Duration::hours(i64::from(hours - i)),
                value: round2(current),
            }
        })
        .collect()
}

fn floor_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

// ── Chart metrics ───────────────────────────────────────────────────

/// The dashboard's charted quantities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ChartMetric {
    Uptime,
    StorageUsed,
    StorageTotal,
    Rewards,
    Latency,
}

impl ChartMetric {
    /// Relative per-hour variance of the walk.
    pub fn variance(self) -> f64 {
        match self {
            Self::Uptime | Self::StorageTotal => 0.05,
            Self::StorageUsed => 0.1,
            Self::Rewards => 0.15,
            Self::Latency => 0.2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uptime => "Average Uptime (%)",
            Self::StorageUsed => "Storage Used (TB)",
            Self::StorageTotal => "Storage Capacity (TB)",
            Self::Rewards => "Total Rewards",
            Self::Latency => "Average Latency (ms)",
        }
    }

    /// Current value the series is anchored on.
    pub fn seed_from(self, nodes: &[NodeRecord], metrics: &NetworkMetrics) -> f64 {
        match self {
            Self::Uptime => metrics.average_uptime,
            Self::StorageUsed => bytes_to_tb(metrics.used_storage),
            Self::StorageTotal => bytes_to_tb(metrics.total_storage),
            Self::Rewards => nodes.iter().map(|n| n.total_rewards_earned).sum(),
            Self::Latency => mean(nodes.iter().map(|n| n.latency_ms).sum(), nodes.len()),
        }
    }

    pub fn series(self, nodes: &[NodeRecord], metrics: &NetworkMetrics, range: TimeRange) -> Vec<HistoricalPoint> {
        generate_series(range.window_hours(), self.seed_from(nodes, metrics), self.variance())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_network;
    use crate::synth::NodeSynthesizer;

    fn walk(hours: u32, seed: f64, variance: f64) -> Vec<HistoricalPoint> {
        generate_series_at(&mut Random::seeded(17), Utc::now(), hours, seed, variance)
    }

    #[test]
    fn zero_hours_is_single_seed_point() {
        let points = generate_series(0, 42.5, 0.1);
        assert_eq!(points.len(), 1);
        assert!((points[0].value - 42.5).abs() < f64::EPSILON);
    }

    #[test]
    fn has_hours_plus_one_points_an_hour_apart_ending_now() {
        let now = Utc::now();
        let points = generate_series_at(&mut Random::seeded(1), now, 24, 100.0, 0.05);
        assert_eq!(points.len(), 25);
        assert_eq!(points.last().unwrap().timestamp, now);
        assert_eq!(points[0].timestamp, now - Duration::hours(24));
        assert!(points.windows(2).all(|w| w[1].timestamp - w[0].timestamp == Duration::hours(1)));
    }

    #[test]
    fn oversized_window_is_capped() {
        let now = Utc::now();
        let points = generate_series_at(&mut Random::seeded(3), now, u32::MAX, 10.0, 0.1);
        let cap = usize::try_from(TimeRange::MAX_WINDOW_HOURS).unwrap();
        assert_eq!(points.len(), cap + 1);
        assert_eq!(points.last().unwrap().timestamp, now);
        assert_eq!(points[0].timestamp, now - Duration::hours(i64::from(TimeRange::MAX_WINDOW_HOURS)));
        assert_eq!(generate_series(u32::MAX, 1.0, 0.0).len(), cap + 1);
    }

    #[test]
    fn first_point_is_anchored_on_seed() {
        let points = walk(48, 97.3, 0.2);
        assert!((points[0].value - 97.3).abs() < f64::EPSILON);
    }

    #[test]
    fn steps_are_bounded_by_half_the_scaled_variance() {
        let points = walk(500, 100.0, 0.1);
        // 5.0 max step plus 0.01 of rounding slack on either side
        assert!(
            points
                .windows(2)
                .all(|w| (w[1].value - w[0].value).abs() <= 5.0 + 0.01)
        );
    }

    #[test]
    fn never_negative() {
        for seed in [0.0, 0.5, 3.0, -10.0] {
            for variance in [0.2, 5.0, -5.0] {
                assert!(walk(200, seed, variance).iter().all(|p| p.value >= 0.0));
            }
        }
    }

    #[test]
    fn zero_variance_is_flat() {
        assert!(walk(10, 12.34, 0.0).iter().all(|p| (p.value - 12.34).abs() < f64::EPSILON));
    }

    #[test]
    fn nan_seed_does_not_panic() {
        let points = walk(5, f64::NAN, 0.1);
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|p| p.value >= 0.0));
    }

    #[test]
    fn chart_metric_parses_kebab_case() {
        assert_eq!("storage-used".parse::<ChartMetric>().unwrap(), ChartMetric::StorageUsed);
        assert_eq!("LATENCY".parse::<ChartMetric>().unwrap(), ChartMetric::Latency);
        assert_eq!(ChartMetric::StorageTotal.to_string(), "storage-total");
        assert!((ChartMetric::Rewards.variance() - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn chart_seeds_come_from_the_snapshot() {
        let nodes = NodeSynthesizer::seeded(9).synthesize(25);
        let metrics = aggregate_network(&nodes);

        let uptime = ChartMetric::Uptime.seed_from(&nodes, &metrics);
        assert!((uptime - metrics.average_uptime).abs() < f64::EPSILON);

        let used: f64 = nodes.iter().map(|n| n.storage_used_tb).sum();
        assert!((ChartMetric::StorageUsed.seed_from(&nodes, &metrics) - used).abs() < 1e-6);

        let rewards: f64 = nodes.iter().map(|n| n.total_rewards_earned).sum();
        assert!((ChartMetric::Rewards.seed_from(&nodes, &metrics) - rewards).abs() < 1e-9);

        let series = ChartMetric::Latency.series(&nodes, &metrics, TimeRange::Week);
        assert_eq!(series.len(), 169);
    }

    #[test]
    fn chart_seeds_on_empty_snapshot_are_zero() {
        let metrics = NetworkMetrics::default();
        for metric in [ChartMetric::Uptime, ChartMetric::Rewards, ChartMetric::Latency] {
            assert!(metric.seed_from(&[], &metrics).abs() < f64::EPSILON);
        }
    }
}
