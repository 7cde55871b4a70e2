//! Health scoring and status classification for a single node.
//!
//! Both are pure functions of one [`NodeRecord`] and a reference time.
//! The `*_at` variants take `now` explicitly; the plain forms read the
//! wall clock.
//!
//! The score is a weighted sum, not an average:
//!
//! | term | weight |
//! |---|---|
//! | uptime (scales the 100-point start) | 30 |
//! | success rate | 25 |
//! | latency (linear penalty, floor 0) | 20 |
//! | storage utilization band | 15 |
//! | recent activity | 10 |

use chrono::{DateTime, Utc};

use crate::model::{NodeRecord, NodeStatus};

const UPTIME_WEIGHT: f64 = 0.30;
const SUCCESS_WEIGHT: f64 = 25.0;
const LATENCY_WEIGHT: f64 = 20.0;
const UTILIZATION_WEIGHT: f64 = 15.0;
const ACTIVITY_WEIGHT: f64 = 10.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours between `last_seen` and `now`, never negative.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn hours_since_seen(node: &NodeRecord, now: DateTime<Utc>) -> f64 {
    let ms = (now - node.last_seen).num_milliseconds();
    (ms as f64 / MS_PER_HOUR).max(0.0)
}

fn latency_score(latency_ms: f64) -> f64 {
    (100.0 - (latency_ms / 100.0) * 20.0).max(0.0)
}

/// Full marks only inside the 10–90% band. Zero capacity scores 0.
fn utilization_score(node: &NodeRecord) -> f64 {
    match node.utilization_pct() {
        None => 0.0,
        Some(u) if u > 90.0 => 0.0,
        Some(u) if u < 10.0 => 50.0,
        Some(_) => 100.0,
    }
}

fn activity_score(hours: f64) -> f64 {
    if hours < 1.0 {
        100.0
    } else if hours < 24.0 {
        50.0
    } else {
        0.0
    }
}

/// Health score in `[0, 100]` as of `now`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn compute_health_at(node: &NodeRecord, now: DateTime<Utc>) -> u8 {
    let mut health = 100.0 * (node.uptime_percentage / 100.0) * UPTIME_WEIGHT;
    health += (node.success_rate_percentage / 100.0) * SUCCESS_WEIGHT;
    health += (latency_score(node.latency_ms) / 100.0) * LATENCY_WEIGHT;
    health += (utilization_score(node) / 100.0) * UTILIZATION_WEIGHT;
    health += (activity_score(hours_since_seen(node, now)) / 100.0) * ACTIVITY_WEIGHT;

    if health.is_nan() {
        return 0;
    }
    health.clamp(0.0, 100.0).round() as u8
}

/// Health score against the current wall clock.
pub fn compute_health(node: &NodeRecord) -> u8 {
    compute_health_at(node, Utc::now())
}

/// Status as of `now`. The first matching rule wins: offline, then degraded.
pub fn classify_status_at(node: &NodeRecord, now: DateTime<Utc>) -> NodeStatus {
    let hours = hours_since_seen(node, now);

    if hours > 24.0 || node.uptime_percentage < 50.0 {
        return NodeStatus::Offline;
    }
    if hours > 1.0 || node.uptime_percentage < 95.0 || node.success_rate_percentage < 90.0 {
        return NodeStatus::Degraded;
    }
    NodeStatus::Online
}

/// Status against the current wall clock.
pub fn classify_status(node: &NodeRecord) -> NodeStatus {
    classify_status_at(node, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::fixtures::healthy_node;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn healthy_node_scores_high_and_online() {
        let now = now();
        let node = healthy_node(now);
        // 29.97 + 24.975 + 19.6 + 15 + 10 = 99.545
        assert_eq!(compute_health_at(&node, now), 100);
        assert_eq!(classify_status_at(&node, now), NodeStatus::Online);
    }

    #[test]
    fn weighted_sum_matches_hand_computation() {
        let now = now();
        let mut node = healthy_node(now);
        node.uptime_percentage = 80.0;
        node.success_rate_percentage = 90.0;
        node.latency_ms = 200.0;
        node.storage_used_tb = 95.0;
        node.last_seen = now - Duration::hours(3);
        // 24 + 22.5 + 12 + 0 + 5 = 63.5 -> 64
        assert_eq!(compute_health_at(&node, now), 64);
    }

    #[test]
    fn health_is_clamped_for_adversarial_input() {
        let now = now();
        let mut node = healthy_node(now);
        node.latency_ms = 1_000_000.0;
        let h = compute_health_at(&node, now);
        assert!(h <= 100);

        node.uptime_percentage = 10_000.0;
        assert_eq!(compute_health_at(&node, now), 100);

        node.uptime_percentage = -10_000.0;
        assert_eq!(compute_health_at(&node, now), 0);

        node.uptime_percentage = f64::NAN;
        assert_eq!(compute_health_at(&node, now), 0);
    }

    #[test]
    fn near_empty_storage_gets_half_utilization_credit() {
        let now = now();
        let mut full = healthy_node(now);
        let mut empty = healthy_node(now);
        full.storage_used_tb = 50.0;
        empty.storage_used_tb = 5.0;
        let diff = i32::from(compute_health_at(&full, now)) - i32::from(compute_health_at(&empty, now));
        // 7.5 points of utilization credit, give or take rounding
        assert!((7..=8).contains(&diff), "diff = {diff}");
    }

    #[test]
    fn zero_capacity_scores_no_utilization() {
        let now = now();
        let mut node = healthy_node(now);
        node.storage_capacity_tb = 0.0;
        node.storage_used_tb = 0.0;
        node.storage_available_tb = 0.0;
        // 29.97 + 24.975 + 19.6 + 0 + 10 = 84.545
        assert_eq!(compute_health_at(&node, now), 85);
    }

    #[test]
    fn activity_steps_at_one_and_twenty_four_hours() {
        let now = now();
        let mut node = healthy_node(now);
        let fresh = compute_health_at(&node, now);
        node.last_seen = now - Duration::hours(2);
        let stale = compute_health_at(&node, now);
        node.last_seen = now - Duration::hours(30);
        let gone = compute_health_at(&node, now);
        assert_eq!(fresh - stale, 5);
        assert_eq!(stale - gone, 5);
    }

    #[test]
    fn activity_credit_drops_exactly_at_one_and_twenty_four_hours() {
        assert!((activity_score(1.0) - 50.0).abs() < f64::EPSILON);
        assert!(activity_score(24.0).abs() < f64::EPSILON);

        let now = now();
        let mut node = healthy_node(now);
        let at = |node: &mut NodeRecord, since: Duration| {
            node.last_seen = now - since;
            compute_health_at(node, now)
        };
        // 99.545 with full activity credit, 94.545 with half, 89.545 with none
        assert_eq!(at(&mut node, Duration::minutes(59)), 100);
        assert_eq!(at(&mut node, Duration::hours(1)), 95);
        assert_eq!(at(&mut node, Duration::minutes(24 * 60 - 1)), 95);
        assert_eq!(at(&mut node, Duration::hours(24)), 90);
    }

    #[test]
    fn stale_node_is_offline_even_at_full_uptime() {
        let now = now();
        let mut node = healthy_node(now);
        node.uptime_percentage = 100.0;
        node.last_seen = now - Duration::hours(48);
        assert_eq!(classify_status_at(&node, now), NodeStatus::Offline);

        node.uptime_percentage = 99.0;
        assert_eq!(classify_status_at(&node, now), NodeStatus::Offline);
    }

    #[test]
    fn low_uptime_is_offline() {
        let now = now();
        let mut node = healthy_node(now);
        node.uptime_percentage = 49.9;
        assert_eq!(classify_status_at(&node, now), NodeStatus::Offline);
    }

    #[test]
    fn degraded_rules() {
        let now = now();

        let mut node = healthy_node(now);
        node.last_seen = now - Duration::minutes(90);
        assert_eq!(classify_status_at(&node, now), NodeStatus::Degraded);

        let mut node = healthy_node(now);
        node.uptime_percentage = 94.9;
        assert_eq!(classify_status_at(&node, now), NodeStatus::Degraded);

        let mut node = healthy_node(now);
        node.success_rate_percentage = 89.9;
        assert_eq!(classify_status_at(&node, now), NodeStatus::Degraded);
    }

    #[test]
    fn boundaries_are_strict() {
        let now = now();
        let mut node = healthy_node(now);
        node.last_seen = now - Duration::hours(24);
        assert_eq!(classify_status_at(&node, now), NodeStatus::Degraded);
        node.last_seen = now - Duration::hours(1);
        assert_eq!(classify_status_at(&node, now), NodeStatus::Online);
        node.uptime_percentage = 95.0;
        node.success_rate_percentage = 90.0;
        assert_eq!(classify_status_at(&node, now), NodeStatus::Online);
    }

    #[test]
    fn future_last_seen_counts_as_just_seen() {
        let now = now();
        let mut node = healthy_node(now);
        node.last_seen = now + Duration::hours(5);
        assert!(hours_since_seen(&node, now).abs() < f64::EPSILON);
        assert_eq!(classify_status_at(&node, now), NodeStatus::Online);
    }
}
