// ── Runtime dashboard configuration ──
//
// Describes how a `Dashboard` sources and refreshes its data. Never
// touches disk: the config crate or the CLI builds one and hands it in.

use std::time::Duration;

use crate::error::CoreError;
use crate::fetch::{DEFAULT_CACHE_TTL, MockNodeSource, RetryPolicy};
use crate::synth::{BandSplit, DEFAULT_NODE_COUNT, SynthesisProfile};
use crate::validate::is_in_range;

/// Configuration for one dashboard instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Nodes per synthesized collection.
    pub node_count: usize,
    /// Cadence of the background refresh. Zero disables it.
    pub refresh_interval: Duration,
    /// Freshness window of the endpoint cache.
    pub cache_ttl: Duration,
    /// Simulated round-trip of the mock source.
    pub latency: Duration,
    pub retry: RetryPolicy,
    /// Base seed for reproducible data; `None` draws from entropy.
    pub seed: Option<u64>,
    pub profile: SynthesisProfile,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            refresh_interval: Duration::from_secs(30),
            cache_ttl: DEFAULT_CACHE_TTL,
            latency: MockNodeSource::DEFAULT_LATENCY,
            retry: RetryPolicy::default(),
            seed: None,
            profile: SynthesisProfile::default(),
        }
    }
}

impl DashboardConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.node_count == 0 {
            return Err(CoreError::Config {
                message: "node_count must be at least 1".into(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(CoreError::Config {
                message: "retry attempts must be at least 1".into(),
            });
        }
        let splits = [
            ("uptime", self.profile.uptime),
            ("success rate", self.profile.success_rate),
            ("recent activity", self.profile.recent_activity),
        ];
        for (band, split) in splits {
            let BandSplit::Proportional(fraction) = split else {
                continue;
            };
            if !is_in_range(fraction, 0.0, 1.0) {
                return Err(CoreError::Config {
                    message: format!("{band} fraction must be between 0 and 1, got {fraction}"),
                });
            }
        }
        Ok(())
    }

    /// Mock source matching this configuration.
    pub fn mock_source(&self) -> MockNodeSource {
        MockNodeSource::new(self.node_count)
            .with_latency(self.latency)
            .with_seed(self.seed)
            .with_profile(self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = DashboardConfig::default();
        assert_eq!(c.node_count, 25);
        assert_eq!(c.refresh_interval, Duration::from_secs(30));
        assert_eq!(c.cache_ttl, Duration::from_secs(30));
        assert_eq!(c.latency, Duration::from_millis(500));
        assert_eq!(c.retry.max_attempts, 3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_nodes_is_rejected() {
        let c = DashboardConfig {
            node_count: 0,
            ..DashboardConfig::default()
        };
        assert!(matches!(c.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn band_fractions_must_be_proportions() {
        let with_uptime = |uptime| DashboardConfig {
            profile: SynthesisProfile {
                uptime,
                ..SynthesisProfile::default()
            },
            ..DashboardConfig::default()
        };
        assert!(with_uptime(BandSplit::Proportional(1.0)).validate().is_ok());
        assert!(with_uptime(BandSplit::Fixed(400)).validate().is_ok());
        assert!(with_uptime(BandSplit::Proportional(1.2)).validate().is_err());
        assert!(with_uptime(BandSplit::Proportional(f64::NAN)).validate().is_err());
    }
}
