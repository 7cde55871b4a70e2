//! Periodic refresh loop.

use std::time::Duration;

use chrono::Utc;

use xandview_core::{Dashboard, DashboardConfig, NetworkMetrics};

use crate::cli::{OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::network;

/// Refresh on the watch interval instead of the profile's.
fn watch_config(mut config: DashboardConfig, interval: Duration) -> DashboardConfig {
    config.refresh_interval = interval;
    config
}

fn emit(metrics: &NetworkMetrics, out: &OutputOpts) -> Result<(), CliError> {
    let rendered = match out.format {
        OutputFormat::Table => format!(
            "── {} ──\n{}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            network::summary(metrics, out.color)
        ),
        // One document per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(metrics)?,
        OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(metrics)?),
        OutputFormat::Plain => format!("{:.1}", metrics.network_health),
    };
    output::print_output(&rendered, out.quiet);
    Ok(())
}

pub async fn handle(config: DashboardConfig, args: WatchArgs, out: &OutputOpts) -> Result<(), CliError> {
    let config = watch_config(config, Duration::from_secs(args.interval));
    let dashboard = Dashboard::mock(config)?;
    dashboard.start().await;

    let mut metrics = dashboard.metrics();
    let mut errors = dashboard.store().subscribe_errors();
    let mut printed: u64 = 0;

    if dashboard.store().last_refresh().is_some() {
        emit(metrics.current(), out)?;
        printed += 1;
    } else if let Some(err) = dashboard.last_error() {
        eprintln!("initial refresh failed, retrying every {}s: {err}", args.interval);
    }

    while args.count.is_none_or(|limit| printed < limit) {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                break;
            }
            next = metrics.changed() => {
                let Some(snapshot) = next else { break };
                emit(&snapshot, out)?;
                printed += 1;
            }
            failure = errors.changed() => {
                let Some(failure) = failure else { break };
                if let Some(message) = failure.filter(|_| !out.quiet) {
                    eprintln!("refresh failed, showing last good data: {message}");
                }
            }
        }
    }

    dashboard.stop().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_flag_replaces_profile_interval() {
        let base = DashboardConfig::default();
        let fast = watch_config(base.clone(), Duration::from_secs(5));
        assert_eq!(fast.refresh_interval, Duration::from_secs(5));
        assert_eq!(fast.cache_ttl, base.cache_ttl);
    }
}
