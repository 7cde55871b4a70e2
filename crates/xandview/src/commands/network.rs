//! Network summary handler.

use xandview_core::{Dashboard, DashboardConfig, NetworkMetrics};

use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

pub(crate) fn summary(m: &NetworkMetrics, color: bool) -> String {
    let health = output::paint_health(Some(network_health_score(m.network_health)), color);
    [
        format!("Nodes:        {} total", m.total_nodes),
        format!(
            "              {} online / {} degraded / {} offline",
            m.online_nodes,
            m.degraded_nodes(),
            m.offline_nodes
        ),
        format!("Health:       {health} (mean {:.1})", m.network_health),
        format!("Uptime:       {}", util::format_percentage(m.average_uptime)),
        format!("Response:     {:.1} ms", m.average_response_time),
        format!(
            "Storage:      {} / {} ({})",
            util::format_bytes(m.used_storage),
            util::format_bytes(m.total_storage),
            util::format_percentage(m.storage_utilization_pct())
        ),
        format!("Staked:       {}", util::format_number(m.total_staked)),
        format!("Redundancy:   {:.1}x", m.data_redundancy),
    ]
    .join("\n")
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn network_health_score(mean: f64) -> u8 {
    mean.round().clamp(0.0, 100.0) as u8
}

pub async fn handle(config: DashboardConfig, out: &OutputOpts) -> Result<(), CliError> {
    let pb = util::spinner("Aggregating network…", out.quiet);
    let metrics = Dashboard::oneshot(config, |d| async move { Ok(d.metrics_snapshot()) }).await;
    pb.finish_and_clear();
    let metrics = metrics?;

    let rendered = output::render_single(
        out.format,
        &metrics,
        |m| summary(m, out.color),
        |m| format!("{:.1}", m.network_health),
    )?;
    output::print_output(&rendered, out.quiet);
    Ok(())
}
