//! Historical series handler.

use tabled::Tabled;

use xandview_core::{ChartMetric, Dashboard, DashboardConfig, HistoricalPoint, TimeRange, generate_series};

use crate::cli::{HistoryArgs, MetricArg, OutputFormat, RangeArg};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "Time (UTC)")]
    timestamp: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn metric(arg: MetricArg) -> ChartMetric {
    match arg {
        MetricArg::Uptime => ChartMetric::Uptime,
        MetricArg::StorageUsed => ChartMetric::StorageUsed,
        MetricArg::StorageTotal => ChartMetric::StorageTotal,
        MetricArg::Rewards => ChartMetric::Rewards,
        MetricArg::Latency => ChartMetric::Latency,
    }
}

fn range(arg: RangeArg) -> TimeRange {
    match arg {
        RangeArg::Hour => TimeRange::Hour,
        RangeArg::Day => TimeRange::Day,
        RangeArg::Week => TimeRange::Week,
        RangeArg::Month => TimeRange::Month,
        RangeArg::Quarter => TimeRange::Quarter,
        RangeArg::All => TimeRange::All,
    }
}

/// Chart heading, e.g. `Average Uptime (%) · 24 Hours`.
fn caption(chart: ChartMetric, window: TimeRange, hours: Option<u32>) -> String {
    match hours {
        Some(1) => format!("{} · 1 Hour", chart.label()),
        Some(h) => format!("{} · {h} Hours", chart.label()),
        None => format!("{} · {}", chart.label(), window.label()),
    }
}

pub async fn handle(config: DashboardConfig, args: HistoryArgs, out: &OutputOpts) -> Result<(), CliError> {
    let chart = metric(args.metric);
    let window = range(args.range);

    let pb = util::spinner("Generating series…", out.quiet);
    let points = Dashboard::oneshot(config, |d| async move {
        Ok(match args.hours {
            Some(hours) => {
                let seed = chart.seed_from(&d.nodes_snapshot(), &d.metrics_snapshot());
                generate_series(hours, seed, chart.variance())
            }
            None => d.series(chart, window),
        })
    })
    .await;
    pb.finish_and_clear();
    let points = points?;

    tracing::debug!(metric = %chart, points = points.len(), "generated series");
    if out.format == OutputFormat::Table && !out.quiet {
        eprintln!("{}", caption(chart, window, args.hours));
    }
    let rendered = output::render_list(
        out.format,
        &points,
        |p: &HistoricalPoint| PointRow {
            timestamp: p.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            value: format!("{:.2}", p.value),
        },
        |p| format!("{}\t{}", p.timestamp.to_rfc3339(), p.value),
    )?;
    output::print_output(&rendered, out.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_onto_engine_types() {
        assert_eq!(metric(MetricArg::StorageUsed), ChartMetric::StorageUsed);
        assert_eq!(range(RangeArg::Quarter).window_hours(), 2160);
        assert_eq!(range(RangeArg::All), TimeRange::All);
        assert_eq!(range(RangeArg::Hour).hours(), Some(1));
    }

    #[test]
    fn caption_names_metric_and_window() {
        assert_eq!(
            caption(ChartMetric::Uptime, TimeRange::Day, None),
            "Average Uptime (%) · 24 Hours"
        );
        assert_eq!(
            caption(ChartMetric::Latency, TimeRange::All, Some(12)),
            "Average Latency (ms) · 12 Hours"
        );
        assert_eq!(caption(ChartMetric::Rewards, TimeRange::All, None), "Total Rewards · All Time");
    }
}
