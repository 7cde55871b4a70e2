//! Node command handlers.

use chrono::Utc;
use tabled::Tabled;

use xandview_core::validate::{is_valid_node_id, is_valid_search_query, sanitize_input};
use xandview_core::{
    CoreError, Dashboard, DashboardConfig, NodeId, NodeQuery, NodeRecord, NodeStatus, SortDirection, SortField,
};

use crate::cli::{NodesArgs, NodesCommand, NodesListArgs, SortArg, StatusFilter};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "Uptime")]
    uptime: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "Latency")]
    latency: String,
    #[tabled(rename = "Rewards")]
    rewards: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl NodeRow {
    fn new(n: &NodeRecord, color: bool) -> Self {
        Self {
            id: n.node_id.to_string(),
            status: output::paint_status(n.status, color),
            health: output::paint_health(n.health, color),
            uptime: util::format_percentage(n.uptime_percentage),
            storage: format!(
                "{} / {}",
                util::format_tb(n.storage_used_tb),
                util::format_tb(n.storage_capacity_tb)
            ),
            latency: format!("{:.0} ms", n.latency_ms),
            rewards: util::format_number(n.total_rewards_earned),
            location: format!("{}, {}", n.location.city, n.location.country),
        }
    }
}

fn detail(n: &NodeRecord, color: bool) -> String {
    let now = Utc::now();
    let utilization = n
        .utilization_pct()
        .map_or_else(|| "-".into(), util::format_percentage);
    [
        format!("ID:           {}", n.node_id),
        format!("Status:       {}", output::paint_status(n.status, color)),
        format!("Health:       {}", output::paint_health(n.health, color)),
        format!("Version:      {}", n.node_version),
        format!("Location:     {}, {}", n.location.city, n.location.country),
        format!(
            "Last seen:    {} ({})",
            util::format_last_seen(n.last_seen, now),
            n.last_seen.format("%Y-%m-%d %H:%M UTC")
        ),
        String::new(),
        format!("Uptime:       {}", util::format_percentage(n.uptime_percentage)),
        format!("Success rate: {}", util::format_percentage(n.success_rate_percentage)),
        format!("Failed ops:   {}", n.failed_operations_count),
        format!("Latency:      {:.1} ms", n.latency_ms),
        format!("Bandwidth:    {}", util::format_mbps(n.bandwidth_mbps)),
        String::new(),
        format!("Capacity:     {}", util::format_tb(n.storage_capacity_tb)),
        format!("Used:         {} ({utilization})", util::format_tb(n.storage_used_tb)),
        format!("Available:    {}", util::format_tb(n.storage_available_tb)),
        format!("Served:       {}", util::format_tb(n.data_served_tb)),
        format!("Redundancy:   {:.1}x", n.data_redundancy_factor),
        String::new(),
        format!("Stake:        {}", util::format_number(n.stake_amount)),
        format!("Rewards:      {}", util::format_number(n.total_rewards_earned)),
    ]
    .join("\n")
}

// ── Arg mapping ─────────────────────────────────────────────────────

fn sort_field(arg: SortArg) -> SortField {
    match arg {
        SortArg::Health => SortField::Health,
        SortArg::Uptime => SortField::Uptime,
        SortArg::Rewards => SortField::Rewards,
        SortArg::Latency => SortField::Latency,
        SortArg::Stake => SortField::Stake,
    }
}

fn status(filter: StatusFilter) -> NodeStatus {
    match filter {
        StatusFilter::Online => NodeStatus::Online,
        StatusFilter::Degraded => NodeStatus::Degraded,
        StatusFilter::Offline => NodeStatus::Offline,
    }
}

/// Build the list query, rejecting search text the dashboard would refuse.
fn list_query(args: &NodesListArgs) -> Result<NodeQuery, CliError> {
    let direction = if args.asc {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };
    let mut query = NodeQuery::default()
        .sort_by(sort_field(args.sort), direction)
        .limit((args.limit > 0).then_some(args.limit));

    if let Some(raw) = args.search.as_deref() {
        let needle = sanitize_input(raw);
        if !needle.is_empty() && !is_valid_search_query(&needle) {
            return Err(CliError::Validation {
                field: "search".into(),
                reason: format!("'{needle}' may only contain letters, digits, spaces and - _ , ."),
            });
        }
        query = query.search(needle);
    }
    if let Some(filter) = args.status {
        query = query.status(status(filter));
    }
    Ok(query)
}

fn render_nodes(nodes: &[&NodeRecord], out: &OutputOpts) -> Result<String, CliError> {
    output::render_list(
        out.format,
        nodes,
        |n| NodeRow::new(n, out.color),
        |n| n.node_id.to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(config: DashboardConfig, args: NodesArgs, out: &OutputOpts) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List(list) => {
            let query = list_query(&list)?;
            let pb = util::spinner("Loading nodes…", out.quiet);
            let nodes = Dashboard::oneshot(config, |d| async move { Ok(d.nodes_snapshot()) }).await;
            pb.finish_and_clear();
            let nodes = nodes?;

            let hits = query.apply(&nodes);
            tracing::debug!(matched = hits.len(), total = nodes.len(), "applied node query");
            output::print_output(&render_nodes(&hits, out)?, out.quiet);
            Ok(())
        }

        NodesCommand::Get { node_id } => {
            let node_id = sanitize_input(&node_id);
            if !is_valid_node_id(&node_id) {
                return Err(CoreError::InvalidNodeId { identifier: node_id }.into());
            }
            let id = NodeId::new(node_id);

            let pb = util::spinner("Loading node…", out.quiet);
            let node = Dashboard::oneshot(config, |d| async move {
                d.node(&id).ok_or(CoreError::NodeNotFound {
                    identifier: id.to_string(),
                })
            })
            .await;
            pb.finish_and_clear();
            let node = node?;

            let rendered = output::render_single(
                out.format,
                &node,
                |n| detail(n, out.color),
                |n| n.node_id.to_string(),
            )?;
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        NodesCommand::Top { limit } => {
            let pb = util::spinner("Loading nodes…", out.quiet);
            let nodes = Dashboard::oneshot(config, |d| async move { Ok(d.nodes_snapshot()) }).await;
            pb.finish_and_clear();
            let nodes = nodes?;

            let top = NodeQuery::top(limit).apply(&nodes);
            output::print_output(&render_nodes(&top, out)?, out.quiet);
            Ok(())
        }
    }
}
