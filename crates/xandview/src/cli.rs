//! Clap derive structures for the `xandview` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// xandview -- storage-network node dashboard in the terminal
#[derive(Debug, Parser)]
#[command(
    name = "xandview",
    version,
    about = "Inspect storage-network node health from the command line",
    long_about = "Health scores, status classification, network aggregates and\n\
        historical series for a storage network's nodes.\n\n\
        All node telemetry is synthesized; use --seed for reproducible output.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "XANDVIEW_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "XANDVIEW_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto, or `defaults.color` from config]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Number of nodes to synthesize (overrides profile)
    #[arg(long, short = 'n', global = true)]
    pub nodes: Option<usize>,

    /// Seed for reproducible node data (overrides profile)
    #[arg(long, env = "XANDVIEW_SEED", global = true)]
    pub seed: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect and rank nodes
    #[command(alias = "node")]
    Nodes(NodesArgs),

    /// Show the network-wide summary
    #[command(alias = "metrics")]
    Network,

    /// Print a synthetic historical series for a chart metric
    #[command(alias = "hist")]
    History(HistoryArgs),

    /// Refresh periodically and print the network summary each cycle
    Watch(WatchArgs),

    /// Manage configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List nodes with optional search, filter and sort
    #[command(alias = "ls")]
    List(NodesListArgs),

    /// Show one node in detail
    Get {
        /// Node identifier (e.g. XN-0001)
        node_id: String,
    },

    /// Top performers by health score
    Top {
        /// Number of nodes to show
        #[arg(long, short = 'l', default_value = "10")]
        limit: usize,
    },
}

#[derive(Debug, Args)]
pub struct NodesListArgs {
    /// Case-insensitive match on node id, city or country
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only show nodes with this status
    #[arg(long)]
    pub status: Option<StatusFilter>,

    /// Sort field
    #[arg(long, default_value = "health")]
    pub sort: SortArg,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// Maximum rows to show (0 for all)
    #[arg(long, short = 'l', default_value = "0")]
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Online,
    Degraded,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Health,
    Uptime,
    Rewards,
    Latency,
    Stake,
}

// ── History ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Metric to chart
    pub metric: MetricArg,

    /// Time range preset
    #[arg(long, short = 'r', default_value = "24h")]
    pub range: RangeArg,

    /// Explicit window in hours (overrides --range)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=2160))]
    pub hours: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Uptime,
    StorageUsed,
    StorageTotal,
    Rewards,
    Latency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangeArg {
    #[value(name = "1h")]
    Hour,
    #[value(name = "24h")]
    Day,
    #[value(name = "7d")]
    Week,
    #[value(name = "30d")]
    Month,
    #[value(name = "90d")]
    Quarter,
    #[value(name = "all")]
    All,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes
    #[arg(long, short = 'i', default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Stop after this many summaries (runs until Ctrl-C when omitted)
    #[arg(long, short = 'c')]
    pub count: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
