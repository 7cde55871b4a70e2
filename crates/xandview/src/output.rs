//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use xandview_core::NodeStatus;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::config::Defaults;
use crate::error::CliError;

// ── Resolved output options ──────────────────────────────────────────

/// Output settings after merging flags over config defaults.
#[derive(Debug, Clone, Copy)]
pub struct OutputOpts {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

impl OutputOpts {
    /// Flag value wins, then the config default, then table / auto.
    pub fn resolve(global: &GlobalOpts, defaults: &Defaults) -> Self {
        let format = global
            .output
            .or_else(|| parse_default("output", &defaults.output))
            .unwrap_or(OutputFormat::Table);
        let color = global
            .color
            .or_else(|| parse_default("color", &defaults.color))
            .unwrap_or(ColorMode::Auto);
        Self {
            format,
            color: should_color(color),
            quiet: global.quiet,
            yes: global.yes,
        }
    }
}

fn parse_default<T: clap::ValueEnum>(key: &str, value: &str) -> Option<T> {
    let parsed = T::from_str(value, true).ok();
    if parsed.is_none() {
        tracing::warn!(key, value, "ignoring unrecognized config default");
    }
    parsed
}

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Status label, colored green / yellow / red when enabled.
pub fn paint_status(status: Option<NodeStatus>, color: bool) -> String {
    let Some(status) = status else {
        return "-".into();
    };
    let label = status.to_string();
    if !color {
        return label;
    }
    match status {
        NodeStatus::Online => label.green().to_string(),
        NodeStatus::Degraded => label.yellow().to_string(),
        NodeStatus::Offline => label.red().to_string(),
    }
}

/// Health score, colored by band (≥ 80 good, ≥ 50 fair, else poor).
pub fn paint_health(health: Option<u8>, color: bool) -> String {
    let Some(h) = health else {
        return "-".into();
    };
    let label = h.to_string();
    if !color {
        return label;
    }
    match h {
        80.. => label.green().to_string(),
        50..=79 => label.yellow().to_string(),
        _ => label.red().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one value per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are
/// key/value listings rather than tables.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Row {
        id: String,
        value: u32,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: "XN-0001".into(), value: 1 },
            Row { id: "XN-0002".into(), value: 2 },
        ]
    }

    fn render(format: OutputFormat) -> String {
        render_list(format, &rows(), |r| Row { id: r.id.clone(), value: r.value }, |r| r.id.clone()).unwrap()
    }

    #[test]
    fn plain_is_one_value_per_line() {
        assert_eq!(render(OutputFormat::Plain), "XN-0001\nXN-0002");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render(OutputFormat::JsonCompact);
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[1]["value"], 2);
    }

    #[test]
    fn table_has_headers() {
        let out = render(OutputFormat::Table);
        assert!(out.contains("id") && out.contains("XN-0002"));
    }

    #[test]
    fn config_defaults_apply_when_flags_are_absent() {
        use clap::Parser;
        let global = crate::cli::Cli::try_parse_from(["xandview", "--color", "never", "network"])
            .unwrap()
            .global;
        let defaults = Defaults {
            output: "yaml".into(),
            ..Defaults::default()
        };
        let opts = OutputOpts::resolve(&global, &defaults);
        assert_eq!(opts.format, OutputFormat::Yaml);
        assert!(!opts.color);

        let bogus = Defaults {
            output: "xml".into(),
            ..Defaults::default()
        };
        assert_eq!(OutputOpts::resolve(&global, &bogus).format, OutputFormat::Table);
    }

    #[test]
    fn uncolored_labels_are_plain() {
        assert_eq!(paint_status(Some(NodeStatus::Degraded), false), "degraded");
        assert_eq!(paint_status(None, false), "-");
        assert_eq!(paint_health(Some(91), false), "91");
        assert!(paint_health(Some(91), true).contains("\u{1b}["));
    }
}
