//! Shared helpers for command handlers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Stderr spinner shown while data loads. Hidden when quiet or piped.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── Formatting ──────────────────────────────────────────────────────

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Binary-scaled byte count, e.g. `1.5 TB`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

pub fn format_tb(tb: f64) -> String {
    format!("{tb:.2} TB")
}

/// Bandwidth, switching to Gbps at 1000 Mbps.
pub fn format_mbps(mbps: f64) -> String {
    if mbps >= 1000.0 {
        format!("{:.2} Gbps", mbps / 1000.0)
    } else {
        format!("{mbps:.0} Mbps")
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Thousands-separated with two decimals, e.g. `12,345.67`.
pub fn format_number(value: f64) -> String {
    let raw = format!("{:.2}", value.abs());
    let (int, frac) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Coarse age of a timestamp, e.g. `3h 12m ago`.
pub fn format_last_seen(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let Ok(age) = (now - at).to_std() else {
        return "just now".into();
    };
    if age < Duration::from_secs(60) {
        return "just now".into();
    }
    // Minute resolution is enough for a dashboard.
    let rounded = Duration::from_secs(age.as_secs() / 60 * 60);
    format!("{} ago", humantime::format_duration(rounded))
}
