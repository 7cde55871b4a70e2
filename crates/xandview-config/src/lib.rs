//! Configuration for the xandview CLI.
//!
//! TOML profiles layered over built-in defaults and `XANDVIEW_` environment
//! variables, and translation to `xandview_core::DashboardConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use xandview_core::validate::is_in_range;
use xandview_core::{BandSplit, DashboardConfig, RetryPolicy, SynthesisProfile};

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `XANDVIEW_DEFAULTS__NODE_COUNT=40`.
pub const ENV_PREFIX: &str = "XANDVIEW_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named data profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use: the explicit one, else `default_profile`.
    pub fn active_profile_name<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit.or(self.default_profile.as_deref())
    }

    /// Look up the active profile.
    ///
    /// A missing *default* profile is not an error (defaults apply); a
    /// missing profile the user asked for by name is.
    pub fn resolve_profile(&self, explicit: Option<&str>) -> Result<Option<&Profile>, ConfigError> {
        match explicit {
            Some(name) => self
                .profiles
                .get(name)
                .map(Some)
                .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() }),
            None => Ok(self
                .default_profile
                .as_deref()
                .and_then(|name| self.profiles.get(name))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_node_count")]
    pub node_count: usize,

    #[serde(default = "default_thirty")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_thirty")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            node_count: default_node_count(),
            refresh_interval_secs: default_thirty(),
            cache_ttl_secs: default_thirty(),
            latency_ms: default_latency_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_node_count() -> usize {
    25
}
fn default_thirty() -> u64 {
    30
}
fn default_latency_ms() -> u64 {
    500
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1000
}

/// A named set of overrides on top of [`Defaults`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Base seed for reproducible node data.
    pub seed: Option<u64>,

    pub node_count: Option<usize>,

    /// Share of nodes drawn from the high uptime band, in `[0, 1]`.
    pub high_uptime_fraction: Option<f64>,

    /// Share of nodes drawn from the high success-rate band.
    pub high_success_fraction: Option<f64>,

    /// Share of nodes seen within the last two hours.
    pub recent_activity_fraction: Option<f64>,

    pub refresh_interval_secs: Option<u64>,

    pub latency_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "xandview", "xandview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("xandview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, still honoring environment overrides.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

fn fraction(field: &str, value: Option<f64>, fallback: BandSplit) -> Result<BandSplit, ConfigError> {
    match value {
        None => Ok(fallback),
        Some(f) if is_in_range(f, 0.0, 1.0) => Ok(BandSplit::Proportional(f)),
        Some(f) => Err(invalid(field, format!("must be between 0 and 1, got {f}"))),
    }
}

/// Build a `DashboardConfig` from the defaults plus an optional profile.
pub fn profile_to_dashboard_config(
    defaults: &Defaults,
    profile: Option<&Profile>,
) -> Result<DashboardConfig, ConfigError> {
    let empty = Profile::default();
    let profile = profile.unwrap_or(&empty);

    let node_count = profile.node_count.unwrap_or(defaults.node_count);
    if node_count == 0 {
        return Err(invalid("node_count", "must be at least 1"));
    }
    if defaults.retry_attempts == 0 {
        return Err(invalid("retry_attempts", "must be at least 1"));
    }

    let base = SynthesisProfile::default();
    let synthesis = SynthesisProfile {
        uptime: fraction("high_uptime_fraction", profile.high_uptime_fraction, base.uptime)?,
        success_rate: fraction("high_success_fraction", profile.high_success_fraction, base.success_rate)?,
        recent_activity: fraction(
            "recent_activity_fraction",
            profile.recent_activity_fraction,
            base.recent_activity,
        )?,
    };

    Ok(DashboardConfig {
        node_count,
        refresh_interval: Duration::from_secs(
            profile
                .refresh_interval_secs
                .unwrap_or(defaults.refresh_interval_secs),
        ),
        cache_ttl: Duration::from_secs(defaults.cache_ttl_secs),
        latency: Duration::from_millis(profile.latency_ms.unwrap_or(defaults.latency_ms)),
        retry: RetryPolicy::new(defaults.retry_attempts, Duration::from_millis(defaults.retry_delay_ms)),
        seed: profile.seed,
        profile: synthesis,
    })
}
