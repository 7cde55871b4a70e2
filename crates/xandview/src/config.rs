//! CLI configuration: thin wrapper around `xandview_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--profile, --nodes, --seed).

use xandview_core::DashboardConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use xandview_config::{
    Config, ConfigError, Defaults, Profile, config_path, load_config, load_config_or_default,
    profile_to_dashboard_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config
        .active_profile_name(global.profile.as_deref())
        .unwrap_or("default")
        .to_owned()
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Translate config + global flags into a `DashboardConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_dashboard_config(config: &Config, global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let profile = config
        .resolve_profile(global.profile.as_deref())
        .map_err(|e| match e {
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: available_profiles(config),
            },
            other => other.into(),
        })?;

    let mut dashboard = profile_to_dashboard_config(&config.defaults, profile)?;

    if let Some(nodes) = global.nodes {
        if nodes == 0 {
            return Err(CliError::Validation {
                field: "nodes".into(),
                reason: "must be at least 1".into(),
            });
        }
        dashboard.node_count = nodes;
    }
    if global.seed.is_some() {
        dashboard.seed = global.seed;
    }

    tracing::debug!(
        profile = %active_profile_name(global, config),
        nodes = dashboard.node_count,
        seed = ?dashboard.seed,
        "resolved dashboard config"
    );
    Ok(dashboard)
}
