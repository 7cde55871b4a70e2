//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use xandview_config::ConfigError;
use xandview_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const SOURCE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Data source ──────────────────────────────────────────────────

    #[error("Node data unavailable: {reason}")]
    #[diagnostic(
        code(xandview::source_unavailable),
        help("The data source failed after all retries. Try again, or raise retry_attempts in the config.")
    )]
    SourceUnavailable { reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(xandview::not_found),
        help("Run: xandview {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(xandview::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(xandview::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: xandview config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(xandview::config),
        help("Check the config file: xandview config path")
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(xandview::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(xandview::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(xandview::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(xandview::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnavailable { .. } => exit_code::SOURCE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NonInteractiveRequiresYes { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SourceUnavailable { reason } => CliError::SourceUnavailable { reason },

            CoreError::NodeNotFound { identifier } => CliError::NotFound {
                resource_type: "node".into(),
                identifier,
                list_command: "nodes list".into(),
            },

            CoreError::InvalidNodeId { identifier } => CliError::Validation {
                field: "node_id".into(),
                reason: format!("'{identifier}' is not of the form XN-0000"),
            },

            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let source: CliError = CoreError::source_unavailable("down").into();
        assert_eq!(source.exit_code(), exit_code::SOURCE);

        let missing: CliError = CoreError::NodeNotFound {
            identifier: "XN-0100".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let bad_id: CliError = CoreError::InvalidNodeId {
            identifier: "node-1".into(),
        }
        .into();
        assert_eq!(bad_id.exit_code(), exit_code::USAGE);

        let profile: CliError = ConfigError::UnknownProfile { name: "lab".into() }.into();
        assert_eq!(profile.exit_code(), exit_code::USAGE);

        assert_eq!(CliError::Internal("x".into()).exit_code(), exit_code::GENERAL);
    }
}
