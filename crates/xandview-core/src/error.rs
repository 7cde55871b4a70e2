// ── Core error types ──
//
// The pure engine (health, aggregate, synth, series) is total and never
// returns these. They come from the data source, from lookups, and from
// building a dashboard out of bad configuration.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Data source ──────────────────────────────────────────────────
    #[error("Node data source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    // ── Lookups ──────────────────────────────────────────────────────
    #[error("Node not found: {identifier}")]
    NodeNotFound { identifier: String },

    #[error("Invalid node id '{identifier}' (expected XN- followed by four digits)")]
    InvalidNodeId { identifier: String },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn source_unavailable(reason: impl Into<String>) -> Self {
        Self::SourceUnavailable { reason: reason.into() }
    }
}
