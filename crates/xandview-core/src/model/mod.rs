// ── Domain model ──
//
// Canonical types shared by the engine, the fetch layer, and the CLI.

pub mod history;
pub mod metrics;
pub mod node;
pub mod node_id;

// ── Re-exports ──────────────────────────────────────────────────────

pub use history::{HistoricalPoint, TimeRange};
pub use metrics::NetworkMetrics;
pub use node::{Location, NodeRecord, NodeStatus};
pub use node_id::NodeId;
