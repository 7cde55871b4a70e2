//! Analytics engine behind the xandview storage-network dashboard.
//!
//! Turns raw per-node telemetry into health scores, status
//! classifications and network-wide aggregates, and produces synthetic
//! historical series for charting. All node data is synthesized.
//!
//! - **Engine** — pure, synchronous functions: [`compute_health`],
//!   [`classify_status`], [`aggregate_network`], [`synthesize_nodes`],
//!   [`generate_series`]. They never fail and never panic on odd input.
//!
//! - **[`Fetcher`]** — wraps a [`NodeSource`] with a per-endpoint TTL cache
//!   and bounded linear retry. Failures come back inside a
//!   [`FetchOutcome`] instead of as `Err`.
//!
//! - **[`Dashboard`]** — lifecycle facade: [`refresh()`](Dashboard::refresh)
//!   publishes a fresh snapshot to the [`DataStore`],
//!   [`start()`](Dashboard::start) keeps doing so on an interval.
//!   [`Dashboard::oneshot()`] suits single CLI invocations.
//!
//! - **[`SnapshotStream<T>`]** — subscription handle vended by the store,
//!   with `current()` / `latest()` / `changed()` / `into_stream()`.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod health;
pub mod model;
pub mod numeric;
pub mod query;
pub mod random;
pub mod series;
pub mod store;
pub mod stream;
pub mod synth;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{TB_TO_BYTES, aggregate_network};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use fetch::{FetchOutcome, Fetcher, MockNodeSource, NodeSource, RetryPolicy, TtlCache};
pub use health::{classify_status, classify_status_at, compute_health, compute_health_at};
pub use query::{NodeQuery, SortDirection, SortField};
pub use random::Random;
pub use series::{ChartMetric, generate_series, generate_series_at};
pub use store::DataStore;
pub use stream::SnapshotStream;
pub use synth::{BandSplit, NodeSynthesizer, SynthesisProfile, synthesize_nodes};

pub use model::{HistoricalPoint, Location, NetworkMetrics, NodeId, NodeRecord, NodeStatus, TimeRange};
