// ── Time-series types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// One sample of a historical series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Chart window presets.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum TimeRange {
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    Hour,
    #[default]
    #[strum(serialize = "24h")]
    #[serde(rename = "24h")]
    Day,
    #[strum(serialize = "7d")]
    #[serde(rename = "7d")]
    Week,
    #[strum(serialize = "30d")]
    #[serde(rename = "30d")]
    Month,
    #[strum(serialize = "90d")]
    #[serde(rename = "90d")]
    Quarter,
    #[strum(serialize = "all")]
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    /// Largest finite window; `All` is capped here when a series is built.
    pub const MAX_WINDOW_HOURS: u32 = 2160;

    pub fn label(self) -> &'static str {
        match self {
            Self::Hour => "1 Hour",
            Self::Day => "24 Hours",
            Self::Week => "7 Days",
            Self::Month => "30 Days",
            Self::Quarter => "90 Days",
            Self::All => "All Time",
        }
    }

    /// Window length in hours; `None` for the unbounded `All` range.
    pub fn hours(self) -> Option<u32> {
        match self {
            Self::Hour => Some(1),
            Self::Day => Some(24),
            Self::Week => Some(168),
            Self::Month => Some(720),
            Self::Quarter => Some(Self::MAX_WINDOW_HOURS),
            Self::All => None,
        }
    }

    /// Finite window used for series generation.
    pub fn window_hours(self) -> u32 {
        self.hours().unwrap_or(Self::MAX_WINDOW_HOURS)
    }
}
