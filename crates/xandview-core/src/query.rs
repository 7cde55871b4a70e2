// ── Node query ──
//
// Search, filter, sort and truncate a classified node collection.
// Used for the node table and the "top performers" view.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::{NodeRecord, NodeStatus};

/// Default number of rows returned by a query.
pub const DEFAULT_LIMIT: usize = 10;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortField {
    #[default]
    Health,
    Uptime,
    Rewards,
    Latency,
    Stake,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Query over a node collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeQuery {
    /// Case-insensitive substring matched against id, city and country.
    pub search: Option<String>,
    pub status: Option<NodeStatus>,
    pub sort: SortField,
    pub direction: SortDirection,
    /// `None` returns every match.
    pub limit: Option<usize>,
}

impl Default for NodeQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            sort: SortField::Health,
            direction: SortDirection::Descending,
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl NodeQuery {
    /// Highest-health nodes first.
    pub fn top(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn search(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.search = (!needle.trim().is_empty()).then_some(needle);
        self
    }

    pub fn status(mut self, status: NodeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn sort_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = field;
        self.direction = direction;
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn matches(&self, node: &NodeRecord) -> bool {
        if let Some(status) = self.status {
            if node.status != Some(status) {
                return false;
            }
        }
        let Some(needle) = self.search.as_deref() else {
            return true;
        };
        let needle = needle.trim().to_lowercase();
        [
            node.node_id.as_str(),
            node.location.city.as_str(),
            node.location.country.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Apply the query, borrowing from `nodes`. Sorting is stable.
    pub fn apply<'a>(&self, nodes: &'a [NodeRecord]) -> Vec<&'a NodeRecord> {
        let mut hits: Vec<&NodeRecord> = nodes.iter().filter(|n| self.matches(n)).collect();
        hits.sort_by(|a, b| {
            let ord = compare(self.sort, a, b);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }
        hits
    }
}

fn compare(field: SortField, a: &NodeRecord, b: &NodeRecord) -> Ordering {
    match field {
        SortField::Health => a.health_or_zero().cmp(&b.health_or_zero()),
        SortField::Uptime => a.uptime_percentage.total_cmp(&b.uptime_percentage),
        SortField::Rewards => a.total_rewards_earned.total_cmp(&b.total_rewards_earned),
        SortField::Latency => a.latency_ms.total_cmp(&b.latency_ms),
        SortField::Stake => a.stake_amount.total_cmp(&b.stake_amount),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::node::fixtures::healthy_node;
    use crate::model::{Location, NodeId};
    use chrono::Utc;

    fn sample() -> Vec<NodeRecord> {
        let now = Utc::now();
        let mk = |id: &str, city: &str, country: &str, health: u8, latency: f64, status: NodeStatus| {
            let mut n = healthy_node(now);
            n.node_id = NodeId::new(id);
            n.location = Location::new(city, country);
            n.health = Some(health);
            n.latency_ms = latency;
            n.status = Some(status);
            n
        };
        vec![
            mk("XN-0001", "Tokyo", "Japan", 70, 80.0, NodeStatus::Degraded),
            mk("XN-0002", "London", "United Kingdom", 95, 12.0, NodeStatus::Online),
            mk("XN-0003", "Oslo", "Norway", 40, 140.0, NodeStatus::Offline),
            mk("XN-0004", "New York", "United States", 95, 30.0, NodeStatus::Online),
        ]
    }

    fn ids(hits: &[&NodeRecord]) -> Vec<String> {
        hits.iter().map(|n| n.node_id.to_string()).collect()
    }

    #[test]
    fn default_sorts_by_health_descending_and_is_stable() {
        let nodes = sample();
        let hits = NodeQuery::default().apply(&nodes);
        assert_eq!(ids(&hits), ["XN-0002", "XN-0004", "XN-0001", "XN-0003"]);
    }

    #[test]
    fn top_truncates() {
        let nodes = sample();
        assert_eq!(NodeQuery::top(2).apply(&nodes).len(), 2);
        assert_eq!(NodeQuery::top(100).apply(&nodes).len(), 4);
        assert!(NodeQuery::top(0).apply(&nodes).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let nodes = sample();
        assert_eq!(ids(&NodeQuery::default().search("united").apply(&nodes)), ["XN-0002", "XN-0004"]);
        assert_eq!(ids(&NodeQuery::default().search("TOKYO").apply(&nodes)), ["XN-0001"]);
        assert_eq!(ids(&NodeQuery::default().search("xn-0003").apply(&nodes)), ["XN-0003"]);
        assert!(NodeQuery::default().search("atlantis").apply(&nodes).is_empty());
        // blank search matches everything
        assert_eq!(NodeQuery::default().search("   ").apply(&nodes).len(), 4);
    }

    #[test]
    fn status_filter() {
        let nodes = sample();
        let hits = NodeQuery::default().status(NodeStatus::Online).apply(&nodes);
        assert!(hits.iter().all(|n| n.status == Some(NodeStatus::Online)));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn sort_by_latency_ascending() {
        let nodes = sample();
        let hits = NodeQuery::default()
            .sort_by(SortField::Latency, SortDirection::Ascending)
            .limit(None)
            .apply(&nodes);
        assert_eq!(ids(&hits), ["XN-0002", "XN-0004", "XN-0001", "XN-0003"]);
    }

    #[test]
    fn sort_field_parses() {
        assert_eq!("Rewards".parse::<SortField>().unwrap(), SortField::Rewards);
        assert!("colour".parse::<SortField>().is_err());
    }
}
