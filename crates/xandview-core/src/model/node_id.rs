// ── Node identity ──
//
// Every node record is keyed by a `NodeId`. Synthesized identifiers
// follow the `XN-0001` scheme; identifiers coming from elsewhere are
// accepted verbatim and only checked on demand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PREFIX: &str = "XN";

/// Stable string key for a node, unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier for the node at `index` in construction order (0-based).
    ///
    /// ```
    /// use xandview_core::NodeId;
    /// assert_eq!(NodeId::from_index(0).as_str(), "XN-0001");
    /// ```
    pub fn from_index(index: usize) -> Self {
        Self(format!("{PREFIX}-{:04}", index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identifier follows the `XN-` + four digits scheme.
    pub fn is_well_formed(&self) -> bool {
        crate::validate::is_valid_node_id(&self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_pads_to_four_digits() {
        assert_eq!(NodeId::from_index(0).as_str(), "XN-0001");
        assert_eq!(NodeId::from_index(24).as_str(), "XN-0025");
        assert_eq!(NodeId::from_index(9998).as_str(), "XN-9999");
    }

    #[test]
    fn well_formed_check() {
        assert!(NodeId::from_index(41).is_well_formed());
        assert!(!NodeId::from("node-7").is_well_formed());
        assert!(!NodeId::from_index(10_000).is_well_formed());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = NodeId::from("XN-0003");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"XN-0003\""));
    }
}
