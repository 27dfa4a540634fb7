//! Edge keys for the graph.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::NodeId;

/// Directed edge, identified by its ordered `(source, target)` pair.
///
/// Repeated insertions of the same pair collapse to one edge.
/// Implements `Ord` for deterministic ordering: (source, target).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    /// Node the edge points from.
    pub source: NodeId,
    /// Node the edge points to.
    pub target: NodeId,
}

impl EdgeKey {
    /// Create a new edge key.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
