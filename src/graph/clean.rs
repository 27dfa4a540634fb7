//! Island-pruning cleaner.
//!
//! Produces a new graph in which every edge joins two nodes and, unless
//! islands are kept, every node has at least one neighbor that is a node.
//!
//! The island test runs once against the original node set, with no
//! iteration to a fixed point. Because a node counts as its neighbor's
//! neighbor, every kept node still has a kept neighbor afterwards.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::Graph;
use crate::types::{EdgeKey, NodeId};

/// What the cleaner does with nodes that have no neighbor among the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Islands {
    /// Drop islands, and nodes whose only neighbors are dangling endpoints.
    #[default]
    Exclude,
    /// Keep every node; only dangling edges are dropped.
    Keep,
}

impl Graph {
    /// Clean the graph, excluding islands.
    pub fn clean(&self) -> Graph {
        self.clean_with(Islands::Exclude)
    }

    /// Clean the graph.
    ///
    /// Retained edges are those whose endpoints are both retained nodes. The
    /// tag index is shared with the result; tags of dropped entities stay in
    /// it but are never looked up.
    pub fn clean_with(&self, islands: Islands) -> Graph {
        let nodes: BTreeSet<NodeId> = match islands {
            Islands::Keep => self.nodes.clone(),
            Islands::Exclude => self
                .nodes
                .iter()
                .filter(|node| {
                    let keep = self.has_known_neighbor(node);
                    if !keep {
                        debug!(node = %node, "Excluding island");
                    }
                    keep
                })
                .cloned()
                .collect(),
        };

        let edges: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|edge| {
                let keep = nodes.contains(&edge.source) && nodes.contains(&edge.target);
                if !keep {
                    debug!(source = %edge.source, target = %edge.target, "Invalid edge");
                }
                keep
            })
            .cloned()
            .collect();

        debug!(
            kept_nodes = nodes.len(),
            kept_edges = edges.len(),
            dropped_islands = self.nodes.len() - nodes.len(),
            dropped_edges = self.edges.len() - edges.len(),
            "Cleaned graph"
        );

        Graph::from_parts(nodes, edges, Arc::clone(&self.tags))
    }
}
