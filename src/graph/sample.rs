//! Connectivity-biased subgraph sampling.
//!
//! ## Algorithm
//!
//! 1. Keep a frontier: unselected node -> selected nodes with an edge into it
//! 2. While fewer than `min(sample_size, nodes)` nodes are selected:
//!    - Take the first frontier key, or the next unselected node in
//!      identifier order when the frontier is empty
//!    - Select it
//!    - For each successor: record the edge if the successor is already
//!      selected, otherwise add this node to the successor's frontier entry
//!    - If the node was a frontier key, record its pending in-edges and
//!      drop the entry
//! 3. Return the selected nodes and recorded edges as a new graph
//!
//! Every edge is recorded exactly once, in its own direction, and only ever
//! between two selected nodes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use super::Graph;
use crate::types::{EdgeKey, NodeId};

impl Graph {
    /// Sample up to `sample_size` nodes and the edges among them.
    ///
    /// Runs on the cleaned graph when `self` is dirty. A `sample_size` of zero
    /// yields an empty graph. The result shares this graph's tags and is clean.
    pub fn sample(&self, sample_size: usize) -> Graph {
        self.require_clean("sample").sample_sound(sample_size)
    }

    fn sample_sound(&self, sample_size: usize) -> Graph {
        let budget = sample_size.min(self.nodes.len());

        let mut selected: BTreeSet<&NodeId> = BTreeSet::new();
        let mut edges: BTreeSet<EdgeKey> = BTreeSet::new();
        let mut frontier: BTreeMap<&NodeId, BTreeSet<&NodeId>> = BTreeMap::new();
        let mut unvisited = self.nodes.iter();

        while selected.len() < budget {
            let node = match frontier.keys().next() {
                Some(&node) => node,
                None => match unvisited.find(|node| !selected.contains(node)) {
                    Some(node) => node,
                    None => break,
                },
            };

            selected.insert(node);

            for target in self.successors(node.as_str()) {
                if selected.contains(target) {
                    edges.insert(EdgeKey::new(node, target));
                } else {
                    frontier.entry(target).or_default().insert(node);
                }
            }

            if let Some(sources) = frontier.remove(node) {
                for source in sources {
                    edges.insert(EdgeKey::new(source, node));
                }
            }
        }

        debug!(
            requested = sample_size,
            selected = selected.len(),
            edges = edges.len(),
            "Sampled graph"
        );

        Graph::from_parts(selected.into_iter().cloned(), edges, Arc::clone(&self.tags))
    }
}
