//! Directed, attribute-tagged graph.
//!
//! The [`Graph`] keeps a node set, an edge set, forward/reverse adjacency
//! indices derived from the edges, and per-entity tags. Mutation is additive
//! and deliberately lenient: an edge may name endpoints that were never added
//! as nodes, and a node may be added without any edges. Such a graph is
//! *dirty*. Operations that need a structurally sound graph (sampling and
//! export) go through the consistency gate in [`gate`], which transparently
//! cleans a dirty graph first and leaves the receiver untouched.
//!
//! ## Determinism
//!
//! All collections are `BTreeMap`/`BTreeSet`, so iteration order is the
//! lexicographic order of node identifiers. Cleaning, sampling and export
//! are fully determined by the node set, edge set and tags.

pub mod gate;
pub mod clean;
pub mod sample;
pub mod export;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::{EdgeKey, NodeId, TagIndex, Tags};

pub use clean::Islands;
pub use export::D3Document;

static NO_NEIGHBORS: BTreeSet<NodeId> = BTreeSet::new();
static NO_TAGS: Tags = Tags::EMPTY;

/// Directed graph with tagged nodes and edges.
///
/// Tags live behind a shared, copy-on-write handle: graphs derived by
/// [`Graph::clean`] or [`Graph::sample`] reuse their predecessor's tag
/// storage, and the first tag mutation on a sharing graph clones it.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Known nodes.
    nodes: BTreeSet<NodeId>,
    /// All edges, including ones whose endpoints are not (yet) nodes.
    edges: BTreeSet<EdgeKey>,
    /// Source -> targets.
    forward: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Target -> sources.
    reverse: BTreeMap<NodeId, BTreeSet<NodeId>>,
    /// Node and edge tags.
    tags: Arc<TagIndex>,
    /// Set by any mutation since the graph was last known to be sound.
    dirty: bool,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from existing node and edge collections and a tag index.
    ///
    /// The adjacency indices are derived from `edges`. The tag index is shared,
    /// not copied. The result is clean unless some edge names an endpoint
    /// missing from `nodes`.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = NodeId>,
        edges: impl IntoIterator<Item = EdgeKey>,
        tags: Arc<TagIndex>,
    ) -> Self {
        let mut graph = Self {
            nodes: nodes.into_iter().collect(),
            tags,
            ..Self::default()
        };
        for edge in edges {
            graph.index_edge(edge);
        }
        graph.dirty = graph.count_dangling_edges() > 0;
        graph
    }

    /// Add a node. Repeat calls are no-ops.
    pub fn add_node(&mut self, id: impl Into<NodeId>) {
        self.nodes.insert(id.into());
        self.dirty = true;
    }

    /// Add a node and merge `tags` into its tag mapping (last write wins per key).
    pub fn add_tagged_node(&mut self, id: impl Into<NodeId>, tags: Tags) {
        let id = id.into();
        if !tags.is_empty() {
            Arc::make_mut(&mut self.tags).merge_node(&id, tags);
        }
        self.add_node(id);
    }

    /// Add a directed edge.
    ///
    /// Neither endpoint has to be a node yet; edges with missing endpoints
    /// are dropped the next time the graph is cleaned.
    pub fn add_edge(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        self.index_edge(EdgeKey::new(source, target));
        self.dirty = true;
    }

    /// Add a directed edge and merge `tags` into the edge's tag mapping.
    pub fn add_tagged_edge(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        tags: Tags,
    ) {
        let key = EdgeKey::new(source, target);
        if !tags.is_empty() {
            Arc::make_mut(&mut self.tags).merge_edge(&key, tags);
        }
        self.index_edge(key);
        self.dirty = true;
    }

    fn index_edge(&mut self, edge: EdgeKey) {
        self.forward
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.target.clone());
        self.reverse
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.source.clone());
        self.edges.insert(edge);
    }

    /// Whether the graph has been mutated since it was last known to be sound.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// All nodes, in identifier order.
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    /// All edges, in `(source, target)` order.
    pub fn edges(&self) -> &BTreeSet<EdgeKey> {
        &self.edges
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has neither nodes nor edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Whether `id` is a node.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Whether the edge `source -> target` exists.
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.forward
            .get(source)
            .map_or(false, |targets| targets.contains(target))
    }

    /// Nodes that `id` has edges to.
    pub fn successors(&self, id: &str) -> &BTreeSet<NodeId> {
        self.forward.get(id).unwrap_or(&NO_NEIGHBORS)
    }

    /// Nodes that have edges to `id`.
    pub fn predecessors(&self, id: &str) -> &BTreeSet<NodeId> {
        self.reverse.get(id).unwrap_or(&NO_NEIGHBORS)
    }

    /// Tags of a node. Untagged and unknown nodes read as empty.
    pub fn node_tags(&self, id: &str) -> &Tags {
        self.tags.node(id).unwrap_or(&NO_TAGS)
    }

    /// Tags of an edge. Untagged and unknown edges read as empty.
    pub fn edge_tags(&self, source: &str, target: &str) -> &Tags {
        self.tags
            .edge(&EdgeKey::new(source, target))
            .unwrap_or(&NO_TAGS)
    }

    fn tags_of(&self, edge: &EdgeKey) -> &Tags {
        self.tags.edge(edge).unwrap_or(&NO_TAGS)
    }

    /// Whether `id` has at least one forward or reverse neighbor that is a node.
    fn has_known_neighbor(&self, id: &NodeId) -> bool {
        self.successors(id.as_str())
            .iter()
            .chain(self.predecessors(id.as_str()))
            .any(|neighbor| self.nodes.contains(neighbor))
    }

    fn is_dangling(&self, edge: &EdgeKey) -> bool {
        !self.nodes.contains(&edge.source) || !self.nodes.contains(&edge.target)
    }

    fn count_dangling_edges(&self) -> usize {
        self.edges.iter().filter(|edge| self.is_dangling(edge)).count()
    }

    /// Summary counts for logging.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            dangling_edges: self.count_dangling_edges(),
            islands: self
                .nodes
                .iter()
                .filter(|id| !self.has_known_neighbor(id))
                .count(),
            dirty: self.dirty,
        }
    }

    /// Deterministic fingerprint of the node set, edge set and the tags of
    /// present nodes and edges.
    ///
    /// Tags of entities that are not part of this graph do not contribute,
    /// so a cleaned graph sharing a larger tag index fingerprints the same as
    /// an equal graph built from scratch.
    pub fn fingerprint(&self) -> String {
        let input = FingerprintInput {
            nodes: self
                .nodes
                .iter()
                .map(|id| (id, self.node_tags(id.as_str())))
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|edge| (&edge.source, &edge.target, self.tags_of(edge)))
                .collect(),
        };
        canonical_hash_hex(&input)
    }
}

/// Node, edge and tag equality. The dirty flag is not compared.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
            && self.edges == other.edges
            && self
                .nodes
                .iter()
                .all(|id| self.node_tags(id.as_str()) == other.node_tags(id.as_str()))
            && self
                .edges
                .iter()
                .all(|edge| self.tags_of(edge) == other.tags_of(edge))
    }
}

impl Eq for Graph {}

/// Internal struct for computing the fingerprint hash.
#[derive(Serialize)]
struct FingerprintInput<'a> {
    nodes: Vec<(&'a NodeId, &'a Tags)>,
    edges: Vec<(&'a NodeId, &'a NodeId, &'a Tags)>,
}

/// Summary statistics of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of edges.
    pub edges: usize,
    /// Edges with at least one endpoint that is not a node.
    pub dangling_edges: usize,
    /// Nodes without any neighbor that is itself a node.
    pub islands: usize,
    /// Whether the graph was dirty.
    pub dirty: bool,
}
