//! String-keyed metadata attached to nodes and edges.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::edge::EdgeKey;
use super::node::NodeId;

/// Mapping of tag keys to tag values.
///
/// Backed by a `BTreeMap` so serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// An empty tag mapping, usable in constant and static contexts.
    pub const EMPTY: Tags = Tags(BTreeMap::new());

    /// Create an empty tag mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `other` into `self`. Values from `other` win on key collision.
    pub fn merge(&mut self, other: Tags) {
        self.0.extend(other.0);
    }

    /// Look up a tag value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy the tags into a plain map, for building export records.
    pub fn to_record(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Tags {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Tag storage for a graph: node tags and edge tags kept in separate maps,
/// each keyed by its natural key type.
///
/// Entities without an entry read as having no tags. Entries for entities
/// that are no longer part of a graph are left in place and simply never
/// looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    nodes: BTreeMap<NodeId, Tags>,
    edges: BTreeMap<EdgeKey, Tags>,
}

impl TagIndex {
    /// Create an empty tag index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags for a node, if any were ever recorded.
    pub fn node(&self, id: &str) -> Option<&Tags> {
        self.nodes.get(id)
    }

    /// Tags for an edge, if any were ever recorded.
    pub fn edge(&self, key: &EdgeKey) -> Option<&Tags> {
        self.edges.get(key)
    }

    /// Merge tags into a node's mapping (last write wins per key).
    pub fn merge_node(&mut self, id: &NodeId, tags: Tags) {
        match self.nodes.get_mut(id) {
            Some(existing) => existing.merge(tags),
            None => {
                self.nodes.insert(id.clone(), tags);
            }
        }
    }

    /// Merge tags into an edge's mapping (last write wins per key).
    pub fn merge_edge(&mut self, key: &EdgeKey, tags: Tags) {
        match self.edges.get_mut(key) {
            Some(existing) => existing.merge(tags),
            None => {
                self.edges.insert(key.clone(), tags);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_last_write_wins() {
        let mut tags = Tags::from([("type", "item"), ("members", "yes")]);
        tags.merge(Tags::from([("type", "monster")]));

        assert_eq!(tags.get("type"), Some("monster"));
        assert_eq!(tags.get("members"), Some("yes"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_index_merges_per_entity() {
        let mut index = TagIndex::new();
        let id = NodeId::new("Cowhide");

        index.merge_node(&id, Tags::from([("type", "item")]));
        index.merge_node(&id, Tags::from([("tradeable", "yes")]));

        let tags = index.node("Cowhide").unwrap();
        assert_eq!(tags.get("type"), Some("item"));
        assert_eq!(tags.get("tradeable"), Some("yes"));
        assert!(index.node("Leather").is_none());
    }

    #[test]
    fn test_edge_tags_keyed_by_direction() {
        let mut index = TagIndex::new();
        index.merge_edge(&EdgeKey::new("a", "b"), Tags::from([("type", "drop")]));

        assert!(index.edge(&EdgeKey::new("a", "b")).is_some());
        assert!(index.edge(&EdgeKey::new("b", "a")).is_none());
    }

    #[test]
    fn test_tags_serialize_as_flat_object() {
        let tags = Tags::from([("type", "drop")]);
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"{"type":"drop"}"#);
    }
}
