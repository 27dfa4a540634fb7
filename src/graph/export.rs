//! D3 export.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use serde::{Deserialize, Serialize};

use super::Graph;
use crate::types::NodeId;

/// Node/link/adjacency document consumed by the D3 force-graph viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct D3Document {
    /// One record per node: its tags plus `id`.
    pub nodes: Vec<BTreeMap<String, String>>,
    /// One record per edge: its tags plus `source` and `target`.
    pub links: Vec<BTreeMap<String, String>>,
    /// Node -> nodes it has edges to. Nodes without any are omitted.
    pub outbound: BTreeMap<String, Vec<String>>,
    /// Node -> nodes that have edges to it. Nodes without any are omitted.
    pub inbound: BTreeMap<String, Vec<String>>,
}

impl D3Document {
    /// Serialize to a JSON string.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize as JSON into `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, self)
    }
}

impl Graph {
    /// Export the graph as a [`D3Document`].
    ///
    /// Runs on the cleaned graph when `self` is dirty.
    pub fn to_d3(&self) -> D3Document {
        self.require_clean("to_d3").project_d3()
    }

    fn project_d3(&self) -> D3Document {
        let nodes = self
            .nodes
            .iter()
            .map(|id| {
                let mut record = self.node_tags(id.as_str()).to_record();
                record.insert("id".to_string(), id.to_string());
                record
            })
            .collect();

        let links = self
            .edges
            .iter()
            .map(|edge| {
                let mut record = self.tags_of(edge).to_record();
                record.insert("source".to_string(), edge.source.to_string());
                record.insert("target".to_string(), edge.target.to_string());
                record
            })
            .collect();

        D3Document {
            nodes,
            links,
            outbound: adjacency_lists(&self.forward),
            inbound: adjacency_lists(&self.reverse),
        }
    }
}

fn adjacency_lists(index: &BTreeMap<NodeId, BTreeSet<NodeId>>) -> BTreeMap<String, Vec<String>> {
    index
        .iter()
        .filter(|(_, neighbors)| !neighbors.is_empty())
        .map(|(id, neighbors)| {
            (
                id.to_string(),
                neighbors.iter().map(NodeId::to_string).collect(),
            )
        })
        .collect()
}
