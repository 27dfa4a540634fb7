//! Core types for the graph.

pub mod node;
pub mod edge;
pub mod tags;

pub use node::NodeId;
pub use edge::EdgeKey;
pub use tags::{Tags, TagIndex};
