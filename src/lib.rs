//! # nid
//!
//! Builds directed, attribute-tagged graphs of item relationships from
//! semantic wiki queries and exports them for D3 force-graph viewers.
//!
//! ## Core Contract
//!
//! 1. Mutation is lenient: nodes and edges are added in any order, and edges
//!    may name endpoints that never become nodes
//! 2. Sampling and export see a structurally sound graph, cleaned on demand
//! 3. Cleaning, sampling and export are deterministic for a given graph
//!
//! ## Architecture
//!
//! ```text
//! QueryService → Target adapters → Graph → (clean) → (sample) → D3Document
//!   (HTTP, rate limit, cache)                  ↑
//!                                      consistency gate
//! ```
//!
//! ## Example
//!
//! ```
//! use nid::{Graph, Tags};
//!
//! let mut graph = Graph::new();
//! graph.add_node("A");
//! graph.add_node("B");
//! graph.add_tagged_edge("A", "B", Tags::from([("type", "drop")]));
//! graph.add_node("C");
//!
//! let doc = graph.to_d3();
//! assert_eq!(doc.nodes.len(), 2);
//! assert_eq!(doc.outbound["A"], vec!["B".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod graph;
pub mod canonical;
pub mod query;
pub mod ingest;
pub mod output;

// Re-exports
pub use types::{EdgeKey, NodeId, TagIndex, Tags};
pub use graph::{D3Document, Graph, GraphStats, Islands};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use query::{
    paginated_ask, AskQuery, AskResult, AskResults, CacheConfig, CacheStats, CachedService,
    ClientConfig, QueryError, QueryService, RateLimited,
};
#[cfg(feature = "http")]
pub use query::{connect, SmwClient, WikiService};
pub use ingest::{build, resolve_targets, ApplySummary, IngestError, Target, TargetSelection};
pub use output::{resolve_output_path, write_document, OutputError};

/// Output path used when none is given.
pub const DEFAULT_OUTPUT_PATH: &str = "./graph.json";

/// File name appended when the output path is a directory.
pub const DEFAULT_OUTPUT_FILENAME: &str = "graph.json";
