//! Ingestion targets.
//!
//! A [`Target`] names one kind of relationship pulled from the wiki. Each
//! target knows the query that fetches its records and an adapter that turns
//! those records into [`Graph`] mutations. Adapters are plain functions over
//! already-fetched results so they can be exercised without a network.

pub mod drops;
pub mod production;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::graph::Graph;
use crate::query::{paginated_ask, AskQuery, AskResults, QueryError, QueryService};
use crate::types::Tags;

/// Tag key used by every adapter to carry an entity's kind.
pub const TYPE_TAG: &str = "type";

pub(crate) fn type_tag(value: &str) -> Tags {
    Tags::from([(TYPE_TAG, value)])
}

/// Error type for ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Fetching a target's records failed.
    #[error("failed to fetch {target} records: {source}")]
    Fetch {
        /// Target being fetched.
        target: Target,
        /// Underlying query failure.
        #[source]
        source: QueryError,
    },
    /// A target name did not match any known target.
    #[error("unknown target: {0}")]
    UnknownTarget(String),
}

/// Outcome of applying one batch of results to a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    /// Result rows that produced at least one mutation.
    pub applied: usize,
    /// Result rows or printout values that were ignored.
    pub skipped: usize,
}

/// A named source of relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Monster -> item "dropped by" relationships.
    Drops,
    /// Material -> item "used in production" relationships.
    Production,
}

impl Target {
    /// Every target, in the order `all` expands to.
    pub const ALL: [Target; 2] = [Target::Drops, Target::Production];

    /// Lowercase name of the target.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drops => "drops",
            Self::Production => "production",
        }
    }

    /// Paginated query fetching this target's records.
    pub fn query(&self, page_size: usize) -> AskQuery {
        match self {
            Self::Drops => drops::query(),
            Self::Production => production::query(),
        }
        .with_page_size(page_size)
    }

    /// Apply fetched records to `graph`.
    pub fn apply(&self, results: &AskResults, graph: &mut Graph) -> ApplySummary {
        match self {
            Self::Drops => drops::apply(results, graph),
            Self::Production => production::apply(results, graph),
        }
    }

    /// Fetch this target's records from `service` and apply them to `graph`.
    pub async fn ingest<S: QueryService + ?Sized>(
        &self,
        service: &S,
        graph: &mut Graph,
        page_size: usize,
    ) -> Result<ApplySummary, IngestError> {
        let results = paginated_ask(service, &self.query(page_size))
            .await
            .map_err(|source| IngestError::Fetch {
                target: *self,
                source,
            })?;

        let summary = self.apply(&results, graph);
        info!(
            target_name = self.name(),
            records = results.len(),
            applied = summary.applied,
            skipped = summary.skipped,
            "Ingested target"
        );
        Ok(summary)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drops" => Ok(Self::Drops),
            "production" => Ok(Self::Production),
            _ => Err(IngestError::UnknownTarget(s.to_string())),
        }
    }
}

/// A target named on the command line: one target, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetSelection {
    /// Every known target.
    All,
    /// A single target.
    Only(Target),
}

impl FromStr for TargetSelection {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Expand selections into the targets to ingest.
///
/// No selection, or any `All`, means every target. Otherwise targets keep the
/// order they were first named in, without repeats.
pub fn resolve_targets(selections: &[TargetSelection]) -> Vec<Target> {
    if selections.is_empty() || selections.contains(&TargetSelection::All) {
        return Target::ALL.to_vec();
    }

    let mut targets = Vec::with_capacity(selections.len());
    for selection in selections {
        if let TargetSelection::Only(target) = selection {
            if !targets.contains(target) {
                targets.push(*target);
            }
        }
    }
    targets
}

/// Build one graph from every selected target.
///
/// The first retrieval failure aborts the build.
pub async fn build<S: QueryService + ?Sized>(
    service: &S,
    selections: &[TargetSelection],
    page_size: usize,
) -> Result<Graph, IngestError> {
    let mut graph = Graph::new();
    for target in resolve_targets(selections) {
        target.ingest(service, &mut graph, page_size).await?;
    }
    Ok(graph)
}
