//! "Dropped by" relationships: monster -> item.
//!
//! Every page carrying a `Drop JSON` property contributes one drop. The
//! property value is itself a JSON document naming the monster and the item.

use serde::Deserialize;
use tracing::{debug, warn};

use super::{type_tag, ApplySummary};
use crate::graph::Graph;
use crate::query::{AskQuery, AskResults};

/// Pages that have a drop record.
pub const SELECTIONS: &str = "[[Drop JSON::+]]";
/// Printout carrying the drop record.
pub const PRINTOUTS: &str = "?Drop JSON";

const DROP_JSON: &str = "Drop JSON";

#[derive(Debug, Default, Deserialize)]
struct DropRecord {
    #[serde(rename = "Dropped from", default)]
    dropped_from: Option<String>,
    #[serde(rename = "Dropped item", default)]
    dropped_item: Option<String>,
}

/// Query for every drop record.
pub fn query() -> AskQuery {
    AskQuery::new(SELECTIONS).with_printouts(PRINTOUTS)
}

/// Add one `monster -drop-> item` edge per usable drop record.
///
/// Only the first `Drop JSON` value of a page is read. Records that are not
/// valid JSON, or that lack either side of the drop, are skipped.
pub fn apply(results: &AskResults, graph: &mut Graph) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for (page, result) in results {
        let Some(raw) = result.printout(DROP_JSON).first().and_then(|v| v.as_str()) else {
            debug!(page = %page, "No drop record");
            summary.skipped += 1;
            continue;
        };

        let record: DropRecord = match serde_json::from_str(raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(page = %page, error = %e, "Unparseable drop record");
                summary.skipped += 1;
                continue;
            }
        };

        match (non_empty(record.dropped_from), non_empty(record.dropped_item)) {
            (Some(source), Some(target)) => {
                graph.add_tagged_node(source.as_str(), type_tag("monster"));
                graph.add_tagged_node(target.as_str(), type_tag("item"));
                graph.add_tagged_edge(source, target, type_tag("drop"));
                summary.applied += 1;
            }
            _ => {
                debug!(page = %page, "Incomplete drop record");
                summary.skipped += 1;
            }
        }
    }

    summary
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
