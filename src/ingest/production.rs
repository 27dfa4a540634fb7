//! "Used in production" relationships: material -> item.

use tracing::warn;

use super::{type_tag, ApplySummary};
use crate::graph::Graph;
use crate::query::{AskQuery, AskResults};

/// Every item page.
pub const SELECTIONS: &str = "[[Category:Items]]";
/// Printouts listing an item's materials.
pub const PRINTOUTS: &str = "?Production JSON|?Uses material";

const USES_MATERIAL: &str = "Uses material";

/// Query for every item and the materials it is made from.
pub fn query() -> AskQuery {
    AskQuery::new(SELECTIONS).with_printouts(PRINTOUTS)
}

/// Add every item as a node and one `material -production-> item` edge per
/// material it uses.
///
/// Materials are not added as nodes here. A material that is not itself an
/// item page stays a dangling endpoint until the graph is cleaned.
pub fn apply(results: &AskResults, graph: &mut Graph) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for (name, result) in results {
        graph.add_tagged_node(name.as_str(), type_tag("item"));
        summary.applied += 1;

        for material in result.printout(USES_MATERIAL) {
            match material.get("fulltext").and_then(|v| v.as_str()) {
                Some(material) if !material.is_empty() => {
                    graph.add_tagged_edge(material, name.as_str(), type_tag("production"));
                }
                _ => {
                    warn!(item = %name, value = %material, "Material without a name");
                    summary.skipped += 1;
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::AskResult;
    use serde_json::json;

    fn item(materials: &[&str]) -> AskResult {
        let uses: Vec<_> = materials.iter().map(|m| json!({ "fulltext": m })).collect();
        AskResult {
            printouts: json!({ "Production JSON": [], "Uses material": uses }),
            fulltext: None,
        }
    }

    #[test]
    fn test_items_and_materials() {
        let results: AskResults = [
            ("Bronze bar".to_string(), item(&["Copper ore", "Tin ore"])),
            ("Copper ore".to_string(), item(&[])),
        ]
        .into_iter()
        .collect();
        let mut graph = Graph::new();

        let summary = apply(&results, &mut graph);

        assert_eq!(summary, ApplySummary { applied: 2, skipped: 0 });
        assert!(graph.contains_node("Bronze bar"));
        assert!(graph.contains_node("Copper ore"));
        assert!(!graph.contains_node("Tin ore"));
        assert!(graph.contains_edge("Copper ore", "Bronze bar"));
        assert!(graph.contains_edge("Tin ore", "Bronze bar"));
        assert_eq!(
            graph.edge_tags("Copper ore", "Bronze bar").get("type"),
            Some("production")
        );
        assert_eq!(graph.node_tags("Bronze bar").get("type"), Some("item"));

        let cleaned = graph.clean();
        assert_eq!(cleaned.num_nodes(), 2);
        assert_eq!(cleaned.num_edges(), 1);
    }

    #[test]
    fn test_material_without_name_is_skipped() {
        let results: AskResults = [(
            "Bronze bar".to_string(),
            AskResult {
                printouts: json!({ "Uses material": [{ "fullurl": "x" }, "Tin ore"] }),
                fulltext: None,
            },
        )]
        .into_iter()
        .collect();
        let mut graph = Graph::new();

        let summary = apply(&results, &mut graph);

        assert_eq!(summary, ApplySummary { applied: 1, skipped: 2 });
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn test_query_text() {
        assert_eq!(
            query().with_page_size(10).page_query(Some("Bronze bar")),
            "[[Category:Items]]|[[>>Bronze bar]]|?Production JSON|?Uses material|limit=10"
        );
    }
}
