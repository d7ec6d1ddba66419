//! Path exploration between two entities in the graph store.
//!
//! Pipeline: build one bounded-depth enumeration query, evaluate it against
//! the endpoint, parse rows into paths, rank them against the relevance
//! query, merge the winners into a prefix tree and render it.

pub mod parse;
pub mod query;
pub mod rank;
pub mod render;
pub mod tree;

pub use parse::parse_paths;
pub use query::build_path_query;
pub use rank::PathRanker;
pub use render::render_tree;
pub use tree::{build_tree, TreeNode};

use crate::embeddings::Embedder;
use crate::prefix::PrefixTable;
use crate::sparql::PatternEvaluator;

/// One directed hop along a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub from: String,
    pub property: String,
    pub to: String,
}

/// A relation-chain from source to target.
///
/// Invariants: `steps.len() == depth`; consecutive steps chain
/// (`steps[i].to == steps[i+1].from`); the chain starts at the source and
/// ends at the target. `score` is unset until ranking assigns a softmax
/// probability, and stays unset under the depth-only fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub depth: usize,
    pub steps: Vec<Step>,
    pub score: Option<f64>,
}

/// Explore relation paths between two entities and render the best ones.
///
/// All outcomes come back as user-facing text: endpoint failures as
/// `"Error finding paths: ..."`, an empty result set as a distinct
/// "no paths" message. Embedding failures never abort the exploration; they
/// only degrade ranking to depth order.
pub async fn explore(
    evaluator: &impl PatternEvaluator,
    embedder: &impl Embedder,
    prefixes: &PrefixTable,
    source: &str,
    target: &str,
    relevance_query: &str,
    top_n: usize,
    max_depth: usize,
) -> String {
    if max_depth == 0 {
        return "Error finding paths: max depth must be at least 1".to_string();
    }
    if top_n == 0 {
        return "Error finding paths: top N must be at least 1".to_string();
    }

    let query = build_path_query(source, target, max_depth);
    log::debug!("Path enumeration query:\n{}", query);

    let rows = match evaluator.evaluate(&query).await {
        Ok(rows) => rows,
        Err(e) => return format!("Error finding paths: {}", e),
    };

    let paths = parse_paths(&rows, source, target, max_depth);
    if paths.is_empty() {
        return format!("No paths found between: {} and {}", source, target);
    }

    let total = paths.len();
    let ranked = PathRanker::new(embedder)
        .rank(paths, relevance_query, top_n)
        .await;
    let selected = ranked.len();
    log::debug!("Ranked {} of {} discovered paths", selected, total);

    let root = build_tree(ranked, source, target);
    let text = render_tree(&root, source, target, selected, total);

    prefixes.compress(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::InstructionMode;
    use crate::error::{OntopathError, Result};
    use crate::sparql::{BindingRow, Term};

    const SRC: &str = "http://example.org/A";
    const TGT: &str = "http://example.org/D";

    /// Evaluator returning canned rows (or failing) regardless of the query.
    struct FakeEvaluator {
        rows: Vec<BindingRow>,
        fail: Option<String>,
    }

    impl PatternEvaluator for FakeEvaluator {
        async fn evaluate(&self, _query: &str) -> Result<Vec<BindingRow>> {
            match &self.fail {
                Some(msg) => Err(OntopathError::Sparql(msg.clone())),
                None => Ok(self.rows.clone()),
            }
        }
    }

    /// Embedder scoring every step text identically (or failing).
    struct FakeEmbedder {
        fail: bool,
    }

    impl Embedder for FakeEmbedder {
        async fn embed_batch(
            &self,
            texts: Vec<String>,
            _mode: InstructionMode,
        ) -> Result<Vec<Vec<f32>>> {
            if self.fail {
                return Err(OntopathError::Embedding("service down".to_string()));
            }
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn row(entries: &[(&str, &str)]) -> BindingRow {
        entries
            .iter()
            .map(|(var, value)| {
                let term = if *var == "depth" {
                    Term::literal(*value)
                } else {
                    Term::named(*value)
                };
                (var.to_string(), term)
            })
            .collect()
    }

    fn scenario_rows() -> Vec<BindingRow> {
        vec![
            row(&[("depth", "1"), ("p1_1", "http://example.org/p1")]),
            row(&[
                ("depth", "2"),
                ("p2_1", "http://example.org/p2"),
                ("mid2_1", "http://example.org/B"),
                ("p2_2", "http://example.org/p3"),
            ]),
            row(&[
                ("depth", "3"),
                ("p3_1", "http://example.org/p2"),
                ("mid3_1", "http://example.org/B"),
                ("p3_2", "http://example.org/p4"),
                ("mid3_2", "http://example.org/C"),
                ("p3_3", "http://example.org/p3"),
            ]),
        ]
    }

    fn prefixes() -> PrefixTable {
        let mut configured = std::collections::HashMap::new();
        configured.insert("ex".to_string(), "http://example.org/".to_string());
        PrefixTable::new(&configured)
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let evaluator = FakeEvaluator {
            rows: scenario_rows(),
            fail: None,
        };
        let embedder = FakeEmbedder { fail: false };

        let text = explore(&evaluator, &embedder, &prefixes(), SRC, TGT, "how", 2, 3).await;

        // At most 2 of the 3 paths were kept
        assert!(text.contains("(showing top 2 of 3 paths)"));
        // Depth bias favors p1 direct and the depth-2 p2 branch
        assert!(text.contains("ex:A"));
        assert!(text.contains("p1 -> ex:D [target]"));
        assert!(text.contains("p2 -> ex:B"));
        assert!(text.contains("p3 -> ex:D [target]"));
        // The depth-3 tail lost the ranking and is absent
        assert!(!text.contains("p4"));
    }

    #[tokio::test]
    async fn test_evaluator_failure_becomes_error_text() {
        let evaluator = FakeEvaluator {
            rows: Vec::new(),
            fail: Some("endpoint unreachable".to_string()),
        };
        let embedder = FakeEmbedder { fail: false };

        let text = explore(&evaluator, &embedder, &prefixes(), SRC, TGT, "how", 2, 3).await;

        assert!(text.starts_with("Error finding paths:"));
        assert!(text.contains("endpoint unreachable"));
    }

    #[tokio::test]
    async fn test_no_paths_message() {
        let evaluator = FakeEvaluator {
            rows: Vec::new(),
            fail: None,
        };
        let embedder = FakeEmbedder { fail: false };

        let text = explore(&evaluator, &embedder, &prefixes(), SRC, TGT, "how", 2, 3).await;

        assert_eq!(
            text,
            format!("No paths found between: {} and {}", SRC, TGT)
        );
    }

    #[tokio::test]
    async fn test_embedding_failure_still_renders_tree() {
        let evaluator = FakeEvaluator {
            rows: scenario_rows(),
            fail: None,
        };
        let embedder = FakeEmbedder { fail: true };

        let text = explore(&evaluator, &embedder, &prefixes(), SRC, TGT, "how", 2, 3).await;

        // Fallback keeps the two shallowest paths and rendering proceeds
        assert!(text.contains("(showing top 2 of 3 paths)"));
        assert!(text.contains("p1 -> ex:D [target]"));
    }

    #[tokio::test]
    async fn test_zero_max_depth_rejected() {
        let evaluator = FakeEvaluator {
            rows: Vec::new(),
            fail: None,
        };
        let embedder = FakeEmbedder { fail: false };

        let text = explore(&evaluator, &embedder, &prefixes(), SRC, TGT, "how", 2, 0).await;
        assert!(text.starts_with("Error finding paths:"));
    }

    #[tokio::test]
    async fn test_self_loop_root_marked_target() {
        let evaluator = FakeEvaluator {
            rows: vec![row(&[("depth", "1"), ("p1_1", "http://example.org/loop")])],
            fail: None,
        };
        let embedder = FakeEmbedder { fail: false };

        let text = explore(&evaluator, &embedder, &prefixes(), SRC, SRC, "how", 5, 1).await;

        let root_line = text.lines().nth(3).unwrap();
        assert_eq!(root_line, "ex:A [target]");
    }
}
