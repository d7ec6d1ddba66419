//! Merges ranked paths into a shared prefix tree rooted at the source entity.

use crate::paths::{Path, Step};

/// One node of the rendered path tree.
///
/// Children are keyed by relation id. A `Vec` of keyed edges (rather than a
/// map) keeps insertion order, which the renderer relies on for deterministic
/// tie-breaking. Keys are unique by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub uri: String,
    pub children: Vec<(String, TreeNode)>,
    pub is_target: bool,
}

impl TreeNode {
    fn new(uri: String, is_target: bool) -> Self {
        Self {
            uri,
            children: Vec::new(),
            is_target,
        }
    }

    /// Look up a child by its relation key.
    pub fn child(&self, relation: &str) -> Option<&TreeNode> {
        self.children
            .iter()
            .find(|(rel, _)| rel == relation)
            .map(|(_, node)| node)
    }
}

/// Merge `paths` into a prefix tree rooted at `source`.
///
/// Paths sharing a relation-labeled prefix collapse into one branch. Paths
/// are inserted shortest first; when a later path reaches an existing node
/// via the same relation key, the node created first keeps its `is_target`
/// flag permanently, even if the later path disagrees.
pub fn build_tree(mut paths: Vec<Path>, source: &str, target: &str) -> TreeNode {
    let mut root = TreeNode::new(source.to_string(), source == target);

    // Stable: equal-depth paths keep their ranked order
    paths.sort_by_key(|path| path.depth);

    for path in &paths {
        insert_steps(&mut root, &path.steps, target);
    }

    root
}

fn insert_steps(node: &mut TreeNode, steps: &[Step], target: &str) {
    let Some((step, rest)) = steps.split_first() else {
        return;
    };

    let idx = match node
        .children
        .iter()
        .position(|(rel, _)| rel == &step.property)
    {
        Some(idx) => idx,
        None => {
            node.children.push((
                step.property.clone(),
                TreeNode::new(step.to.clone(), step.to == target),
            ));
            node.children.len() - 1
        }
    };

    insert_steps(&mut node.children[idx].1, rest, target);
}
