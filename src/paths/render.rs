//! Serializes a path tree to fixed-width text.

use crate::paths::tree::TreeNode;
use std::fmt::Write;

/// Marker appended to nodes carrying the target entity.
const TARGET_MARKER: &str = " [target]";

/// Render the tree with box-drawing connectors.
///
/// At every node, children are listed in ascending order of the minimum
/// number of hops from that child to a target-marked node in its own subtree,
/// so branches that reach the target fastest come first. Children whose
/// subtree never reaches a target sort last; equal keys keep insertion order.
pub fn render_tree(
    root: &TreeNode,
    source: &str,
    target: &str,
    selected: usize,
    total: usize,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Paths from {} to {}", source, target);
    let _ = writeln!(out, "(showing top {} of {} paths)", selected, total);
    out.push('\n');

    out.push_str(&root.uri);
    if root.is_target {
        out.push_str(TARGET_MARKER);
    }
    out.push('\n');

    render_children(root, "", &mut out);
    out
}

/// Minimum remaining hops from `node` to a target-marked node in its subtree;
/// `None` when the subtree contains no target.
fn min_depth_to_target(node: &TreeNode) -> Option<usize> {
    if node.is_target {
        return Some(0);
    }

    node.children
        .iter()
        .filter_map(|(_, child)| min_depth_to_target(child))
        .min()
        .map(|d| d + 1)
}

fn render_children(node: &TreeNode, prefix: &str, out: &mut String) {
    let mut ordered: Vec<&(String, TreeNode)> = node.children.iter().collect();
    ordered.sort_by_key(|(_, child)| min_depth_to_target(child).unwrap_or(usize::MAX));

    let last = ordered.len().saturating_sub(1);
    for (i, (relation, child)) in ordered.into_iter().enumerate() {
        let connector = if i == last { "└── " } else { "├── " };
        let marker = if child.is_target { TARGET_MARKER } else { "" };
        let _ = writeln!(out, "{}{}{} -> {}{}", prefix, connector, relation, child.uri, marker);

        let child_prefix = if i == last {
            format!("{}    ", prefix)
        } else {
            format!("{}│   ", prefix)
        };
        render_children(child, &child_prefix, out);
    }
}
