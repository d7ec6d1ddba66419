//! Reconstructs structured paths from raw binding rows.

use crate::paths::query::{intermediate_var, property_var};
use crate::paths::{Path, Step};
use crate::sparql::BindingRow;

/// Rebuild one `Path` per result row.
///
/// Each row carries a `?depth` binding plus, for every hop, a relation
/// binding and (for non-final hops) an intermediate entity binding; the final
/// hop always lands on the fixed target. Rows whose chain cannot be fully
/// reconstructed are dropped, not treated as an error for the batch. The same
/// goes for rows claiming a depth outside `1..=max_depth`: the enumeration
/// query never produces one, so such a row is endpoint garbage, not a path.
pub fn parse_paths(rows: &[BindingRow], source: &str, target: &str, max_depth: usize) -> Vec<Path> {
    let mut paths = Vec::with_capacity(rows.len());

    for row in rows {
        match parse_row(row, source, target, max_depth) {
            Some(path) => paths.push(path),
            None => log::debug!("Dropping result row with incomplete bindings: {:?}", row),
        }
    }

    paths
}

fn parse_row(row: &BindingRow, source: &str, target: &str, max_depth: usize) -> Option<Path> {
    let depth: usize = row.get("depth")?.value.parse().ok()?;
    if depth == 0 || depth > max_depth {
        return None;
    }

    let mut steps = Vec::with_capacity(depth);
    let mut current = source.to_string();

    for hop in 1..=depth {
        let property = row.get(&property_var(depth, hop))?.value.clone();
        let to = if hop == depth {
            target.to_string()
        } else {
            row.get(&intermediate_var(depth, hop))?.value.clone()
        };

        steps.push(Step {
            from: current,
            property,
            to: to.clone(),
        });
        current = to;
    }

    Some(Path {
        depth,
        steps,
        score: None,
    })
}
