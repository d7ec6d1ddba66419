//! Builds the bounded-depth path enumeration query.
//!
//! One SPARQL query covers every hop count in `1..=max_depth`: each depth
//! contributes a UNION branch with exactly `depth` triple patterns chaining
//! source to target through anonymous intermediates. Variables are suffixed
//! with their branch depth so branches never share bindings.

use std::fmt::Write;

/// Build the combined enumeration query for all depths up to `max_depth`.
///
/// Results are deduplicated (`SELECT DISTINCT`) and ordered by ascending hop
/// count. No cycle filtering is applied; a path may revisit entities or edges.
pub fn build_path_query(source: &str, target: &str, max_depth: usize) -> String {
    let mut query = String::from("SELECT DISTINCT * WHERE {\n");

    for depth in 1..=max_depth {
        if depth > 1 {
            query.push_str("  UNION\n");
        }
        query.push_str("  {\n");

        for hop in 1..=depth {
            let subj = if hop == 1 {
                format!("<{}>", source)
            } else {
                format!("?mid{}_{}", depth, hop - 1)
            };
            let obj = if hop == depth {
                format!("<{}>", target)
            } else {
                format!("?mid{}_{}", depth, hop)
            };
            let _ = writeln!(query, "    {} ?p{}_{} {} .", subj, depth, hop, obj);
        }

        let _ = writeln!(query, "    BIND({} AS ?depth)", depth);
        query.push_str("  }\n");
    }

    query.push_str("}\nORDER BY ?depth\n");
    query
}

/// Name of the relation variable for hop `hop` of a depth-`depth` branch.
pub fn property_var(depth: usize, hop: usize) -> String {
    format!("p{}_{}", depth, hop)
}

/// Name of the intermediate-entity variable after hop `hop` of a
/// depth-`depth` branch. Only exists for `hop < depth`.
pub fn intermediate_var(depth: usize, hop: usize) -> String {
    format!("mid{}_{}", depth, hop)
}
