//! URI prefix compression for rendered output.
//!
//! The reference design routed rendered text through a process-global
//! formatter; here the table is built once from config and passed explicitly
//! into the rendering path.

use std::collections::HashMap;

/// Well-known vocabularies always available for compression.
const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
];

/// Maps long IRI prefixes to short aliases for display.
///
/// Compression is purely cosmetic: it never changes tree structure, only the
/// text handed back to the caller.
#[derive(Debug, Clone)]
pub struct PrefixTable {
    /// (iri_prefix, alias) pairs, longest IRI prefix first so the most
    /// specific namespace wins when one is a prefix of another.
    entries: Vec<(String, String)>,
}

impl PrefixTable {
    /// Build a table from configured aliases merged over the built-in defaults.
    /// A configured alias overrides a default with the same name.
    pub fn new(configured: &HashMap<String, String>) -> Self {
        let mut by_alias: HashMap<String, String> = DEFAULT_PREFIXES
            .iter()
            .map(|(alias, iri)| (alias.to_string(), iri.to_string()))
            .collect();

        for (alias, iri) in configured {
            by_alias.insert(alias.clone(), iri.clone());
        }

        let mut entries: Vec<(String, String)> = by_alias
            .into_iter()
            .map(|(alias, iri)| (iri, alias))
            .collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self { entries }
    }

    /// Replace every occurrence of a known IRI prefix with its `alias:` form.
    pub fn compress(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (iri, alias) in &self.entries {
            if out.contains(iri.as_str()) {
                out = out.replace(iri.as_str(), &format!("{}:", alias));
            }
        }
        out
    }
}

impl Default for PrefixTable {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}
