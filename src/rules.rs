//! Predicate rules: the mapping table, filter set, and enrichment table.
//!
//! Rules are loaded from key/value configuration pairs:
//!
//! | key                       | value          | effect                               |
//! |---------------------------|----------------|--------------------------------------|
//! | `MAP_<NS>_<TERM>`         | `<NS>.<TERM>`  | rename predicate                     |
//! | `FILTER...`               | `<NS>.<TERM>`  | remove triples with this predicate   |
//! | `ENRICH_<NS>_<TERM>`      | `<NS>.<TERM>`  | merge enrichment statements under it |
//!
//! A bad entry never fails the load: it is logged and reported in
//! [`RuleSet::skipped`].

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::ConfigError;
use crate::graph::Iri;
use crate::namespace::NamespaceRegistry;

const MAP_PREFIX: &str = "MAP_";
const FILTER_PREFIX: &str = "FILTER";
const ENRICH_PREFIX: &str = "ENRICH_";

/// Dublin Core → schema.org renames applied unless disabled.
const DEFAULT_MAPPING: &[((&str, &str), (&str, &str))] = &[
    (("DCTERMS", "title"), ("SDO", "name")),
    (("DCTERMS", "publisher"), ("SDO", "publisher")),
    (("DCTERMS", "identifier"), ("SDO", "identifier")),
    (("DCTERMS", "issued"), ("SDO", "dateIssued")),
    (("DCTERMS", "abstract"), ("SDO", "abstract")),
    (("DCTERMS", "creator"), ("SDO", "creator")),
    (("DCTERMS", "bibliographicCitation"), ("SDO", "citation")),
    (("DCTERMS", "created"), ("SDO", "dateCreated")),
    (("DCTERMS", "description"), ("SDO", "description")),
    (("DCTERMS", "isReferencedBy"), ("SDO", "subjectOf")),
    (("OWL", "sameAs"), ("SDO", "sameAs")),
];

/// Deterministic predicate → predicate function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: BTreeMap<Iri, Iri>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `source → target`, returning the target it replaced, if any.
    pub fn insert(&mut self, source: Iri, target: Iri) -> Option<Iri> {
        self.entries.insert(source, target)
    }

    pub fn get(&self, source: &Iri) -> Option<&Iri> {
        self.entries.get(source)
    }

    pub fn contains(&self, source: &Iri) -> bool {
        self.entries.contains_key(source)
    }

    /// Entries in source-IRI order.
    pub fn iter(&self) -> impl Iterator<Item = (&Iri, &Iri)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Iri, Iri)> for MappingTable {
    fn from_iter<I: IntoIterator<Item = (Iri, Iri)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Set of predicates whose triples are purged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    predicates: BTreeSet<Iri>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, predicate: Iri) -> bool {
        self.predicates.insert(predicate)
    }

    pub fn contains(&self, predicate: &Iri) -> bool {
        self.predicates.contains(predicate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Iri> {
        self.predicates.iter()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl FromIterator<Iri> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Iri>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}

/// A configuration entry that was not loaded, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// Every rule loaded from configuration. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub mapping: MappingTable,
    pub filter: FilterSet,
    pub enrichment: MappingTable,
    pub skipped: Vec<SkippedEntry>,
}

enum RuleKind {
    Map,
    Enrich,
    Filter,
}

impl RuleSet {
    /// Build rules from configuration pairs.
    ///
    /// Pairs are processed in key order, so when two keys resolve to the same
    /// source predicate the one sorting last wins. With `with_defaults` the
    /// built-in Dublin Core → schema.org table is registered first and can be
    /// overridden by explicit `MAP_*` entries.
    pub fn load<K, V>(
        pairs: impl IntoIterator<Item = (K, V)>,
        registry: &NamespaceRegistry,
        with_defaults: bool,
    ) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut rules = RuleSet::default();

        if with_defaults {
            for ((src_ns, src_term), (tgt_ns, tgt_term)) in DEFAULT_MAPPING {
                match (
                    registry.resolve(src_ns, src_term),
                    registry.resolve(tgt_ns, tgt_term),
                ) {
                    (Ok(src), Ok(tgt)) => {
                        rules.mapping.insert(src, tgt);
                    }
                    (Err(e), _) | (_, Err(e)) => {
                        tracing::warn!(error = %e, "skipping default mapping entry");
                    }
                }
            }
        }

        let mut sorted: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().trim().to_string()))
            .collect();
        sorted.sort();

        for (key, value) in sorted {
            let kind = if key.starts_with(MAP_PREFIX) {
                RuleKind::Map
            } else if key.starts_with(ENRICH_PREFIX) {
                RuleKind::Enrich
            } else if key.starts_with(FILTER_PREFIX) {
                RuleKind::Filter
            } else {
                continue;
            };

            if let Err(e) = rules.load_entry(kind, &key, &value, registry) {
                tracing::warn!(key = %key, value = %value, error = %e, "skipping configuration entry");
                let reason = match &e {
                    ConfigError::MalformedRule { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                rules.skipped.push(SkippedEntry { key, value, reason });
            }
        }

        tracing::info!(
            mappings = rules.mapping.len(),
            filters = rules.filter.len(),
            enrichments = rules.enrichment.len(),
            skipped = rules.skipped.len(),
            "loaded predicate rules"
        );
        rules
    }

    fn load_entry(
        &mut self,
        kind: RuleKind,
        key: &str,
        value: &str,
        registry: &NamespaceRegistry,
    ) -> Result<(), ConfigError> {
        let malformed = |reason: String| ConfigError::MalformedRule {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        let (tgt_ns, tgt_term) = split_qualified(value)
            .ok_or_else(|| malformed("value must have the shape <NAMESPACE>.<TERM>".into()))?;
        let target = registry
            .resolve(tgt_ns, tgt_term)
            .map_err(|e| malformed(e.to_string()))?;

        let table = match kind {
            RuleKind::Filter => {
                self.filter.insert(target);
                return Ok(());
            }
            RuleKind::Map => &mut self.mapping,
            RuleKind::Enrich => &mut self.enrichment,
        };

        let prefix = match kind {
            RuleKind::Map => MAP_PREFIX,
            _ => ENRICH_PREFIX,
        };
        let rest = &key[prefix.len()..];
        // Unknown namespaces fall back to the first underscore so the
        // resolver can name them in the skip reason.
        let (src_ns, src_term) = registry
            .split_key(rest)
            .or_else(|| rest.split_once('_'))
            .filter(|(ns, term)| !ns.is_empty() && !term.is_empty())
            .ok_or_else(|| malformed(format!("key must have the shape {prefix}<NAMESPACE>_<TERM>")))?;
        let source = registry
            .resolve(src_ns, src_term)
            .map_err(|e| malformed(e.to_string()))?;

        if let Some(previous) = table.insert(source.clone(), target.clone()) {
            if previous != target {
                tracing::warn!(
                    source = %source,
                    previous = %previous,
                    target = %target,
                    key,
                    "duplicate rule for predicate, last one wins"
                );
            }
        }
        Ok(())
    }
}

/// Split `NS.TERM` into exactly two non-empty parts.
pub fn split_qualified(value: &str) -> Option<(&str, &str)> {
    let (ns, term) = value.split_once('.')?;
    if ns.is_empty() || term.is_empty() || term.contains('.') {
        return None;
    }
    Some((ns, term))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    fn load(pairs: &[(&str, &str)]) -> RuleSet {
        RuleSet::load(pairs.iter().copied(), &NamespaceRegistry::builtin(), false)
    }

    #[test]
    fn map_entry_resolves_both_sides() {
        let rules = load(&[("MAP_DCTERMS_TITLE", "SDO.name")]);
        assert_eq!(
            rules.mapping.get(&iri("http://purl.org/dc/terms/title")),
            Some(&iri("https://schema.org/name"))
        );
        assert!(rules.skipped.is_empty());
    }

    #[test]
    fn filter_keys_match_by_prefix() {
        let rules = load(&[
            ("FILTER_1", "SDO.name"),
            ("FILTERED_ISSUED", "DCTERMS.issued"),
        ]);
        assert!(rules.filter.contains(&iri("https://schema.org/name")));
        assert!(rules.filter.contains(&iri("http://purl.org/dc/terms/issued")));
    }

    #[test]
    fn enrich_entry_builds_enrichment_table() {
        let rules = load(&[("ENRICH_OWL_SAMEAS", "SDO.sameAs")]);
        assert_eq!(
            rules.enrichment.get(&iri("http://www.w3.org/2002/07/owl#sameAs")),
            Some(&iri("https://schema.org/sameAs"))
        );
        assert!(rules.mapping.is_empty());
    }

    #[test]
    fn bad_entries_are_skipped_not_fatal() {
        let rules = load(&[
            ("MAP_DCTERMS_TITLE", "SDO.name"),
            ("MAP_DCTERMS_TITEL", "SDO.name"),
            ("MAP_NOPE_TITLE", "SDO.name"),
            ("MAP_DCTERMS", "SDO.name"),
            ("MAP_DCTERMS_CREATOR", "SDOcreator"),
            ("MAP_DCTERMS_CREATED", "SDO.date.created"),
            ("FILTER_X", "UNKNOWN.thing"),
            ("HOME", "/root"),
        ]);
        assert_eq!(rules.mapping.len(), 1);
        assert_eq!(rules.skipped.len(), 6);
        assert!(rules.skipped.iter().all(|s| s.key != "HOME"));
        assert!(rules.filter.is_empty());
    }

    #[test]
    fn last_registered_wins_in_key_order() {
        let rules = load(&[
            ("MAP_DCTERMS_title", "SDO.headline"),
            ("MAP_DCTERMS_TITLE", "SDO.name"),
        ]);
        // "MAP_DCTERMS_title" sorts after "MAP_DCTERMS_TITLE".
        assert_eq!(
            rules.mapping.get(&iri("http://purl.org/dc/terms/title")),
            Some(&iri("https://schema.org/headline"))
        );
    }

    #[test]
    fn defaults_can_be_overridden() {
        let rules = RuleSet::load(
            [("MAP_DCTERMS_TITLE", "SDO.headline")],
            &NamespaceRegistry::builtin(),
            true,
        );
        assert_eq!(rules.mapping.len(), DEFAULT_MAPPING.len());
        assert_eq!(
            rules.mapping.get(&iri("http://purl.org/dc/terms/title")),
            Some(&iri("https://schema.org/headline"))
        );
        assert_eq!(
            rules.mapping.get(&iri("http://www.w3.org/2002/07/owl#sameAs")),
            Some(&iri("https://schema.org/sameAs"))
        );
    }

    #[test]
    fn declared_namespace_with_underscore_is_a_valid_source() {
        let mut registry = NamespaceRegistry::builtin();
        registry.declare("MY_VOCAB", "https://example.org/vocab#").unwrap();
        let rules = RuleSet::load(
            [("MAP_MY_VOCAB_colour", "SDO.color"), ("ENRICH_MY_VOCAB_seen", "SDO.sameAs")],
            &registry,
            false,
        );
        assert!(rules.skipped.is_empty());
        assert_eq!(
            rules.mapping.get(&iri("https://example.org/vocab#colour")),
            Some(&iri("https://schema.org/color"))
        );
        assert!(rules.enrichment.contains(&iri("https://example.org/vocab#seen")));
    }

    #[test]
    fn split_qualified_requires_exactly_two_parts() {
        assert_eq!(split_qualified("SDO.name"), Some(("SDO", "name")));
        assert_eq!(split_qualified("SDO"), None);
        assert_eq!(split_qualified(".name"), None);
        assert_eq!(split_qualified("SDO."), None);
        assert_eq!(split_qualified("a.b.c"), None);
    }
}
