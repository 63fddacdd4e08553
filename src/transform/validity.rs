//! Validity filter: drop triples the serializer cannot or should not emit.
//!
//! A triple is removed when
//!
//! - its subject or object contains the embedded-document-context marker
//!   (`@context` by default), which only appears in terms produced by
//!   parsing JSON-LD fragments as IRIs; or
//! - its object is a custom-vocabulary term: either the triple itself is an
//!   `rdf:type` statement naming the custom vocabulary, or the object node
//!   is typed with a custom-vocabulary class.

use std::collections::HashSet;

use crate::config::PipelineConfig;
use crate::graph::{GraphStore, Iri, Node, RDF_TYPE, Triple};

use super::{PassKind, PassReport};

/// Markers the validity filter looks for.
#[derive(Debug, Clone)]
pub struct ValidityRules {
    pub context_marker: String,
    pub custom_vocab_marker: String,
}

impl ValidityRules {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            context_marker: config.context_marker.clone(),
            custom_vocab_marker: config.custom_vocab_marker.clone(),
        }
    }
}

impl Default for ValidityRules {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

/// Remove invalid triples. Running it again on its output removes nothing.
pub fn filter_invalid(graph: &mut GraphStore, rules: &ValidityRules) -> PassReport {
    let _span = tracing::info_span!("validity_filter").entered();
    let mut report = PassReport::new(PassKind::ValidityFilter, graph.size());
    let rdf_type = Iri::new(RDF_TYPE);

    let snapshot: Vec<Triple> = graph.query(None, None, None).collect();

    let custom_typed: HashSet<Node> = snapshot
        .iter()
        .filter(|t| t.predicate == rdf_type && t.object.mentions(&rules.custom_vocab_marker))
        .map(|t| t.subject.clone())
        .collect();

    let marked: Vec<Triple> = snapshot
        .into_iter()
        .filter(|t| {
            t.subject.mentions(&rules.context_marker)
                || t.object.mentions(&rules.context_marker)
                || (t.predicate == rdf_type && t.object.mentions(&rules.custom_vocab_marker))
                || t.object.as_node().is_some_and(|o| custom_typed.contains(&o))
        })
        .collect();

    for triple in marked {
        if graph.remove(&triple) {
            tracing::info!(
                subject = %triple.subject,
                predicate = %triple.predicate,
                object = %triple.object,
                "removing invalid triple"
            );
            report.removed.push(triple);
        }
    }

    report.after = graph.size();
    tracing::info!(
        removed = report.removed.len(),
        remaining = report.after,
        "validity filter done"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Literal, Term};

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    fn graph(triples: &[Triple]) -> GraphStore {
        let mut g = GraphStore::new("test");
        g.extend(triples.iter().cloned());
        g
    }

    #[test]
    fn removes_context_artifacts_in_subject_or_object() {
        let good = Triple::new(iri("http://x/1"), iri("http://p"), Literal::simple("ok"));
        let bad_s = Triple::new(iri("http://x/@context"), iri("http://p"), Literal::simple("v"));
        let bad_o = Triple::new(iri("http://x/1"), iri("http://q"), iri("http://x/@context/o"));
        let mut g = graph(&[good.clone(), bad_s.clone(), bad_o.clone()]);

        let report = filter_invalid(&mut g, &ValidityRules::default());

        assert_eq!(report.removed.len(), 2);
        assert!(g.contains(&good));
        assert!(!g.contains(&bad_s));
        assert!(!g.contains(&bad_o));
        assert!(report.check().is_ok());
    }

    #[test]
    fn removes_custom_vocab_type_and_references() {
        let cv = iri("https://example.org/api/custom_vocabs/customvocab-3");
        let typed = Triple::new(iri("http://x/term"), iri(RDF_TYPE), cv.clone());
        let reference = Triple::new(iri("http://x/item"), iri("http://p"), iri("http://x/term"));
        let label = Triple::new(iri("http://x/term"), iri("http://label"), Literal::simple("t"));
        let mut g = graph(&[typed.clone(), reference.clone(), label.clone()]);

        let report = filter_invalid(&mut g, &ValidityRules::default());

        assert!(report.removed.contains(&typed));
        assert!(report.removed.contains(&reference));
        assert!(g.contains(&label));
    }

    #[test]
    fn custom_vocab_datatype_literal_object() {
        let t = Triple::new(
            iri("http://x/1"),
            iri(RDF_TYPE),
            Term::Literal(Literal::typed("Fresco", iri("customvocab:12"))),
        );
        let mut g = graph(&[t.clone()]);
        filter_invalid(&mut g, &ValidityRules::default());
        assert!(g.is_empty());
    }

    #[test]
    fn idempotent() {
        let cv = iri("https://example.org/customvocab/3");
        let mut g = graph(&[
            Triple::new(iri("http://x/term"), iri(RDF_TYPE), cv),
            Triple::new(iri("http://x/item"), iri("http://p"), iri("http://x/term")),
            Triple::new(iri("http://x/@context"), iri("http://p"), Literal::simple("v")),
            Triple::new(iri("http://x/item"), iri("http://q"), Literal::simple("keep")),
        ]);
        let first = filter_invalid(&mut g, &ValidityRules::default());
        let size = g.size();
        let second = filter_invalid(&mut g, &ValidityRules::default());
        assert_eq!(first.removed.len(), 3);
        assert!(second.removed.is_empty());
        assert_eq!(g.size(), size);
    }

    #[test]
    fn markers_are_configurable() {
        let rules = ValidityRules {
            context_marker: "#ctx".into(),
            custom_vocab_marker: "vocab/private".into(),
        };
        let keep = Triple::new(iri("http://x/@context"), iri("http://p"), Literal::simple("v"));
        let drop = Triple::new(iri("http://x/a#ctx"), iri("http://p"), Literal::simple("v"));
        let mut g = graph(&[keep.clone(), drop]);
        filter_invalid(&mut g, &rules);
        assert_eq!(g.size(), 1);
        assert!(g.contains(&keep));
    }
}
