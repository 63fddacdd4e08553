//! Predicate mapping and filtering.
//!
//! Mapping runs before filtering: a renamed triple is only removed if the
//! filter set names its *target* predicate. Each rename is applied once, so
//! chained rules (`a → b`, `b → c`) do not cascade within a run.

use crate::graph::{GraphStore, Triple};
use crate::rules::{FilterSet, MappingTable};

use super::{PassKind, PassReport};

/// Rename predicates per `mapping`, keeping subject and object.
///
/// Cardinality-neutral except when a renamed triple coincides with one
/// already present; such collisions are counted in
/// [`PassReport::collapsed`]. The pipeline treats any collision as fatal.
pub fn apply_mapping(graph: &mut GraphStore, mapping: &MappingTable) -> PassReport {
    let _span = tracing::info_span!("mapping").entered();
    let mut report = PassReport::new(PassKind::Mapping, graph.size());

    let affected: Vec<Triple> = mapping
        .iter()
        .flat_map(|(source, _)| graph.query(None, Some(source), None))
        .collect();

    for triple in &affected {
        graph.remove(triple);
    }

    for triple in affected {
        let Some(target) = mapping.get(&triple.predicate) else {
            continue;
        };
        let renamed = triple.with_predicate(target.clone());
        if graph.add(renamed.clone()) {
            report.added.push(renamed);
        } else {
            tracing::debug!(triple = %renamed, "renamed triple already present");
            report.collapsed += 1;
        }
        report.removed.push(triple);
    }

    report.after = graph.size();
    tracing::info!(
        renamed = report.removed.len(),
        collapsed = report.collapsed,
        "mapping done"
    );
    report
}

/// Remove every triple whose predicate is in `filter`.
pub fn apply_filter(graph: &mut GraphStore, filter: &FilterSet) -> PassReport {
    let _span = tracing::info_span!("filter").entered();
    let mut report = PassReport::new(PassKind::Filter, graph.size());

    let doomed: Vec<Triple> = filter
        .iter()
        .flat_map(|predicate| graph.query(None, Some(predicate), None))
        .collect();

    for triple in doomed {
        if graph.remove(&triple) {
            tracing::debug!(triple = %triple, "filtered");
            report.removed.push(triple);
        }
    }

    report.after = graph.size();
    tracing::info!(removed = report.removed.len(), "filter done");
    report
}
