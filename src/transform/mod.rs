//! Transformation passes over a [`GraphStore`](crate::graph::GraphStore).
//!
//! Every pass follows the same two-step discipline: materialize the affected
//! triples from a snapshot, then apply removals and additions. Each returns a
//! [`PassReport`] that accounts for its change in triple count.

pub mod enrich;
pub mod remap;
pub mod validity;

use std::fmt;

use serde::Serialize;

use crate::error::PipelineError;
use crate::graph::Triple;

pub use enrich::{EnrichmentProvider, EnrichmentRules, HttpEnrichment, merge_enrichment};
pub use remap::{apply_filter, apply_mapping};
pub use validity::{ValidityRules, filter_invalid};

/// Which pass produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    ValidityFilter,
    Enrichment,
    Mapping,
    Filter,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::ValidityFilter => write!(f, "validity filter"),
            PassKind::Enrichment => write!(f, "enrichment merge"),
            PassKind::Mapping => write!(f, "mapping"),
            PassKind::Filter => write!(f, "filter"),
        }
    }
}

/// A per-entity problem a pass recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassFailure {
    /// What the pass was working on (an entity IRI, an identifier).
    pub subject: String,
    pub message: String,
}

/// What a pass did to the graph.
#[derive(Debug, Clone)]
pub struct PassReport {
    pub pass: PassKind,
    /// Triple count when the pass started.
    pub before: usize,
    /// Triple count when the pass finished.
    pub after: usize,
    /// Triples the pass removed.
    pub removed: Vec<Triple>,
    /// Triples the pass inserted that were not already present.
    pub added: Vec<Triple>,
    /// Rewritten triples that coincided with an existing triple.
    pub collapsed: usize,
    pub failures: Vec<PassFailure>,
}

impl PassReport {
    pub(crate) fn new(pass: PassKind, before: usize) -> Self {
        Self {
            pass,
            before,
            after: before,
            removed: Vec::new(),
            added: Vec::new(),
            collapsed: 0,
            failures: Vec::new(),
        }
    }

    /// Verify `before + added == after + removed`.
    pub fn check(&self) -> Result<(), PipelineError> {
        if self.before + self.added.len() == self.after + self.removed.len() {
            return Ok(());
        }
        Err(PipelineError::CountMismatch {
            pass: self.pass.to_string(),
            before: self.before,
            after: self.after,
            added: self.added.len(),
            removed: self.removed.len(),
        })
    }

    /// Compact, serializable form of this report.
    pub fn summary(&self) -> PassSummary {
        PassSummary {
            pass: self.pass,
            before: self.before,
            after: self.after,
            removed: self.removed.len(),
            added: self.added.len(),
            collapsed: self.collapsed,
            failures: self.failures.clone(),
        }
    }
}

/// Counts-only view of a [`PassReport`].
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub pass: PassKind,
    pub before: usize,
    pub after: usize,
    pub removed: usize,
    pub added: usize,
    pub collapsed: usize,
    pub failures: Vec<PassFailure>,
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<17} {:>8} -> {:<8} (-{} +{}",
            self.pass.to_string(),
            self.before,
            self.after,
            self.removed,
            self.added
        )?;
        if self.collapsed > 0 {
            write!(f, ", {} collapsed", self.collapsed)?;
        }
        if !self.failures.is_empty() {
            write!(f, ", {} failed", self.failures.len())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Iri, Literal};

    #[test]
    fn check_detects_unexplained_delta() {
        let mut report = PassReport::new(PassKind::Filter, 10);
        report.removed.push(Triple::new(Iri::new("s"), "p", Literal::simple("o")));
        report.after = 9;
        assert!(report.check().is_ok());
        report.after = 8;
        assert!(matches!(
            report.check(),
            Err(PipelineError::CountMismatch { before: 10, after: 8, .. })
        ));
    }

    #[test]
    fn summary_display() {
        let mut report = PassReport::new(PassKind::Mapping, 5);
        report.collapsed = 1;
        let line = report.summary().to_string();
        assert!(line.starts_with("mapping"));
        assert!(line.contains("1 collapsed"));
    }
}
