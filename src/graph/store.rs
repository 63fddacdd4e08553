//! Mutable triple set with subject and predicate indexes.
//!
//! The store has set semantics: adding a present triple and removing an
//! absent one are both no-ops. Queries return a [`TripleMatches`] iterator
//! over a snapshot taken at call time, so callers can collect the matches and
//! then mutate the store without disturbing the scan.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{Iri, NamespaceBindings, Node, Term, Triple};

/// A named, mutable set of triples.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    name: String,
    triples: HashSet<Triple>,
    by_subject: HashMap<Node, HashSet<Triple>>,
    by_predicate: HashMap<Iri, HashSet<Triple>>,
    namespaces: NamespaceBindings,
}

impl GraphStore {
    /// Create an empty graph with the given identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Graph identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert a triple. Returns `false` if it was already present.
    pub fn add(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.clone());
        self.triples.insert(triple)
    }

    /// Remove a triple. Returns `false` if it was not present.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        if !self.triples.remove(triple) {
            return false;
        }
        if let Some(set) = self.by_subject.get_mut(&triple.subject) {
            set.remove(triple);
            if set.is_empty() {
                self.by_subject.remove(&triple.subject);
            }
        }
        if let Some(set) = self.by_predicate.get_mut(&triple.predicate) {
            set.remove(triple);
            if set.is_empty() {
                self.by_predicate.remove(&triple.predicate);
            }
        }
        true
    }

    /// Insert every triple, returning how many were new.
    pub fn extend(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        triples.into_iter().filter(|t| self.add(t.clone())).count()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Triples matching the given pattern; `None` leaves a position unconstrained.
    ///
    /// The result is a snapshot: later mutations of the store are not visible
    /// through it.
    pub fn query(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> TripleMatches {
        let candidates: Box<dyn Iterator<Item = &Triple> + '_> = match (subject, predicate) {
            (Some(s), Some(p)) => {
                // Scan whichever index bucket is smaller.
                let by_s = self.by_subject.get(s).map_or(0, HashSet::len);
                let by_p = self.by_predicate.get(p).map_or(0, HashSet::len);
                if by_s <= by_p {
                    Box::new(self.by_subject.get(s).into_iter().flatten())
                } else {
                    Box::new(self.by_predicate.get(p).into_iter().flatten())
                }
            }
            (Some(s), None) => Box::new(self.by_subject.get(s).into_iter().flatten()),
            (None, Some(p)) => Box::new(self.by_predicate.get(p).into_iter().flatten()),
            (None, None) => Box::new(self.triples.iter()),
        };

        let mut snapshot: Vec<Triple> = candidates
            .filter(|t| subject.is_none_or(|s| &t.subject == s))
            .filter(|t| predicate.is_none_or(|p| &t.predicate == p))
            .filter(|t| object.is_none_or(|o| &t.object == o))
            .cloned()
            .collect();
        snapshot.sort_unstable();

        TripleMatches {
            snapshot: snapshot.into(),
            pos: 0,
        }
    }

    /// Objects of every `(subject, predicate, ?)` triple.
    pub fn objects(&self, subject: &Node, predicate: &Iri) -> Vec<Term> {
        self.query(Some(subject), Some(predicate), None)
            .map(|t| t.object)
            .collect()
    }

    /// Number of triples.
    pub fn size(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Unordered iteration over the live triple set.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn namespaces(&self) -> &NamespaceBindings {
        &self.namespaces
    }

    /// Bind `prefix` to `iri` for serialization. Later bindings override earlier ones.
    pub fn bind(&mut self, prefix: &str, iri: &str) {
        self.namespaces.bind(prefix, iri);
    }
}

/// Snapshot of the triples matching a query, in a stable order.
///
/// Cloning yields an independent cursor over the same snapshot, so the
/// sequence can be restarted without re-querying.
#[derive(Debug, Clone)]
pub struct TripleMatches {
    snapshot: Arc<[Triple]>,
    pos: usize,
}

impl TripleMatches {
    /// Rewind to the start of the snapshot.
    pub fn restart(&mut self) {
        self.pos = 0;
    }
}

impl Iterator for TripleMatches {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        let triple = self.snapshot.get(self.pos)?.clone();
        self.pos += 1;
        Some(triple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.snapshot.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TripleMatches {}
