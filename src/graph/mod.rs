//! Triple graph: the in-memory data model every pass operates on.
//!
//! - [`Term`], [`Node`], [`Iri`], [`Literal`]: the RDF term model, with interned strings
//! - [`Triple`]: a structurally compared (subject, predicate, object) statement
//! - [`GraphStore`]: the mutable triple set with pattern queries
//! - [`NamespaceBindings`]: prefix bindings used when serializing
//!
//! Terms are fully resolved IRIs; symbolic `prefix:term` names only exist in
//! configuration and are resolved by [`crate::namespace::NamespaceRegistry`].

pub mod bindings;
pub mod store;

use std::fmt;
use std::sync::Arc;

pub use bindings::NamespaceBindings;
pub use store::{GraphStore, TripleMatches};

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// An interned IRI. Clones share the same allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Create an IRI from its string form (no validation; the codec validates on output).
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Self(iri.into())
    }

    /// The IRI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A subject-position term: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Iri(Iri),
    Blank(Arc<str>),
}

impl Node {
    /// Blank node with the given label (without the `_:` prefix).
    pub fn blank(label: impl Into<Arc<str>>) -> Self {
        Node::Blank(label.into())
    }

    /// Whether the textual form of this node contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        match self {
            Node::Iri(iri) => iri.as_str().contains(needle),
            Node::Blank(label) => label.contains(needle),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => iri.fmt(f),
            Node::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Iri(iri)
    }
}

/// How a literal's value is qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LiteralKind {
    /// Plain string (`xsd:string`).
    Simple,
    /// Typed with a datatype IRI.
    Typed(Iri),
    /// Language-tagged (`rdf:langString`).
    Lang(Arc<str>),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub value: Arc<str>,
    pub kind: LiteralKind,
}

impl Literal {
    pub fn simple(value: impl Into<Arc<str>>) -> Self {
        Self {
            value: value.into(),
            kind: LiteralKind::Simple,
        }
    }

    pub fn typed(value: impl Into<Arc<str>>, datatype: Iri) -> Self {
        Self {
            value: value.into(),
            kind: LiteralKind::Typed(datatype),
        }
    }

    pub fn lang(value: impl Into<Arc<str>>, language: impl Into<Arc<str>>) -> Self {
        Self {
            value: value.into(),
            kind: LiteralKind::Lang(language.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value.as_ref())?;
        match &self.kind {
            LiteralKind::Simple => Ok(()),
            LiteralKind::Typed(dt) => write!(f, "^^{dt}"),
            LiteralKind::Lang(lang) => write!(f, "@{lang}"),
        }
    }
}

/// Any RDF term: the object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Iri(Iri),
    Blank(Arc<str>),
    Literal(Literal),
}

impl Term {
    /// Whether the textual form of this term contains `needle`.
    ///
    /// For literals both the lexical value and the datatype IRI are searched,
    /// so a literal typed with a custom vocabulary datatype is found by the
    /// vocabulary's name.
    pub fn mentions(&self, needle: &str) -> bool {
        match self {
            Term::Iri(iri) => iri.as_str().contains(needle),
            Term::Blank(label) => label.contains(needle),
            Term::Literal(lit) => {
                lit.value.contains(needle)
                    || matches!(&lit.kind, LiteralKind::Typed(dt) if dt.as_str().contains(needle))
            }
        }
    }

    /// This term as a subject-position node, if it is not a literal.
    pub fn as_node(&self) -> Option<Node> {
        match self {
            Term::Iri(iri) => Some(Node::Iri(iri.clone())),
            Term::Blank(label) => Some(Node::Blank(label.clone())),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => iri.fmt(f),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal(lit) => lit.fmt(f),
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        match node {
            Node::Iri(iri) => Term::Iri(iri),
            Node::Blank(label) => Term::Blank(label),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// A (subject, predicate, object) statement. Compared and hashed structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<Node>, predicate: impl Into<Iri>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// The same statement under a different predicate.
    pub fn with_predicate(&self, predicate: Iri) -> Self {
        Self {
            subject: self.subject.clone(),
            predicate,
            object: self.object.clone(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
