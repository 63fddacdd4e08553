//! Namespace registry: resolves `(namespace, term)` pairs to full IRIs.
//!
//! The registry is a finite table of vocabularies validated up front. Closed
//! vocabularies (Dublin Core, OWL, RDF, ...) only resolve their defined
//! terms; open ones (schema.org, user-declared namespaces) accept any valid
//! local name. Namespace names are matched case-insensitively, and closed
//! terms resolve to their canonical spelling, so upper-case environment keys
//! like `MAP_DCTERMS_ISREFERENCEDBY` still find `dcterms:isReferencedBy`.

pub mod vocab;

use crate::error::NamespaceError;
use crate::graph::Iri;

use vocab::BUILTINS;

/// Result type for namespace resolution.
pub type NamespaceResult<T> = std::result::Result<T, NamespaceError>;

/// A vocabulary entry in the registry.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    name: String,
    aliases: Vec<String>,
    prefix: String,
    base: String,
    terms: Option<&'static [&'static str]>,
}

impl Vocabulary {
    /// Canonical namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serialization prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether only defined terms resolve.
    pub fn is_closed(&self) -> bool {
        self.terms.is_some()
    }

    fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    fn local_name<'a>(&self, term: &'a str) -> Option<&'a str> {
        match self.terms {
            Some(terms) => terms
                .iter()
                .find(|t| **t == term)
                .or_else(|| terms.iter().find(|t| t.eq_ignore_ascii_case(term)))
                .copied(),
            None => is_local_name(term).then_some(term),
        }
    }
}

/// Registry of every vocabulary configuration may refer to.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    vocabularies: Vec<Vocabulary>,
}

impl NamespaceRegistry {
    /// Registry with only the built-in vocabularies.
    pub fn builtin() -> Self {
        let vocabularies = BUILTINS
            .iter()
            .map(|v| Vocabulary {
                name: v.name.to_string(),
                aliases: v.aliases.iter().map(|a| a.to_string()).collect(),
                prefix: v.prefix.to_string(),
                base: v.base.to_string(),
                terms: v.terms,
            })
            .collect();
        Self { vocabularies }
    }

    /// Declare an open namespace. Replaces any existing namespace of the same name.
    pub fn declare(&mut self, name: &str, base: &str) -> NamespaceResult<()> {
        if !(base.starts_with("http://") || base.starts_with("https://") || base.starts_with("urn:")) {
            return Err(NamespaceError::InvalidIri {
                namespace: name.to_string(),
                iri: base.to_string(),
            });
        }
        self.vocabularies.retain(|v| !v.answers_to(name));
        self.vocabularies.push(Vocabulary {
            name: name.to_ascii_uppercase(),
            aliases: Vec::new(),
            prefix: name.to_ascii_lowercase(),
            base: base.to_string(),
            terms: None,
        });
        Ok(())
    }

    /// Look up a vocabulary by name or alias.
    pub fn vocabulary(&self, name: &str) -> Option<&Vocabulary> {
        self.vocabularies.iter().find(|v| v.answers_to(name))
    }

    /// Resolve `namespace` + `term` to a full IRI.
    pub fn resolve(&self, namespace: &str, term: &str) -> NamespaceResult<Iri> {
        let vocab = self
            .vocabulary(namespace)
            .ok_or_else(|| NamespaceError::UnknownNamespace {
                namespace: namespace.to_string(),
            })?;
        let local = vocab
            .local_name(term)
            .ok_or_else(|| NamespaceError::UnknownTerm {
                namespace: vocab.name.clone(),
                term: term.to_string(),
            })?;
        Ok(Iri::new(format!("{}{local}", vocab.base)))
    }

    /// Split `<NAMESPACE>_<TERM>` at the longest known namespace name or alias.
    ///
    /// Declared names may themselves contain underscores (`MY_VOCAB_title`),
    /// so the first underscore is not a reliable separator.
    pub fn split_key<'a>(&self, key: &'a str) -> Option<(&'a str, &'a str)> {
        self.vocabularies
            .iter()
            .flat_map(|v| std::iter::once(v.name.as_str()).chain(v.aliases.iter().map(String::as_str)))
            .filter_map(|name| {
                let head = key.get(..name.len())?;
                let term = key.get(name.len()..)?.strip_prefix('_')?;
                (head.eq_ignore_ascii_case(name) && !term.is_empty()).then_some((head, term))
            })
            .max_by_key(|(head, _)| head.len())
    }

    /// All vocabularies, built-in first.
    pub fn iter(&self) -> impl Iterator<Item = &Vocabulary> {
        self.vocabularies.iter()
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Whether `term` is usable as a local name (a conservative subset of PN_LOCAL).
fn is_local_name(term: &str) -> bool {
    let mut chars = term.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
