//! Prefix → namespace IRI bindings carried by a graph for serialization.

/// Ordered prefix bindings.
///
/// Binding a prefix replaces any earlier binding of the same prefix, and also
/// drops any other prefix bound to the same IRI, so each IRI is abbreviated by
/// exactly one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBindings {
    entries: Vec<(String, String)>,
}

impl NamespaceBindings {
    /// No bindings at all.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn bind(&mut self, prefix: &str, iri: &str) {
        self.entries.retain(|(p, i)| p != prefix && i != iri);
        self.entries.push((prefix.to_string(), iri.to_string()));
    }

    /// IRI bound to `prefix`, if any.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, i)| i.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NamespaceBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        for (prefix, iri) in [
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            ("xsd", "http://www.w3.org/2001/XMLSchema#"),
            ("owl", "http://www.w3.org/2002/07/owl#"),
            ("dcterms", "http://purl.org/dc/terms/"),
            ("schema", "https://schema.org/"),
        ] {
            bindings.bind(prefix, iri);
        }
        bindings
    }
}
