//! RDF codec boundary backed by oxigraph's parsers and serializers.
//!
//! Only this module touches oxigraph model types; the rest of the crate works
//! with [`crate::graph`] terms. Quads are flattened into a single graph on
//! parse, and written into the graph named by the store's identifier when the
//! output format supports datasets and the identifier is an absolute IRI.

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model as ox;

use crate::error::CodecError;
use crate::graph::{GraphStore, Iri, Literal, LiteralKind, Node, Term, Triple};

/// Result type for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Resolve a format name: an extension (`ttl`), a media type (`text/turtle`),
/// or one of the common long names (`turtle`, `ntriples`, `xml`).
pub fn format_for(name: &str) -> CodecResult<RdfFormat> {
    let lower = name.trim().to_ascii_lowercase();
    let alias = match lower.as_str() {
        "turtle" => "ttl",
        "ntriples" | "n-triples" => "nt",
        "nquads" | "n-quads" => "nq",
        "xml" | "rdfxml" | "rdf/xml" | "pretty-xml" => "rdf",
        other => other,
    };
    RdfFormat::from_extension(alias)
        .or_else(|| RdfFormat::from_media_type(alias))
        .ok_or_else(|| CodecError::UnsupportedFormat {
            format: name.to_string(),
        })
}

/// Parse a serialized graph. Named graphs are merged into one triple list.
pub fn parse(bytes: &[u8], format: RdfFormat, base_iri: Option<&str>) -> CodecResult<Vec<Triple>> {
    parse_with(bytes, format, base_iri, false)
}

/// Parse a document fetched from elsewhere. Blank nodes get fresh labels so
/// they cannot collide with blank nodes already in the main graph.
pub fn parse_fragment(bytes: &[u8], format: RdfFormat, base_iri: Option<&str>) -> CodecResult<Vec<Triple>> {
    parse_with(bytes, format, base_iri, true)
}

fn parse_with(
    bytes: &[u8],
    format: RdfFormat,
    base_iri: Option<&str>,
    rename_blank_nodes: bool,
) -> CodecResult<Vec<Triple>> {
    let parse_error = |message: String| CodecError::Parse {
        format: format.name().to_string(),
        message,
    };

    let mut parser = RdfParser::from_format(format);
    if let Some(base) = base_iri {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| parse_error(format!("invalid base IRI {base}: {e}")))?;
    }
    if rename_blank_nodes {
        parser = parser.rename_blank_nodes();
    }

    let mut triples = Vec::new();
    for quad in parser.for_reader(bytes) {
        let quad = quad.map_err(|e| parse_error(e.to_string()))?;
        let subject = match term_from_ox(ox::Term::from(quad.subject))? {
            Term::Iri(iri) => Node::Iri(iri),
            Term::Blank(label) => Node::Blank(label),
            Term::Literal(lit) => {
                return Err(parse_error(format!("literal in subject position: {lit}")));
            }
        };
        let predicate = Iri::new(quad.predicate.into_string());
        let object = term_from_ox(quad.object)?;
        triples.push(Triple {
            subject,
            predicate,
            object,
        });
    }
    Ok(triples)
}

fn term_from_ox(term: ox::Term) -> CodecResult<Term> {
    match term {
        ox::Term::NamedNode(node) => Ok(Term::Iri(Iri::new(node.into_string()))),
        ox::Term::BlankNode(node) => Ok(Term::Blank(node.as_str().into())),
        ox::Term::Literal(lit) => {
            let kind = if let Some(lang) = lit.language() {
                LiteralKind::Lang(lang.into())
            } else if lit.datatype().as_str() == XSD_STRING {
                LiteralKind::Simple
            } else {
                LiteralKind::Typed(Iri::new(lit.datatype().as_str()))
            };
            Ok(Term::Literal(Literal {
                value: lit.value().into(),
                kind,
            }))
        }
        #[allow(unreachable_patterns)]
        other => Err(CodecError::InvalidTerm {
            term: other.to_string(),
            message: "nested triple terms are not supported".into(),
        }),
    }
}

fn named_node(iri: &Iri) -> CodecResult<ox::NamedNode> {
    ox::NamedNode::new(iri.as_str()).map_err(|e| CodecError::InvalidTerm {
        term: iri.to_string(),
        message: e.to_string(),
    })
}

fn blank_node(label: &str) -> CodecResult<ox::BlankNode> {
    ox::BlankNode::new(label).map_err(|e| CodecError::InvalidTerm {
        term: format!("_:{label}"),
        message: e.to_string(),
    })
}

fn term_to_ox(term: &Term) -> CodecResult<ox::Term> {
    Ok(match term {
        Term::Iri(iri) => named_node(iri)?.into(),
        Term::Blank(label) => blank_node(label)?.into(),
        Term::Literal(lit) => match &lit.kind {
            LiteralKind::Simple => ox::Literal::new_simple_literal(lit.value.as_ref()).into(),
            LiteralKind::Typed(dt) if dt.as_str() == RDF_LANG_STRING => {
                return Err(CodecError::InvalidTerm {
                    term: lit.to_string(),
                    message: "rdf:langString literal without a language tag".into(),
                });
            }
            LiteralKind::Typed(dt) => {
                ox::Literal::new_typed_literal(lit.value.as_ref(), named_node(dt)?).into()
            }
            LiteralKind::Lang(lang) => {
                ox::Literal::new_language_tagged_literal(lit.value.as_ref(), lang.as_ref())
                    .map_err(|e| CodecError::InvalidTerm {
                        term: lit.to_string(),
                        message: e.to_string(),
                    })?
                    .into()
            }
        },
    })
}

fn triple_to_ox(triple: &Triple) -> CodecResult<ox::Triple> {
    let predicate = named_node(&triple.predicate)?;
    let object = term_to_ox(&triple.object)?;
    Ok(match &triple.subject {
        Node::Iri(iri) => ox::Triple::new(named_node(iri)?, predicate, object),
        Node::Blank(label) => ox::Triple::new(blank_node(label)?, predicate, object),
    })
}

/// Serialize the graph with its namespace bindings. Output is UTF-8 and
/// triples are written in sorted order so repeated runs produce stable files.
pub fn serialize(graph: &GraphStore, format: RdfFormat) -> CodecResult<Vec<u8>> {
    let serialize_error = |message: String| CodecError::Serialize {
        format: format.name().to_string(),
        message,
    };

    let mut serializer = RdfSerializer::from_format(format);
    for (prefix, iri) in graph.namespaces().iter() {
        if !is_prefix_name(prefix) || ox::NamedNode::new(iri).is_err() {
            tracing::debug!(prefix, iri, "skipping unusable namespace binding");
            continue;
        }
        serializer = serializer
            .with_prefix(prefix, iri)
            .map_err(|e| serialize_error(format!("prefix {prefix}: {e}")))?;
    }

    let graph_name = if format.supports_datasets() {
        match ox::NamedNode::new(graph.name()) {
            Ok(name) => ox::GraphName::NamedNode(name),
            Err(_) => ox::GraphName::DefaultGraph,
        }
    } else {
        ox::GraphName::DefaultGraph
    };

    let mut triples: Vec<&Triple> = graph.iter().collect();
    triples.sort_unstable();

    let mut writer = serializer.for_writer(Vec::new());
    for triple in triples {
        let quad = triple_to_ox(triple)?.in_graph(graph_name.clone());
        writer
            .serialize_quad(&quad)
            .map_err(|e| serialize_error(e.to_string()))?;
    }
    writer.finish().map_err(|e| serialize_error(e.to_string()))
}

/// Whether `prefix` is a valid Turtle `PN_PREFIX` (or empty).
fn is_prefix_name(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    first.is_alphabetic()
        && !prefix.ends_with('.')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
