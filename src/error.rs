//! Rich diagnostic error types for the ETL pipeline.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so operators can tell
//! which stage failed and on what input without re-running the export.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for a pipeline run.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum EtlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Namespace(#[from] NamespaceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Enrichment(#[from] EnrichmentError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),
}

// ---------------------------------------------------------------------------
// Namespace errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum NamespaceError {
    #[error("unknown namespace \"{namespace}\"")]
    #[diagnostic(
        code(etl::namespace::unknown_namespace),
        help(
            "Built-in namespaces are RDF, RDFS, OWL, XSD, DCTERMS, DC, SKOS, FOAF and SDO (alias SCHEMA). \
             Declare additional ones with NAMESPACE_<NAME>=<iri>."
        )
    )]
    UnknownNamespace { namespace: String },

    #[error("term \"{term}\" is not defined in namespace {namespace}")]
    #[diagnostic(
        code(etl::namespace::unknown_term),
        help("Check the spelling of the term against the vocabulary's published term list.")
    )]
    UnknownTerm { namespace: String, term: String },

    #[error("namespace {namespace} has an invalid base IRI \"{iri}\"")]
    #[diagnostic(
        code(etl::namespace::invalid_iri),
        help("Namespace bases must be absolute IRIs, usually ending in '/' or '#'.")
    )]
    InvalidIri { namespace: String, iri: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid value for {key}: \"{value}\" ({message})")]
    #[diagnostic(
        code(etl::config::invalid_value),
        help("Fix the setting in the environment or in the --config file.")
    )]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },

    #[error("malformed rule {key}={value}: {reason}")]
    #[diagnostic(
        code(etl::config::malformed_rule),
        help(
            "Rules have the shape MAP_<NS>_<TERM>=<NS>.<TERM>, ENRICH_<NS>_<TERM>=<NS>.<TERM> \
             or FILTER...=<NS>.<TERM>."
        )
    )]
    MalformedRule {
        key: String,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {}", path.display())]
    #[diagnostic(
        code(etl::config::read),
        help("Check that the file passed with --config exists and is readable.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", path.display())]
    #[diagnostic(
        code(etl::config::parse),
        help("The config file must be a flat TOML table of KEY = value pairs.")
    )]
    Parse { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CodecError {
    #[error("unsupported RDF format \"{format}\"")]
    #[diagnostic(
        code(etl::codec::unsupported_format),
        help("Use a file extension (ttl, nt, nq, trig, rdf, n3) or a media type such as text/turtle.")
    )]
    UnsupportedFormat { format: String },

    #[error("failed to parse {format} document: {message}")]
    #[diagnostic(
        code(etl::codec::parse),
        help(
            "The input is not a valid serialized graph. The destination artifact has not been \
             overwritten; inspect the source pages for truncated or mixed content."
        )
    )]
    Parse { format: String, message: String },

    #[error("failed to serialize graph as {format}: {message}")]
    #[diagnostic(code(etl::codec::serialize))]
    Serialize { format: String, message: String },

    #[error("term cannot be represented in RDF: {term} ({message})")]
    #[diagnostic(
        code(etl::codec::invalid_term),
        help("The graph contains an IRI, blank node label or language tag the serializer rejects.")
    )]
    InvalidTerm { term: String, message: String },
}

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("transport error fetching {url}: {message}")]
    #[diagnostic(
        code(etl::fetch::transport),
        help("Check network connectivity, DNS and TLS certificates for the source host.")
    )]
    Transport { url: String, message: String },

    #[error("HTTP {status} fetching {url}")]
    #[diagnostic(code(etl::fetch::status))]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {message}")]
    #[diagnostic(code(etl::fetch::body))]
    Body { url: String, message: String },

    #[error("no data returned by {url}")]
    #[diagnostic(
        code(etl::fetch::no_data),
        help("The first page did not contain Turtle data. Check BASE_URI and that the API is public.")
    )]
    NoData { url: String },

    #[error("unexpected namespace context document from {url}: {message}")]
    #[diagnostic(code(etl::fetch::context))]
    Context { url: String, message: String },
}

// ---------------------------------------------------------------------------
// Enrichment errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EnrichmentError {
    #[error("enrichment unavailable for id {id} ({url}): {message}")]
    #[diagnostic(
        code(etl::enrich::unavailable),
        help("The lookup is skipped for this entity; the rest of the dataset is still processed.")
    )]
    Unavailable {
        id: String,
        url: String,
        message: String,
    },

    #[error("invalid identifier pattern \"{pattern}\": {message}")]
    #[diagnostic(
        code(etl::enrich::pattern),
        help("ENRICHMENT_ID_PATTERN must be a regular expression with an `id` group or one capture group.")
    )]
    InvalidPattern { pattern: String, message: String },
}

// ---------------------------------------------------------------------------
// Artifact errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ArtifactError {
    #[error("I/O error on {}: {source}", path.display())]
    #[diagnostic(
        code(etl::artifact::io),
        help(
            "A filesystem operation failed. Check that the target directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding \"{label}\"")]
    #[diagnostic(
        code(etl::artifact::encoding),
        help("Use a WHATWG encoding label such as utf-8, iso-8859-1 or windows-1252.")
    )]
    UnknownEncoding { label: String },

    #[error("graph text cannot be encoded as {label}")]
    #[diagnostic(
        code(etl::artifact::unencodable),
        help("The graph contains characters outside the target encoding; switch ENCODING to utf-8.")
    )]
    Unencodable { label: String },

    #[error("{} is not valid {label}", path.display())]
    #[diagnostic(code(etl::artifact::decode))]
    Decode { path: PathBuf, label: String },
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(
        "triple count mismatch after {pass}: {before} before, {after} after, \
         {added} added, {removed} removed"
    )]
    #[diagnostic(
        code(etl::pipeline::count_mismatch),
        help("This is a bug in the pass. The artifact was not written.")
    )]
    CountMismatch {
        pass: String,
        before: usize,
        after: usize,
        added: usize,
        removed: usize,
    },

    #[error("{pass} changed the triple count: {collapsed} of {renamed} renamed triples already existed under the target predicate")]
    #[diagnostic(
        code(etl::pipeline::not_neutral),
        help(
            "A subject carries the same value under both the source and the target \
             predicate of a mapping rule. Remove the duplicate from the source data or \
             change the MAP_* rule. The artifact was not written."
        )
    )]
    NotNeutral {
        pass: String,
        renamed: usize,
        added: usize,
        collapsed: usize,
    },
}

/// Convenience result type for pipeline operations.
pub type EtlResult<T> = std::result::Result<T, EtlError>;
