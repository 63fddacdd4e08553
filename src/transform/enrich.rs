//! Enrichment merge: pull statements about monuments from an external
//! linked-data service and attach them to the matching entities.
//!
//! An entity qualifies when one of its triples has an object mentioning the
//! trigger (e.g. a link to a monument register) and it carries an identifier
//! literal such as `RM 512345`. The numeric part is looked up with the
//! [`EnrichmentProvider`]; fragment statements whose predicate appears in the
//! enrichment table are re-attached to the entity under the table's target
//! predicate. Lookup and parse failures are recorded per entity and never
//! abort the pass.

use std::collections::BTreeSet;

use oxigraph::io::RdfFormat;
use regex::Regex;

use crate::codec;
use crate::config::{EnrichmentConfig, PipelineConfig};
use crate::error::{ConfigError, EnrichmentError, EtlResult};
use crate::graph::{GraphStore, Iri, Node, Term, Triple};
use crate::namespace::NamespaceRegistry;
use crate::rules::{MappingTable, split_qualified};

use super::{PassFailure, PassKind, PassReport};

/// Result type for enrichment lookups.
pub type EnrichmentResult<T> = std::result::Result<T, EnrichmentError>;

/// Per-entity external data source.
pub trait EnrichmentProvider {
    /// Fetch the serialized graph fragment describing `id`.
    fn lookup(&self, id: &str) -> EnrichmentResult<String>;

    /// Serialization of the fragments this provider returns.
    fn format(&self) -> RdfFormat {
        RdfFormat::Turtle
    }
}

/// Resolved settings for the enrichment pass.
#[derive(Debug, Clone)]
pub struct EnrichmentRules {
    pub trigger: String,
    pub id_predicate: Iri,
    pub id_pattern: Regex,
    /// Fragment predicate → predicate used in the main graph.
    pub table: MappingTable,
}

impl EnrichmentRules {
    /// Resolve the enrichment settings against the namespace registry.
    pub fn from_config(
        config: &EnrichmentConfig,
        registry: &NamespaceRegistry,
        table: MappingTable,
    ) -> EtlResult<Self> {
        let (ns, term) =
            split_qualified(&config.id_predicate).ok_or_else(|| ConfigError::InvalidValue {
                key: "ENRICHMENT_ID_PREDICATE".into(),
                value: config.id_predicate.clone(),
                message: "value must have the shape <NAMESPACE>.<TERM>".into(),
            })?;
        let id_predicate = registry.resolve(ns, term)?;
        let id_pattern = Regex::new(&config.id_pattern).map_err(|e| EnrichmentError::InvalidPattern {
            pattern: config.id_pattern.clone(),
            message: e.to_string(),
        })?;
        if id_pattern.captures_len() < 2 {
            return Err(EnrichmentError::InvalidPattern {
                pattern: config.id_pattern.clone(),
                message: "pattern has no capture group".into(),
            }
            .into());
        }
        Ok(Self {
            trigger: config.trigger.clone(),
            id_predicate,
            id_pattern,
            table,
        })
    }

    /// The lookup key in an identifier literal, if it matches.
    pub fn extract_id<'a>(&self, identifier: &'a str) -> Option<&'a str> {
        let caps = self.id_pattern.captures(identifier.trim())?;
        caps.name("id").or_else(|| caps.get(1)).map(|m| m.as_str())
    }
}

/// Merge enrichment statements into `graph`. Only ever adds triples.
pub fn merge_enrichment(
    graph: &mut GraphStore,
    rules: &EnrichmentRules,
    provider: &dyn EnrichmentProvider,
) -> PassReport {
    let _span = tracing::info_span!("enrichment").entered();
    let mut report = PassReport::new(PassKind::Enrichment, graph.size());

    let candidates: BTreeSet<Node> = graph
        .query(None, None, None)
        .filter(|t| t.object.mentions(&rules.trigger))
        .map(|t| t.subject)
        .collect();

    let mut lookups: BTreeSet<(Node, String)> = BTreeSet::new();
    for subject in candidates {
        for object in graph.objects(&subject, &rules.id_predicate) {
            let Some(lit) = object.as_literal() else {
                continue;
            };
            if let Some(id) = rules.extract_id(&lit.value) {
                lookups.insert((subject.clone(), id.to_string()));
            }
        }
    }
    tracing::info!(entities = lookups.len(), "enriching entities");

    for (subject, id) in lookups {
        let body = match provider.lookup(&id) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(subject = %subject, id = %id, error = %e, "enrichment lookup failed, skipping");
                report.failures.push(PassFailure {
                    subject: subject.to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let fragment = match codec::parse_fragment(body.as_bytes(), provider.format(), None) {
            Ok(fragment) => fragment,
            Err(e) => {
                tracing::warn!(subject = %subject, id = %id, error = %e, "enrichment response unparsable, skipping");
                report.failures.push(PassFailure {
                    subject: subject.to_string(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let mut merged = 0;
        for statement in fragment {
            let Some(target) = rules.table.get(&statement.predicate) else {
                continue;
            };
            // Fragment blank nodes have no statements in the main graph.
            if matches!(statement.object, Term::Blank(_)) {
                continue;
            }
            let triple = Triple {
                subject: subject.clone(),
                predicate: target.clone(),
                object: statement.object,
            };
            if graph.add(triple.clone()) {
                report.added.push(triple);
                merged += 1;
            }
        }
        tracing::debug!(subject = %subject, id = %id, merged, "merged enrichment");
    }

    report.after = graph.size();
    tracing::info!(
        added = report.added.len(),
        failed = report.failures.len(),
        "enrichment done"
    );
    report
}

/// Looks up identifiers over HTTP using a URL template with an `{id}` placeholder.
pub struct HttpEnrichment {
    agent: ureq::Agent,
    url_template: String,
}

impl HttpEnrichment {
    /// `None` when enrichment is not configured.
    pub fn from_config(config: &PipelineConfig) -> Option<Self> {
        let url_template = config.enrichment.url_template.clone()?;
        Some(Self {
            agent: ureq::AgentBuilder::new()
                .timeout(config.http_timeout)
                .build(),
            url_template,
        })
    }

    fn url(&self, id: &str) -> String {
        self.url_template.replace("{id}", id)
    }
}

impl EnrichmentProvider for HttpEnrichment {
    fn lookup(&self, id: &str) -> EnrichmentResult<String> {
        let url = self.url(id);
        let unavailable = |message: String| EnrichmentError::Unavailable {
            id: id.to_string(),
            url: url.clone(),
            message,
        };

        match self.agent.get(&url).set("Accept", "text/turtle").call() {
            Ok(response) => response.into_string().map_err(|e| unavailable(format!("read body: {e}"))),
            Err(ureq::Error::Status(code, _)) => Err(unavailable(format!("HTTP {code}"))),
            Err(ureq::Error::Transport(transport)) => Err(unavailable(transport.to_string())),
        }
    }
}
