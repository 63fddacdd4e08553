//! Processing pipeline: fetch → parse → filter → enrich → map → filter → serialize.
//!
//! A [`Pipeline`] owns the configuration, the namespace registry and the
//! loaded rules, and runs the stages in a fixed order over one
//! [`GraphStore`]. Every pass report is checked against the triple-count
//! invariant before the next stage runs; a violation aborts the run before
//! anything is written.

use oxigraph::io::RdfFormat;
use serde::Serialize;

use crate::artifact;
use crate::codec;
use crate::config::PipelineConfig;
use crate::error::{EtlResult, PipelineError};
use crate::fetch::{self, ContextProvider, SourceProvider};
use crate::graph::GraphStore;
use crate::namespace::NamespaceRegistry;
use crate::rules::{RuleSet, SkippedEntry};
use crate::transform::{
    self, EnrichmentProvider, EnrichmentRules, PassReport, PassSummary, ValidityRules,
};

/// Named processing stage in a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Download source pages.
    Fetch,
    /// Read the persisted artifact.
    Load,
    /// Parse serialized text into the graph store.
    Parse,
    /// Drop unserializable and custom-vocabulary triples.
    ValidityFilter,
    /// Bind namespace prefixes from the context provider.
    BindNamespaces,
    /// Merge external enrichment statements.
    Enrich,
    /// Rename predicates.
    Map,
    /// Remove filtered predicates.
    Filter,
    /// Serialize and atomically write the artifact.
    Write,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub graph_id: String,
    pub stages: Vec<StageKind>,
    pub passes: Vec<PassSummary>,
    pub triples: usize,
    pub skipped_rules: Vec<SkippedEntry>,
}

/// Configured pipeline. Construct once per run.
pub struct Pipeline {
    config: PipelineConfig,
    registry: NamespaceRegistry,
    rules: RuleSet,
    enrichment: EnrichmentRules,
    format: RdfFormat,
}

impl Pipeline {
    /// Resolve namespaces, load rules and validate the output format.
    ///
    /// Bad rule entries are skipped (see [`RuleSet::skipped`]); bad namespace
    /// declarations, bad enrichment settings and an unknown output format are
    /// fatal, so they surface before anything is fetched.
    pub fn new(config: PipelineConfig) -> EtlResult<Self> {
        let mut registry = NamespaceRegistry::builtin();
        for (name, base) in &config.namespaces {
            registry.declare(name, base)?;
        }
        let rules = RuleSet::load(
            config.rule_pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            &registry,
            config.default_mapping,
        );
        let enrichment =
            EnrichmentRules::from_config(&config.enrichment, &registry, rules.enrichment.clone())?;
        let format = codec::format_for(&config.output_format)?;
        Ok(Self {
            config,
            registry,
            rules,
            enrichment,
            format,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn enrichment_rules(&self) -> &EnrichmentRules {
        &self.enrichment
    }

    /// Empty graph with the registry's prefixes bound.
    pub fn new_graph(&self) -> GraphStore {
        let mut graph = GraphStore::new(self.config.graph_id.clone());
        for vocab in self.registry.iter() {
            graph.bind(vocab.prefix(), vocab.base());
        }
        graph
    }

    /// Parse a source document into a fresh graph.
    pub fn parse_source(&self, document: &[u8], format: RdfFormat) -> EtlResult<GraphStore> {
        let mut graph = self.new_graph();
        let triples = codec::parse(document, format, Some(self.config.base_uri.as_str()))?;
        let parsed = triples.len();
        let unique = graph.extend(triples);
        tracing::info!(parsed, unique, "parsed source document");
        Ok(graph)
    }

    /// Parse source pages into one graph. Blank nodes are relabelled per page
    /// so equal labels on different pages stay distinct nodes.
    pub fn parse_pages(&self, pages: &[String]) -> EtlResult<GraphStore> {
        let mut graph = self.new_graph();
        let mut parsed = 0;
        for page in pages {
            let triples =
                codec::parse_fragment(page.as_bytes(), RdfFormat::Turtle, Some(self.config.base_uri.as_str()))?;
            parsed += triples.len();
            graph.extend(triples);
        }
        tracing::info!(pages = pages.len(), parsed, unique = graph.size(), "parsed source pages");
        Ok(graph)
    }

    /// Read and parse the persisted artifact.
    pub fn load_artifact(&self) -> EtlResult<GraphStore> {
        let path = &self.config.target_path;
        tracing::info!(path = %path.display(), "reading artifact");
        let bytes = artifact::read(path, &self.config.encoding)?;
        self.parse_source(&bytes, self.format)
    }

    /// Serialize `graph` and atomically replace the artifact.
    pub fn write_artifact(&self, graph: &GraphStore) -> EtlResult<()> {
        let bytes = codec::serialize(graph, self.format)?;
        artifact::write_atomic(&self.config.target_path, &bytes, &self.config.encoding)?;
        Ok(())
    }

    /// Run the validity filter.
    pub fn validate(&self, graph: &mut GraphStore) -> EtlResult<PassReport> {
        let report = transform::filter_invalid(graph, &ValidityRules::from_config(&self.config));
        report.check()?;
        Ok(report)
    }

    /// Run the enrichment merge against `provider`.
    pub fn enrich(
        &self,
        graph: &mut GraphStore,
        provider: &dyn EnrichmentProvider,
    ) -> EtlResult<PassReport> {
        let report = transform::merge_enrichment(graph, &self.enrichment, provider);
        report.check()?;
        if !report.removed.is_empty() {
            return Err(PipelineError::CountMismatch {
                pass: report.pass.to_string(),
                before: report.before,
                after: report.after,
                added: report.added.len(),
                removed: report.removed.len(),
            }
            .into());
        }
        Ok(report)
    }

    /// Run the mapping pass, then the filter pass.
    ///
    /// Mapping must not change the triple count: a rename that lands on a
    /// triple already in the graph aborts the run.
    pub fn remap(&self, graph: &mut GraphStore) -> EtlResult<[PassReport; 2]> {
        let mapped = transform::apply_mapping(graph, &self.rules.mapping);
        mapped.check()?;
        if mapped.collapsed > 0 || mapped.before != mapped.after {
            return Err(PipelineError::NotNeutral {
                pass: mapped.pass.to_string(),
                renamed: mapped.removed.len(),
                added: mapped.added.len(),
                collapsed: mapped.collapsed,
            }
            .into());
        }
        let filtered = transform::apply_filter(graph, &self.rules.filter);
        filtered.check()?;
        Ok([mapped, filtered])
    }

    /// Bind the context provider's prefixes, later bindings overriding earlier ones.
    pub fn bind_context(&self, graph: &mut GraphStore, context: &dyn ContextProvider) -> EtlResult<()> {
        let bindings = context.namespaces()?;
        for (prefix, iri) in &bindings {
            tracing::debug!(prefix = %prefix, iri = %iri, "binding namespace");
            graph.bind(prefix, iri);
        }
        tracing::info!(bindings = bindings.len(), "bound namespace context");
        Ok(())
    }

    /// Fetch, parse, filter and bind namespaces; write the artifact.
    pub fn export(
        &self,
        source: &dyn SourceProvider,
        context: &dyn ContextProvider,
    ) -> EtlResult<RunSummary> {
        let mut summary = self.summary(vec![StageKind::Fetch]);
        let graph = self.export_graph(source, context, &mut summary)?;
        self.finish(graph, summary)
    }

    /// Load the artifact, enrich, map and filter; write the artifact.
    pub fn transform(
        &self,
        enrichment: Option<&dyn EnrichmentProvider>,
        context: Option<&dyn ContextProvider>,
    ) -> EtlResult<RunSummary> {
        let mut summary = self.summary(vec![StageKind::Load, StageKind::Parse]);
        let mut graph = self.load_artifact()?;
        if let Some(context) = context {
            self.bind_context(&mut graph, context)?;
            summary.stages.push(StageKind::BindNamespaces);
        }
        self.transform_graph(&mut graph, enrichment, &mut summary)?;
        self.finish(graph, summary)
    }

    /// Export and transform in one process, writing the artifact once.
    pub fn run(
        &self,
        source: &dyn SourceProvider,
        context: &dyn ContextProvider,
        enrichment: Option<&dyn EnrichmentProvider>,
    ) -> EtlResult<RunSummary> {
        let mut summary = self.summary(vec![StageKind::Fetch]);
        let mut graph = self.export_graph(source, context, &mut summary)?;
        self.transform_graph(&mut graph, enrichment, &mut summary)?;
        self.finish(graph, summary)
    }

    fn export_graph(
        &self,
        source: &dyn SourceProvider,
        context: &dyn ContextProvider,
        summary: &mut RunSummary,
    ) -> EtlResult<GraphStore> {
        let pages = fetch::fetch_pages(source, self.config.max_pages)?;
        let mut graph = self.parse_pages(&pages)?;
        summary.stages.push(StageKind::Parse);

        let report = self.validate(&mut graph)?;
        summary.stages.push(StageKind::ValidityFilter);
        summary.passes.push(report.summary());

        self.bind_context(&mut graph, context)?;
        summary.stages.push(StageKind::BindNamespaces);
        Ok(graph)
    }

    fn transform_graph(
        &self,
        graph: &mut GraphStore,
        enrichment: Option<&dyn EnrichmentProvider>,
        summary: &mut RunSummary,
    ) -> EtlResult<()> {
        match enrichment {
            Some(provider) => {
                let report = self.enrich(graph, provider)?;
                summary.stages.push(StageKind::Enrich);
                summary.passes.push(report.summary());
            }
            None => tracing::info!("enrichment not configured, skipping"),
        }

        let [mapped, filtered] = self.remap(graph)?;
        summary.stages.extend([StageKind::Map, StageKind::Filter]);
        summary.passes.push(mapped.summary());
        summary.passes.push(filtered.summary());
        Ok(())
    }

    fn summary(&self, stages: Vec<StageKind>) -> RunSummary {
        RunSummary {
            graph_id: self.config.graph_id.clone(),
            stages,
            passes: Vec::new(),
            triples: 0,
            skipped_rules: self.rules.skipped.clone(),
        }
    }

    fn finish(&self, graph: GraphStore, mut summary: RunSummary) -> EtlResult<RunSummary> {
        self.write_artifact(&graph)?;
        summary.stages.push(StageKind::Write);
        summary.triples = graph.size();
        tracing::info!(triples = summary.triples, graph = %summary.graph_id, "run complete");
        Ok(summary)
    }
}
