//! End-to-end integration tests for the ETL pipeline.
//!
//! These tests run the export, transform and run stages against canned
//! source pages, a canned context document and a canned enrichment service,
//! and check the artifact written to a temporary directory.

use std::collections::HashMap;
use std::path::Path;

use omeka_ld_etl::codec;
use omeka_ld_etl::config::PipelineConfig;
use omeka_ld_etl::error::{EnrichmentError, EtlError, FetchError, PipelineError};
use omeka_ld_etl::fetch::{ContextProvider, FetchResult, SourceProvider};
use omeka_ld_etl::graph::{Iri, Literal, Triple};
use omeka_ld_etl::pipeline::{Pipeline, StageKind};
use omeka_ld_etl::transform::PassKind;
use omeka_ld_etl::transform::enrich::{EnrichmentProvider, EnrichmentResult};

const BASE: &str = "https://murals.example.org/";
const DC_TITLE: &str = "http://purl.org/dc/terms/title";
const DC_DESCRIPTION: &str = "http://purl.org/dc/terms/description";
const SDO_NAME: &str = "https://schema.org/name";
const SDO_SAME_AS: &str = "https://schema.org/sameAs";
const SDO_DESCRIPTION: &str = "https://schema.org/description";

const PAGE_1: &str = r#"
@prefix dcterms: <http://purl.org/dc/terms/> .
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .

<api/items/1> dcterms:title "Kerk van Hattem" ;
    dcterms:description "Wall painting in the choir" ;
    dcterms:subject <https://monumentenregister.cultureelerfgoed.nl/rijksmonument/21904> ;
    dcterms:identifier "RM21904" ;
    dcterms:type <api/items/90> .

<api/items/90> rdf:type <api/custom_vocabs/customvocab-4> ;
    dcterms:title "Fresco" .
"#;

const PAGE_2: &str = r#"
@prefix dcterms: <http://purl.org/dc/terms/> .

<api/items/2> dcterms:title "Sint-Jan" ;
    dcterms:subject <https://monumentenregister.cultureelerfgoed.nl/rijksmonument/510> ;
    dcterms:identifier "RM510" .

<api/items/3/@context> dcterms:title "parse artifact" .
"#;

struct Pages(Vec<&'static str>);

impl SourceProvider for Pages {
    fn fetch_page(&self, page: u32) -> FetchResult<Option<String>> {
        Ok(self.0.get(page as usize - 1).map(|s| s.to_string()))
    }

    fn describe(&self) -> String {
        format!("{} canned pages", self.0.len())
    }
}

struct Context;

impl ContextProvider for Context {
    fn namespaces(&self) -> FetchResult<Vec<(String, String)>> {
        Ok(vec![
            ("o".into(), "http://omeka.org/s/vocabs/o#".into()),
            ("dcterms".into(), "http://purl.org/dc/terms/".into()),
        ])
    }
}

struct Registry(HashMap<&'static str, &'static str>);

impl EnrichmentProvider for Registry {
    fn lookup(&self, id: &str) -> EnrichmentResult<String> {
        self.0
            .get(id)
            .map(|s| s.to_string())
            .ok_or_else(|| EnrichmentError::Unavailable {
                id: id.to_string(),
                url: format!("https://monuments.example.org/{id}"),
                message: "HTTP 503".into(),
            })
    }
}

fn registry() -> Registry {
    Registry(HashMap::from([(
        "21904",
        r#"<https://monuments.example.org/21904>
               <http://www.w3.org/2000/01/rdf-schema#seeAlso> <http://www.wikidata.org/entity/Q2466491> ;
               <http://www.w3.org/2000/01/rdf-schema#label> "Grote Kerk" ."#,
    )]))
}

fn pipeline(dir: &Path, extra: &[(&str, &str)]) -> Pipeline {
    let target = dir.join("export.ttl");
    let mut pairs: Vec<(String, String)> = vec![
        ("BASE_URI".into(), BASE.into()),
        ("TARGET_FILEPATH".into(), target.display().to_string()),
        ("ENRICH_RDFS_seeAlso".into(), "SDO.sameAs".into()),
    ];
    pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Pipeline::new(PipelineConfig::from_pairs(pairs).unwrap()).unwrap()
}

fn written(dir: &Path) -> Vec<Triple> {
    let bytes = std::fs::read(dir.join("export.ttl")).unwrap();
    codec::parse(&bytes, codec::format_for("ttl").unwrap(), None).unwrap()
}

fn item(n: u32) -> Iri {
    Iri::new(format!("{BASE}api/items/{n}"))
}

#[test]
fn export_removes_invalid_triples_and_resolves_base() {
    let dir = tempfile::TempDir::new().unwrap();
    let pipeline = pipeline(dir.path(), &[]);

    let summary = pipeline.export(&Pages(vec![PAGE_1, PAGE_2]), &Context).unwrap();

    let triples = written(dir.path());
    // Relative IRIs resolve against the base URI.
    assert!(triples.contains(&Triple::new(item(1), DC_TITLE, Literal::simple("Kerk van Hattem"))));
    // The custom-vocabulary type, the reference to the typed term and the
    // context artifact are gone.
    assert!(!triples.iter().any(|t| t.object.mentions("customvocab")));
    assert!(!triples.iter().any(|t| t.object.mentions("api/items/90")));
    assert_eq!(summary.passes.len(), 1);
    assert_eq!(summary.passes[0].pass, PassKind::ValidityFilter);
    assert_eq!(summary.passes[0].removed, 3);
    assert!(!triples.iter().any(|t| t.subject.mentions("@context")));
    // Export never maps: dcterms survives.
    assert!(!triples.iter().any(|t| t.predicate.as_str() == SDO_NAME));

    let text = std::fs::read_to_string(dir.path().join("export.ttl")).unwrap();
    assert!(text.contains("@prefix o: <http://omeka.org/s/vocabs/o#>"));
}

#[test]
fn export_then_transform_maps_filters_and_enriches() {
    let dir = tempfile::TempDir::new().unwrap();
    let pipeline = pipeline(dir.path(), &[("FILTER_1", "SDO.description")]);
    pipeline.export(&Pages(vec![PAGE_1, PAGE_2]), &Context).unwrap();

    let summary = pipeline.transform(Some(&registry()), None).unwrap();

    let triples = written(dir.path());
    assert!(triples.contains(&Triple::new(item(1), SDO_NAME, Literal::simple("Kerk van Hattem"))));
    assert!(!triples.iter().any(|t| t.predicate.as_str() == DC_TITLE));
    // Mapped to schema:description, then filtered.
    assert!(!triples.iter().any(|t| t.predicate.as_str() == DC_DESCRIPTION));
    assert!(!triples.iter().any(|t| t.predicate.as_str() == SDO_DESCRIPTION));
    // Enrichment merged seeAlso as schema:sameAs; the unmapped label was not merged.
    assert!(triples.contains(&Triple::new(
        item(1),
        SDO_SAME_AS,
        Iri::new("http://www.wikidata.org/entity/Q2466491")
    )));
    assert!(!triples.iter().any(|t| t.object.mentions("Grote Kerk")));

    let kinds: Vec<PassKind> = summary.passes.iter().map(|p| p.pass).collect();
    assert_eq!(kinds, vec![PassKind::Enrichment, PassKind::Mapping, PassKind::Filter]);
}

#[test]
fn one_failed_lookup_does_not_abort_the_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let pipeline = pipeline(dir.path(), &[]);

    let summary = pipeline
        .run(&Pages(vec![PAGE_1, PAGE_2]), &Context, Some(&registry()))
        .unwrap();

    let enrichment = summary
        .passes
        .iter()
        .find(|p| p.pass == PassKind::Enrichment)
        .unwrap();
    assert_eq!(enrichment.added, 1);
    assert_eq!(enrichment.failures.len(), 1);
    assert!(enrichment.failures[0].subject.contains("api/items/2"));
    assert!(summary.stages.ends_with(&[StageKind::Map, StageKind::Filter, StageKind::Write]));
    // Item 2 is still in the artifact, just not enriched.
    let triples = written(dir.path());
    assert!(triples.contains(&Triple::new(item(2), SDO_NAME, Literal::simple("Sint-Jan"))));
}

#[test]
fn run_matches_export_then_transform() {
    let split = tempfile::TempDir::new().unwrap();
    let combined = tempfile::TempDir::new().unwrap();
    let pages = Pages(vec![PAGE_1, PAGE_2]);

    let p = pipeline(split.path(), &[]);
    p.export(&pages, &Context).unwrap();
    p.transform(Some(&registry()), None).unwrap();

    pipeline(combined.path(), &[])
        .run(&pages, &Context, Some(&registry()))
        .unwrap();

    let mut a = written(split.path());
    let mut b = written(combined.path());
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[test]
fn transform_without_enrichment_skips_the_pass() {
    let dir = tempfile::TempDir::new().unwrap();
    let pipeline = pipeline(dir.path(), &[("DEFAULT_MAPPING", "false")]);
    pipeline.export(&Pages(vec![PAGE_1]), &Context).unwrap();

    let summary = pipeline.transform(None, Some(&Context)).unwrap();

    assert!(!summary.stages.contains(&StageKind::Enrich));
    assert!(summary.stages.contains(&StageKind::BindNamespaces));
    // No rules at all: mapping renames nothing.
    let mapping = summary.passes.iter().find(|p| p.pass == PassKind::Mapping).unwrap();
    assert_eq!(mapping.removed, 0);
    assert!(written(dir.path()).iter().any(|t| t.predicate.as_str() == DC_TITLE));
}

#[test]
fn malformed_rules_are_skipped_and_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let pipeline = pipeline(
        dir.path(),
        &[
            ("MAP_DCTERMS_TITLE", "SDO.headline"),
            ("MAP_NOPE_TITLE", "SDO.name"),
            ("FILTER_2", "no-dot-here"),
        ],
    );

    let summary = pipeline.run(&Pages(vec![PAGE_1]), &Context, None).unwrap();

    assert_eq!(summary.skipped_rules.len(), 2);
    let triples = written(dir.path());
    assert!(triples.iter().any(|t| t.predicate.as_str() == "https://schema.org/headline"));
}

#[test]
fn unparsable_artifact_is_left_untouched() {
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("export.ttl");
    let garbage = "<https://x/1> <https://x/p> \"unterminated .\n";
    std::fs::write(&target, garbage).unwrap();

    let err = pipeline(dir.path(), &[]).transform(None, None).unwrap_err();

    assert!(matches!(err, EtlError::Codec(_)));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), garbage);
}

#[test]
fn colliding_rename_aborts_before_writing() {
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("export.ttl");
    let source = "@prefix dcterms: <http://purl.org/dc/terms/> .\n\
                  @prefix schema: <https://schema.org/> .\n\
                  <https://murals.example.org/api/items/1> dcterms:title \"Foo\" .\n\
                  <https://murals.example.org/api/items/1> schema:name \"Foo\" .\n";
    std::fs::write(&target, source).unwrap();
    let pipeline = pipeline(
        dir.path(),
        &[("MAP_DCTERMS_TITLE", "SDO.name"), ("DEFAULT_MAPPING", "false")],
    );

    let err = pipeline.transform(None, None).unwrap_err();

    assert!(matches!(
        err,
        EtlError::Pipeline(PipelineError::NotNeutral { collapsed: 1, .. })
    ));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), source);
}

#[test]
fn empty_source_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = pipeline(dir.path(), &[])
        .export(&Pages(vec![]), &Context)
        .unwrap_err();
    assert!(matches!(err, EtlError::Fetch(FetchError::NoData { .. })));
    assert!(!dir.path().join("export.ttl").exists());
}
