// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # omeka-ld-etl
//!
//! Extracts the linked-data export of an Omeka S collection, cleans it up and
//! rewrites its vocabulary so it can be published as a single RDF file.
//!
//! ## Architecture
//!
//! - **Namespaces** (`namespace`): built-in vocabularies and `<NS>.<TERM>` resolution
//! - **Rules** (`rules`): predicate mapping, filter and enrichment tables from configuration
//! - **Graph store** (`graph`): in-memory triple set with subject/predicate indexes
//! - **Codec** (`codec`): parsing and serialization via `oxigraph`
//! - **Passes** (`transform`): validity filter, enrichment merge, mapping and filtering
//! - **Pipeline** (`pipeline`): the export, transform and run stages end to end
//!
//! ## Library usage
//!
//! ```no_run
//! use omeka_ld_etl::config::PipelineConfig;
//! use omeka_ld_etl::pipeline::Pipeline;
//!
//! let config = PipelineConfig::from_pairs([("MAP_DCTERMS_TITLE", "SDO.name")]).unwrap();
//! let pipeline = Pipeline::new(config).unwrap();
//! let summary = pipeline.transform(None, None).unwrap();
//! println!("{} triples written", summary.triples);
//! ```

pub mod artifact;
pub mod codec;
pub mod config;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod namespace;
pub mod pipeline;
pub mod rules;
pub mod transform;
