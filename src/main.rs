//! omeka-ld-etl CLI: export, clean and remap an Omeka S linked-data collection.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use omeka_ld_etl::config::PipelineConfig;
use omeka_ld_etl::fetch::{ContextProvider, HttpContext, HttpSource};
use omeka_ld_etl::pipeline::{Pipeline, RunSummary};
use omeka_ld_etl::transform::{EnrichmentProvider, HttpEnrichment};

#[derive(Parser)]
#[command(name = "omeka-ld-etl", version, about = "Omeka S linked-data ETL")]
struct Cli {
    /// TOML file with configuration keys; the environment overrides it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artifact path (overrides TARGET_FILEPATH).
    #[arg(long, global = true)]
    target: Option<PathBuf>,

    /// Artifact format (overrides OUTPUT_FILE_FORMAT).
    #[arg(long, global = true)]
    format: Option<String>,

    /// Print the run summary as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the collection, drop invalid triples and write the artifact.
    Export,

    /// Enrich, map and filter the artifact in place.
    Transform {
        /// Re-fetch namespace bindings from the context document.
        #[arg(long)]
        with_context: bool,
    },

    /// Export and transform in one go.
    Run,

    /// Load configuration and rules, report what was loaded, and exit.
    CheckConfig,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(target) = cli.target {
        config.target_path = target;
    }
    if let Some(format) = cli.format {
        config.output_format = format;
    }

    let pipeline = Pipeline::new(config)?;
    let config = pipeline.config();
    let enrichment = HttpEnrichment::from_config(config);
    let enrichment = enrichment.as_ref().map(|e| e as &dyn EnrichmentProvider);

    match cli.command {
        Commands::Export => {
            let summary = pipeline.export(&HttpSource::new(config), &HttpContext::new(config))?;
            report(&summary, cli.json)?;
        }

        Commands::Transform { with_context } => {
            let context = with_context.then(|| HttpContext::new(config));
            let summary = pipeline.transform(
                enrichment,
                context.as_ref().map(|c| c as &dyn ContextProvider),
            )?;
            report(&summary, cli.json)?;
        }

        Commands::Run => {
            let summary = pipeline.run(
                &HttpSource::new(config),
                &HttpContext::new(config),
                enrichment,
            )?;
            report(&summary, cli.json)?;
        }

        Commands::CheckConfig => {
            let rules = pipeline.rules();
            if cli.json {
                let doc = serde_json::json!({
                    "target": config.target_path,
                    "format": config.output_format,
                    "graph_id": config.graph_id,
                    "source": config.page_url(1),
                    "enrichment": config.enrichment.url_template,
                    "mapping": rules.mapping.iter()
                        .map(|(s, t)| (s.as_str(), t.as_str()))
                        .collect::<Vec<_>>(),
                    "filter": rules.filter.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                    "enrich": rules.enrichment.iter()
                        .map(|(s, t)| (s.as_str(), t.as_str()))
                        .collect::<Vec<_>>(),
                    "skipped": rules.skipped,
                });
                println!("{}", serde_json::to_string_pretty(&doc).into_diagnostic()?);
            } else {
                println!("Target:     {}", config.target_path.display());
                println!("Format:     {}", config.output_format);
                println!("Graph:      {}", config.graph_id);
                println!("Source:     {}", config.page_url(1));
                match &config.enrichment.url_template {
                    Some(url) => println!("Enrichment: {url}"),
                    None => println!("Enrichment: disabled"),
                }
                println!("\nNamespaces:");
                for vocab in pipeline.registry().iter() {
                    println!("  {:<10} {}", vocab.prefix(), vocab.base());
                }
                println!("\nMapping ({}):", rules.mapping.len());
                for (source, target) in rules.mapping.iter() {
                    println!("  {source} -> {target}");
                }
                println!("\nFilter ({}):", rules.filter.len());
                for predicate in rules.filter.iter() {
                    println!("  {predicate}");
                }
                println!("\nEnrichment ({}):", rules.enrichment.len());
                for (source, target) in rules.enrichment.iter() {
                    println!("  {source} -> {target}");
                }
                if !rules.skipped.is_empty() {
                    println!("\nSkipped ({}):", rules.skipped.len());
                    for entry in &rules.skipped {
                        println!("  {}={}: {}", entry.key, entry.value, entry.reason);
                    }
                }
            }
        }
    }

    Ok(())
}

fn report(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary).into_diagnostic()?);
        return Ok(());
    }
    for pass in &summary.passes {
        println!("{pass}");
        for failure in &pass.failures {
            println!("  failed {}: {}", failure.subject, failure.message);
        }
    }
    if !summary.skipped_rules.is_empty() {
        println!("{} rule entries skipped", summary.skipped_rules.len());
    }
    println!("{} triples in graph {}", summary.triples, summary.graph_id);
    Ok(())
}
