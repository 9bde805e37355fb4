//! Ecorec CLI - query related-product recommendations from a snapshot

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecorec_core::{
    EngineConfig, ProductId, RecommendationEngine, Recommendations, Snapshot,
};

#[derive(Parser)]
#[command(name = "ecorec")]
#[command(about = "Related-product recommendations from precomputed similarity matrices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend related products
    Recommend {
        /// Product ids to query
        #[arg(required = true)]
        prod_ids: Vec<String>,

        /// Path to the snapshot (.json or binary)
        #[arg(short, long, default_value = "./ecorec.bin")]
        snapshot: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Results per strategy (overrides the config file)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show a catalog product
    Lookup {
        /// Product id
        prod_id: String,

        /// Path to the snapshot (.json or binary)
        #[arg(short, long, default_value = "./ecorec.bin")]
        snapshot: PathBuf,
    },

    /// Show snapshot statistics
    Stats {
        /// Path to the snapshot (.json or binary)
        #[arg(short, long, default_value = "./ecorec.bin")]
        snapshot: PathBuf,
    },
}

/// One response body, in the shape served by the recommendation endpoint.
#[derive(Serialize)]
struct RecommendationOutput<'a> {
    prod_id: &'a ProductId,
    recommendations: [Vec<ProductId>; 2],
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Recommend {
            prod_ids,
            snapshot,
            config,
            limit,
            format,
        } => {
            let config = load_config(config.as_deref(), limit)?;
            let snapshot = load_snapshot(&snapshot)?;
            let engine = RecommendationEngine::with_config(Arc::new(snapshot), config);

            let ids: Vec<ProductId> = prod_ids.into_iter().map(ProductId::new).collect();
            let results = engine.get_recommendations_batch(&ids);

            if format == "json" {
                let output: Vec<RecommendationOutput<'_>> = ids
                    .iter()
                    .zip(results)
                    .map(|(prod_id, recs)| RecommendationOutput {
                        prod_id,
                        recommendations: recs.into_pair(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for (id, recs) in ids.iter().zip(&results) {
                    print_recommendations(&engine, id, recs);
                }
            }
        }

        Commands::Lookup { prod_id, snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            let id = ProductId::new(prod_id);

            match snapshot.catalog().find_by_id(&id) {
                Some(product) => {
                    println!("{}", serde_json::to_string_pretty(product)?);
                    match snapshot.pivot().position(&product.name) {
                        Some(pos) => println!("Pivot position: {}", pos.0),
                        None => println!("Pivot position: {}", "none".yellow()),
                    }
                }
                None => anyhow::bail!("Product {} not found", id),
            }
        }

        Commands::Stats { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            let stats = snapshot.stats();

            println!("\n=== Snapshot Statistics ===");
            println!("Catalog products:      {}", stats.products);
            println!("Content matrix:        {0}x{0}", stats.content_dim);
            println!("Pivot names:           {}", stats.pivot_names);
            println!("Collaborative matrix:  {0}x{0}", stats.collaborative_dim);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, limit: Option<usize>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => EngineConfig::default(),
    };
    if let Some(limit) = limit {
        config = config.with_limit(limit);
    }
    Ok(config)
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("Failed to load snapshot {:?}", path))
}

fn print_recommendations(engine: &RecommendationEngine, id: &ProductId, recs: &Recommendations) {
    let catalog = engine.snapshot().catalog();
    let title = catalog
        .find_by_id(id)
        .map(|p| p.name.as_str())
        .unwrap_or("unknown product");

    println!("\n=== Recommendations for {} ({}) ===", id.to_string().cyan(), title);

    for (label, list) in [("Content-based", &recs.content), ("Collaborative", &recs.collaborative)] {
        println!("\n{} ({})", label.bold(), list.len());
        if list.is_empty() {
            println!("   {}", "no recommendations".yellow());
        }
        for (i, rec) in list.iter().enumerate() {
            match catalog.find_by_id(rec) {
                Some(p) => println!("{:>3}. {}  {}  [{}]", i + 1, rec.to_string().green(), p.name, p.category),
                None => println!("{:>3}. {}", i + 1, rec),
            }
        }
    }
    println!();
}
