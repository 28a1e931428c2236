//! Backend rewrite CLI entry point.
//!
//! Configuration tool for the rewrite engine: validate a rule file or
//! dry-run a single request against it. The engine itself is embedded as a
//! library by the gateway pipeline.

use anyhow::{Context, Result};
use backend_rewrite::{RewriteConfig, RewriteContext, RewriteEngine, RewriteOutcome};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "backend-rewrite")]
#[command(author, version, about = "Backend path rewrite rules for HTTP gateways")]
struct Args {
    /// Configuration file path (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Operation identifier for a dry-run rewrite
    #[arg(long)]
    operation: Option<String>,

    /// Request path for a dry-run rewrite
    #[arg(long)]
    path: Option<String>,

    /// Extracted query-parameter fragment for a dry-run rewrite
    /// (e.g. "shelf=1&book=2", no leading separator)
    #[arg(long)]
    extra_query: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print example configuration and exit.
    #[arg(long)]
    example_config: bool,

    /// Validate configuration and exit.
    #[arg(long)]
    validate: bool,
}

fn print_example_config() {
    let example = r#"# Backend Rewrite Configuration Example
version: "1"

rules:
  # Replace the path entirely; query parameters from the original request
  # and from path-template extraction are carried over.
  - operation: "ListShelves"
    description: "Shelves live behind a fixed backend path"
    mode: constant_address
    path_prefix: "/v1/shelves"

  # Prepend a prefix to the whole original path, query string included.
  - operation: "CreateBook"
    mode: append_path_to_address
    path_prefix: "/books-backend"
"#;
    println!("{}", example);
}

fn load_config(path: &PathBuf) -> Result<RewriteConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    if args.example_config {
        print_example_config();
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RewriteConfig::default(),
    };

    // Building the engine performs all configuration-time validation.
    let engine = RewriteEngine::new(&config)?;

    if args.validate {
        info!(rules = engine.table().len(), "Configuration is valid");
        return Ok(());
    }

    // Dry-run mode: rewrite one request and print the resulting path.
    if let Some(path) = &args.path {
        let mut ctx = RewriteContext::new(path.clone());
        if let Some(operation) = &args.operation {
            ctx = ctx.with_operation(operation.clone());
        }
        if let Some(extra) = &args.extra_query {
            ctx = ctx.with_extra_query_params(extra.clone());
        }

        match engine.apply(&ctx) {
            RewriteOutcome::Rewritten { new_path, mode } => {
                println!("{} ({})", new_path, mode.as_str());
            }
            RewriteOutcome::Unchanged => {
                println!("{} (unchanged)", path);
            }
        }
        return Ok(());
    }

    info!(
        config = ?args.config,
        rules = engine.table().len(),
        "Loaded rewrite rules; pass --path to dry-run a request or --validate to check a config"
    );

    Ok(())
}
