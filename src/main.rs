use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use baseline_lint::catalog::{KnowledgeBase, write_webstatus_cache};
use baseline_lint::config::{DEFAULT_CONFIG_FILE, EngineConfig};
use baseline_lint::css::{Declaration, extract_declarations};
use baseline_lint::engine::Resolver;
use baseline_lint::error::Result;
use baseline_lint::output::{OutputFormat, Renderer, count_warnings};
use baseline_lint::webstatus::WebstatusClient;

/// Stock filters used when `prefetch` is run without arguments.
const DEFAULT_PREFETCH_QUERIES: &[&str] = &[
    "-baseline_status:limited",
    "group:css AND -baseline_status:limited",
];

#[derive(Parser)]
#[command(name = "baseline-lint")]
#[command(author, version, about = "Baseline compatibility checker for CSS declarations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Path to baseline.toml (default: ./baseline.toml)
    #[arg(long, global = true, env = "BASELINE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the data directory from the config file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Allow live webstatus.dev lookups
    #[arg(long, global = true, env = "BASELINE_ALLOW_NETWORK")]
    network: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a CSS file for non-Baseline declarations
    Lint {
        /// CSS file to check
        file: PathBuf,
    },

    /// Resolve a single property/value declaration
    Check {
        /// CSS property name
        property: String,

        /// CSS value
        value: String,
    },

    /// Fetch webstatus results and write the offline cache
    Prefetch {
        /// Filter expressions (defaults to the stock CSS queries)
        queries: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default baseline.toml
    Init,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("baseline_lint=debug")
    } else {
        EnvFilter::new("baseline_lint=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = EngineConfig::load(&config_path).await?;

    if let Some(dir) = &cli.data_dir {
        config.data.dir = dir.clone();
    }
    if cli.network {
        config.network.enabled = true;
    }

    let renderer = Renderer::new(cli.output);

    match cli.command {
        Commands::Lint { file } => cmd_lint(&config, &renderer, &file).await,
        Commands::Check { property, value } => {
            cmd_check(&config, &renderer, &property, &value).await
        }
        Commands::Prefetch { queries } => cmd_prefetch(&config, queries).await,
        Commands::Config { action } => cmd_config(&config, &config_path, action).await,
    }
}

async fn cmd_lint(config: &EngineConfig, renderer: &Renderer, file: &PathBuf) -> Result<ExitCode> {
    let text = tokio::fs::read_to_string(file).await?;
    let declarations = extract_declarations(&text);

    let kb = KnowledgeBase::load(&config.data).await;
    let client = WebstatusClient::new(config.network.clone());
    let resolver = Resolver::new(&kb, &config.heuristic).with_client(&client);

    let mut verdicts = Vec::with_capacity(declarations.len());
    for decl in &declarations {
        verdicts.push(resolver.resolve_declaration(decl).await);
    }

    renderer.print_report(&verdicts)?;

    if count_warnings(&verdicts) > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

async fn cmd_check(
    config: &EngineConfig,
    renderer: &Renderer,
    property: &str,
    value: &str,
) -> Result<ExitCode> {
    let kb = KnowledgeBase::load(&config.data).await;
    let client = WebstatusClient::new(config.network.clone());
    let resolver = Resolver::new(&kb, &config.heuristic).with_client(&client);

    let decl = Declaration {
        property: property.to_string(),
        value: value.to_string(),
        line: 1,
    };
    let verdict = resolver.resolve_declaration(&decl).await;
    renderer.print_verdict(&verdict)?;

    Ok(ExitCode::SUCCESS)
}

async fn cmd_prefetch(config: &EngineConfig, queries: Vec<String>) -> Result<ExitCode> {
    let queries = if queries.is_empty() {
        DEFAULT_PREFETCH_QUERIES
            .iter()
            .map(|q| q.to_string())
            .collect()
    } else {
        queries
    };

    // Prefetching is pointless without the network; force it on.
    let mut network = config.network.clone();
    network.enabled = true;
    let client = WebstatusClient::new(network);

    let mut results = BTreeMap::new();
    for query in &queries {
        match client.query(query).await {
            Some(response) => {
                println!("Fetched {} features for '{}'", response.data.len(), query);
                results.insert(query.clone(), response);
            }
            None => {
                eprintln!(
                    "{} query failed after retries: '{}'",
                    style("warning:").yellow().bold(),
                    query
                );
            }
        }
    }

    if results.is_empty() {
        eprintln!("{} no query succeeded; cache not written", style("error:").red().bold());
        return Ok(ExitCode::FAILURE);
    }

    let path = config.data.webstatus_cache_path();
    write_webstatus_cache(&path, &results).await?;
    println!("Wrote {} cached queries to {}", results.len(), path.display());

    Ok(ExitCode::SUCCESS)
}

async fn cmd_config(
    config: &EngineConfig,
    config_path: &PathBuf,
    action: ConfigAction,
) -> Result<ExitCode> {
    match action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|e| baseline_lint::BaselineError::Config(e.to_string()))?;
            print!("{}", rendered);
        }
        ConfigAction::Init => {
            if config_path.exists() {
                println!("Configuration already exists: {}", config_path.display());
            } else {
                EngineConfig::default().save(config_path).await?;
                println!("Wrote {}", config_path.display());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
