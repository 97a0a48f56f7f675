//! reflector - log query server for a home-automation host
//!
//! Serves the live event log and its dated history over HTTP, or runs a
//! single query from the command line.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reflector_logs::{QueryEngine, QueryKind};
use reflector_server::{ReflectorConfig, ReflectorServer};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "reflector")]
#[command(about = "Query a home-automation event log and its daily history")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Address to serve on
    #[arg(long, global = true, env = "REFLECTOR_BIND")]
    bind: Option<SocketAddr>,

    /// Live event log file
    #[arg(long, global = true, env = "REFLECTOR_LIVE_LOG")]
    live_log: Option<PathBuf>,

    /// Directory holding the dated history files
    #[arg(long, global = true, env = "REFLECTOR_HISTORY_DIR")]
    history_dir: Option<PathBuf>,

    /// Page size when a request omits `lines`
    #[arg(long, global = true, env = "REFLECTOR_DEFAULT_LINES")]
    default_lines: Option<usize>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server until interrupted
    Serve,

    /// Run one query and print the JSON result
    Query {
        /// One of: log, history, sources, dates
        kind: String,

        /// Parameters as key=value (e.g. lines=100 source=Z-Wave date=2026-02-15)
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Query { kind, params } => run_query(config, &kind, &params),
    }
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("reflector_server=info".parse()?)
        .add_directive("reflector_logs=info".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    Ok(())
}

/// Defaults, then the config file, then flags and environment.
fn load_config(cli: &Cli) -> anyhow::Result<ReflectorConfig> {
    let mut config = match &cli.config {
        Some(path) => ReflectorConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ReflectorConfig::default(),
    };

    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(live_log) = &cli.live_log {
        config.engine.paths.live_log.clone_from(live_log);
    }
    if let Some(history_dir) = &cli.history_dir {
        config.engine.paths.history_dir.clone_from(history_dir);
    }
    if let Some(lines) = cli.default_lines {
        config.engine.limits.default_lines = lines;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn serve(config: ReflectorConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr;
    let server = ReflectorServer::new(config)?;

    server
        .serve_with_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown requested");
        })
        .await?;

    Ok(())
}

fn run_query(config: ReflectorConfig, kind: &str, pairs: &[String]) -> anyhow::Result<ExitCode> {
    let kind: QueryKind = kind.parse()?;
    let params = parse_params(pairs)?;

    let engine = QueryEngine::new(config.engine)?;
    let response = engine.handle(kind, &params);

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn parse_params(pairs: &[String]) -> anyhow::Result<HashMap<String, String>> {
    let mut params = HashMap::with_capacity(pairs.len());
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected key=value, got {pair:?}");
        };
        params.insert(key.to_string(), value.to_string());
    }
    Ok(params)
}
