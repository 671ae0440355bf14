//! Warden - risk classification service for text, URLs, and files.
//!
//! Loads provider credentials from the environment (and `.env`), builds the
//! classification chains, and serves the HTTP API.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use directories::ProjectDirs;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use warden_core::WardenConfig;
use warden_server::{Server, ServerConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_HOST, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "warden", version, about)]
struct Args {
    /// Address to bind the API server to
    #[arg(long, env = "WARDEN_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to bind the API server to
    #[arg(long, env = "WARDEN_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Number of results kept for /history and /analytics
    #[arg(long, env = "WARDEN_HISTORY_CAPACITY", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Degrade text classification to the heuristic when the LLM fails
    #[arg(long)]
    text_fallback: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, env = "WARDEN_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Disable the rotating log file
    #[arg(long)]
    no_log_file: bool,
}

/// Returns the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "warden", "Warden").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize console logging plus an optional daily log file.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warden_app={0},warden_core={0},warden_server={0},tower_http={0},warn",
            log_level
        ))
    });

    if !args.no_log_file {
        if let Some(log_dir) = logs_dir() {
            if std::fs::create_dir_all(&log_dir).is_ok() {
                let file_appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .max_log_files(5)
                    .filename_prefix("warden")
                    .filename_suffix("log")
                    .build(&log_dir)
                    .ok();

                if let Some(appender) = file_appender {
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stdout))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();

                    tracing::info!("Logging to {:?}", log_dir);
                    return Some(guard);
                }
            }
        }
    }

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if !args.no_log_file {
        tracing::warn!("File logging unavailable, using console only");
    }
    None
}

/// Names the providers that have a credential, for the startup log.
fn configured_providers(config: &WardenConfig) -> Vec<&'static str> {
    [
        ("llm-text", config.text_llm.api_key().is_some()),
        ("virus-scan-url", config.virus_scan.api_key().is_some()),
        ("safe-browsing", config.safe_browsing.api_key().is_some()),
        ("llm-file", config.file_llm.api_key().is_some()),
        (
            "binary-scan",
            config.binary_scan.api_key().is_some() && config.binary_scan.api_secret().is_some(),
        ),
    ]
    .into_iter()
    .filter_map(|(name, ready)| ready.then_some(name))
    .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    let _log_guard = init_logging(&args);

    tracing::info!("Starting Warden v{}", env!("CARGO_PKG_VERSION"));
    if let Ok(path) = dotenv {
        tracing::info!("Loaded environment from {:?}", path);
    }

    let mut config = WardenConfig::from_env().context("invalid provider configuration")?;
    if args.text_fallback {
        config.text_fallback_on_failure = true;
    }

    let ready = configured_providers(&config);
    if ready.is_empty() {
        tracing::warn!("No provider credentials configured, only heuristics are available");
    } else {
        tracing::info!("Configured providers: {}", ready.join(", "));
    }
    tracing::debug!("Provider configuration: {:?}", config);

    let server_config = ServerConfig::default()
        .with_host(args.host.clone())
        .with_port(args.port)
        .with_history_capacity(args.history_capacity);

    let server = Server::new(server_config, &config).context("failed to create API server")?;
    tracing::info!("API server listening on http://{}", server.addr());

    server.run().await.context("API server error")?;
    Ok(())
}
