use anyhow::Context;
use clap::Parser;
use github_issue_summarizer::{
    api::{self, AppState},
    config::{get_env_value, Config, SummarizeMode},
    logging,
    tools::ToolDispatcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Serves GitHub issue summarization tools over HTTP",
    long_about = None
)]
struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML configuration file (falls back to SUMMARIZER_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Which summarizeIssues variant to serve
    #[arg(long, value_enum)]
    summarize_mode: Option<SummarizeMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let config_path = cli
        .config
        .clone()
        .or_else(|| get_env_value("SUMMARIZER_CONFIG").map(PathBuf::from));
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(mode) = cli.summarize_mode {
        config.summarize_mode = mode;
    }
    config.validate()?;

    let dispatcher = Arc::new(ToolDispatcher::from_config(&config)?);
    let sweeper = dispatcher
        .cache()
        .spawn_sweeper(config.cache_sweep_interval());

    let app = api::create_app(AppState::new(dispatcher));
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(
        "Serving {} tools on http://{}/api (cache ttl {}s)",
        config.summarize_mode, address, config.cache_ttl_secs
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
