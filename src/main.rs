use std::path::PathBuf;

use clap::Parser;
use fiber_workflow::api::{create_router, AppState};
use fiber_workflow::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser, Debug)]
#[command(
    name = "fiber-workflow",
    about = "Serve the fiber construction workflow and billing rules over HTTP",
    version
)]
struct Cli {
    /// Directory holding workflow.yaml, evidence.yaml and rate_cards/
    #[arg(long, default_value = "./config/default")]
    config: PathBuf,
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) -> Result<(), BoxError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init()
}

async fn run(cli: Cli) -> Result<(), BoxError> {
    init_tracing(&cli.log_level)?;

    let config = ConfigLoader::load(&cli.config)?;
    info!(
        config = %cli.config.display(),
        rate_cards = ?config.config().rate_cards().ids(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!(bind = %cli.bind, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Cli::parse()).await {
        eprintln!("fiber-workflow error: {err}");
        std::process::exit(1);
    }
}
