use clap::{Parser, Subcommand};

mod config;
mod update;

#[derive(Debug, Parser)]
#[command(name = "geowatch")]
#[command(about = "Geophysical bulletin scraper and cache reconciler")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the bulletins, reconcile both caches, and write a run report.
    Update,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config()?;

    match cli.command {
        // Updating is the only job; no subcommand means update.
        Some(Commands::Update) | None => update::run(&config).await,
    }
}
