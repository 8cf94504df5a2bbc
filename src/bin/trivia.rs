use anyhow::Context;
use clap::Parser;
use trivia_api::config::Config;
use trivia_api::db::{self, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(default_value = "serve")]
    runner: Runner,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Runner {
    /// Apply migrations (unless disabled) and serve the API
    Serve,
    /// Apply migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);
    let cli = Cli::parse();
    let pool = db::establish_connection(&config.database)
        .await
        .with_context(|| format!("Cannot connect to {}", config.database.url))?;

    match cli.runner {
        Runner::Serve => {
            if config.database.migrate {
                tracing::info!("Running db migrations...");
                run_migrations(&pool).await?;
            }
            run_server(pool, &config.server).await?
        }
        Runner::Migrate => {
            tracing::info!("Running db migrations...");
            run_migrations(&pool).await?
        }
    };
    Ok(())
}
