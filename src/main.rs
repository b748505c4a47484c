//! grammophon-import - one-shot migration of the legacy YAML music archive
//! into a pair of Notion databases (playlists, works).
//!
//! The run is sequential and rate-limited; it either completes or aborts on
//! the first error. It is not idempotent: re-running creates duplicate
//! remote records.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grammophon_import::archive::Archive;
use grammophon_import::config::Args;
use grammophon_import::migrate::{MigrationSummary, Migrator};
use grammophon_import::notion::NotionClient;
use grammophon_import::rate_limit::RateLimiter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grammophon_import=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting grammophon-import v{}", env!("CARGO_PKG_VERSION"));
    info!("Archive: {}", args.archive.display());

    match run(args).await {
        Ok(summary) => {
            info!(
                playlists = summary.playlists,
                works = summary.works,
                "Migration complete"
            );
            Ok(())
        }
        Err(e) if e.is_api_error() => {
            error!("Notion error: {}", e);
            Err(e.into())
        }
        Err(e) => {
            error!("General error: {}", e);
            Err(e.into())
        }
    }
}

async fn run(args: Args) -> grammophon_import::Result<MigrationSummary> {
    let archive = Archive::load(&args.archive)?;
    info!(years = archive.year_count(), "Archive loaded and validated");

    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(args.interval_ms)));
    let client = NotionClient::new(
        args.notion_key,
        args.playlists_db_id,
        args.works_db_id,
        limiter,
    )?;

    Migrator::new(client).run(&archive).await
}
