//! Entry points shared by the `gamefetch`, `fetch-igdb` and `fetch-rawg` binaries.

use std::{
    fs::{self, OpenOptions},
    sync::Mutex,
};

use anyhow::Result;
use gamefetch_core::{fetch_igdb_games, fetch_rawg_games, run_all, AppConfig};
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Which pipelines a binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// IGDB, then RAWG.
    All,
    /// IGDB only.
    Igdb,
    /// RAWG only.
    Rawg,
}

/// Set up logging, load configuration and run `job`.
pub fn run(job: Job) -> Result<()> {
    init_logging()?;
    let config = AppConfig::load()?;

    let result = match job {
        Job::All => run_all(&config).map(|summary| {
            info!(
                "Wrote {} IGDB rows to {} and {} RAWG rows to {}",
                summary.igdb_records,
                config.igdb.output.display(),
                summary.rawg_records,
                config.rawg.output.display()
            );
        }),
        Job::Igdb => fetch_igdb_games(&config).map(|records| {
            info!("Total IGDB games fetched: {}", records.len());
        }),
        Job::Rawg => fetch_rawg_games(&config).map(|records| {
            info!(
                "RAWG data saved: {} rows in {}",
                records.len(),
                config.rawg.output.display()
            );
        }),
    };

    if let Err(err) = &result {
        error!("{err:#}");
    }
    result
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("gamefetch.log"))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
