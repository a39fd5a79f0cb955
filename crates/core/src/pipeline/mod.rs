//! Fetch-and-flatten pipelines and the orchestrator running them.

/// IGDB pipeline.
pub mod igdb;
/// RAWG pipeline.
pub mod rawg;

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::{
    config::{AppConfig, PersistMode},
    export,
    models::CsvRecord,
    pagination::{Delay, PageRange, Paginator},
};

pub use igdb::{collect_igdb, fetch_igdb_games};
pub use rawg::{collect_rawg, describe, fetch_rawg_games, MISSING_SUMMARY};

/// Record counts produced by [`run_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows written to the IGDB CSV.
    pub igdb_records: usize,
    /// Rows written to the RAWG CSV.
    pub rawg_records: usize,
}

/// Run the IGDB pipeline, then the RAWG pipeline. The first fatal error stops the run.
pub fn run_all(config: &AppConfig) -> Result<RunSummary> {
    info!("Starting IGDB fetch");
    let igdb = fetch_igdb_games(config)?;

    info!("Starting RAWG fetch");
    let rawg = fetch_rawg_games(config)?;

    info!("Data collection complete");
    Ok(RunSummary {
        igdb_records: igdb.len(),
        rawg_records: rawg.len(),
    })
}

/// Where and when a pipeline writes its CSV.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OutputTarget<'a> {
    pub path: &'a Path,
    pub persist: PersistMode,
}

/// Drive `fetch_page` over `pages`, accumulating records and writing them out.
///
/// With [`PersistMode::Incremental`] a failed write counts as a failed page;
/// the single write of [`PersistMode::OnCompletion`] is fatal.
pub(crate) fn collect_pages<R, D, F>(
    label: &str,
    paginator: &Paginator<D>,
    pages: PageRange,
    output: OutputTarget<'_>,
    mut fetch_page: F,
) -> Result<Vec<R>>
where
    R: CsvRecord,
    D: Delay,
    F: FnMut(u32) -> Result<Vec<R>>,
{
    let mut records: Vec<R> = Vec::new();

    let report = paginator.run(label, pages, |cursor| {
        let page = fetch_page(cursor)?;
        records.extend(page);
        if output.persist == PersistMode::Incremental {
            export::write_records(output.path, &records)?;
        }
        Ok(())
    });

    if output.persist == PersistMode::OnCompletion {
        export::write_records(output.path, &records)?;
    }

    info!(
        "{label}: {} of {} pages fetched ({} skipped), {} records total",
        report.succeeded,
        report.requested,
        report.failed,
        records.len()
    );
    Ok(records)
}
