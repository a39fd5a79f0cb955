use anyhow::Result;
use tracing::{info, warn};

use super::{collect_pages, OutputTarget};
use crate::{
    config::{AppConfig, RawgSettings},
    models::{RawgGame, RawgRecord},
    pagination::{Delay, PageRange, Paginator},
    providers::{
        http_client, wikipedia::first_sentence, CachedLookup, RawgApi, RawgClient, SummaryLookup,
        WikipediaClient,
    },
};

/// Description used when neither RAWG nor the encyclopedia has one.
pub const MISSING_SUMMARY: &str = "No summary available";

/// Page through RAWG, fill missing descriptions and write `rawg.output`.
pub fn fetch_rawg_games(config: &AppConfig) -> Result<Vec<RawgRecord>> {
    let api_key = config.rawg_key()?;
    let http = http_client(&config.http)?;

    let api = RawgClient::new(http.clone(), &config.rawg.api_url, api_key);
    let wikipedia = WikipediaClient::new(http, config.wikipedia.endpoint());
    let paginator = Paginator::new(config.pacing());

    if config.wikipedia.cache_lookups {
        collect_rawg(&api, &CachedLookup::new(wikipedia), &config.rawg, &paginator)
    } else {
        collect_rawg(&api, &wikipedia, &config.rawg, &paginator)
    }
}

/// Page through `api` by page number, flattening and enriching each game.
pub fn collect_rawg<A, D>(
    api: &A,
    lookup: &dyn SummaryLookup,
    settings: &RawgSettings,
    paginator: &Paginator<D>,
) -> Result<Vec<RawgRecord>>
where
    A: RawgApi + ?Sized,
    D: Delay,
{
    let pages = PageRange::pages(settings.max_pages);
    let output = OutputTarget {
        path: &settings.output,
        persist: settings.persist,
    };

    collect_pages("RAWG", paginator, pages, output, |page| {
        info!("Fetching RAWG games, page {page}");
        let body = api.games_page(page, settings.page_size)?;
        Ok(body
            .results
            .into_iter()
            .map(|game| {
                let description = describe(&game, lookup);
                game.into_record(description)
            })
            .collect())
    })
}

/// RAWG's own description, else the first sentence of the encyclopedia summary,
/// else [`MISSING_SUMMARY`].
pub fn describe(game: &RawgGame, lookup: &dyn SummaryLookup) -> String {
    if let Some(own) = game.own_description() {
        return own.to_string();
    }
    let Some(name) = game.name.as_deref() else {
        return MISSING_SUMMARY.to_string();
    };

    match lookup.summary(name) {
        Ok(Some(summary)) => first_sentence(&summary),
        Ok(None) => MISSING_SUMMARY.to_string(),
        Err(err) => {
            warn!("Summary lookup for {name:?} failed: {err}");
            MISSING_SUMMARY.to_string()
        }
    }
}
