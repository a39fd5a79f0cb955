use anyhow::{Context, Result};
use tracing::info;

use super::{collect_pages, OutputTarget};
use crate::{
    auth::{TokenCache, TwitchAuth},
    config::{AppConfig, IgdbSettings},
    models::IgdbRecord,
    pagination::{Delay, PageRange, Paginator},
    providers::{http_client, GamesQuery, IgdbApi, IgdbClient},
};

/// Authenticate, page through IGDB and write `igdb.output`.
pub fn fetch_igdb_games(config: &AppConfig) -> Result<Vec<IgdbRecord>> {
    let credentials = config.igdb_credentials()?;
    let http = http_client(&config.http)?;

    let auth = TwitchAuth::new(http.clone(), &config.igdb.auth_url, credentials.clone());
    let token = TokenCache::new(&config.igdb.token_cache)
        .get_token(&auth)
        .context("IGDB authentication failed")?;

    let api = IgdbClient::new(http, &config.igdb.api_url, credentials.client_id, token);
    collect_igdb(&api, &config.igdb, &Paginator::new(config.pacing()))
}

/// Page through `api` by offset and flatten every returned game.
pub fn collect_igdb<A, D>(
    api: &A,
    settings: &IgdbSettings,
    paginator: &Paginator<D>,
) -> Result<Vec<IgdbRecord>>
where
    A: IgdbApi + ?Sized,
    D: Delay,
{
    let pages = PageRange::offsets(settings.page_size, settings.max_records);
    let output = OutputTarget {
        path: &settings.output,
        persist: settings.persist,
    };

    collect_pages("IGDB", paginator, pages, output, |offset| {
        info!(
            "Fetching IGDB games {} - {}",
            offset,
            offset.saturating_add(settings.page_size)
        );
        let query = GamesQuery {
            limit: settings.page_size,
            offset,
        };
        let games = api.games(&query.to_string())?;
        Ok(games.into_iter().map(IgdbRecord::from).collect())
    })
}
