//! HTTP clients for the metadata providers.

/// IGDB `games` endpoint.
pub mod igdb;
/// RAWG games list endpoint.
pub mod rawg;
/// Wikipedia summaries used to fill missing descriptions.
pub mod wikipedia;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{config::HttpSettings, error::FetchError};

pub use igdb::{GamesQuery, IgdbApi, IgdbClient};
pub use rawg::{RawgApi, RawgClient};
pub use wikipedia::{CachedLookup, SummaryLookup, WikipediaClient};

/// Build the blocking client shared by every provider.
pub fn http_client(settings: &HttpSettings) -> Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("failed to build HTTP client")
}

/// Send `request` and decode a JSON body, mapping every failure onto [`FetchError`].
pub(crate) fn send_json<T: DeserializeOwned>(
    url: &str,
    request: RequestBuilder,
) -> Result<T, FetchError> {
    let response = request.send().map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;
    let status = response.status();
    let body = response.text().map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    decode_json(url, &body)
}

pub(crate) fn decode_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })
}
