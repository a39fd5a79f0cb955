use std::fmt;

use reqwest::{blocking::Client, header::ACCEPT};

use super::send_json;
use crate::{error::FetchError, models::IgdbGame};

/// Fields requested for every game; nested names are expanded server side.
pub const GAME_FIELDS: &str = "id, name, genres.name, platforms.name, first_release_date, rating, \
summary, cover.url, involved_companies.company.name, game_modes.name, franchise.name, \
player_perspectives.name, themes.name, storyline, total_rating";

/// Capability to run an Apicalypse query against the `games` endpoint.
pub trait IgdbApi {
    /// Execute `query` and decode the returned array.
    fn games(&self, query: &str) -> Result<Vec<IgdbGame>, FetchError>;
}

/// One page of released games, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamesQuery {
    /// Maximum number of results.
    pub limit: u32,
    /// Number of results to skip.
    pub offset: u32,
}

impl fmt::Display for GamesQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fields {GAME_FIELDS};")?;
        writeln!(f, "where first_release_date != null;")?;
        writeln!(f, "sort first_release_date desc;")?;
        writeln!(f, "limit {};", self.limit)?;
        write!(f, "offset {};", self.offset)
    }
}

/// Authenticated client for `POST {api_url}/games`.
pub struct IgdbClient {
    http: Client,
    endpoint: String,
    client_id: String,
    access_token: String,
}

impl IgdbClient {
    /// Client bound to one Twitch client id and bearer token.
    pub fn new(
        http: Client,
        api_url: &str,
        client_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: format!("{}/games", api_url.trim_end_matches('/')),
            client_id: client_id.into(),
            access_token: access_token.into(),
        }
    }
}

impl IgdbApi for IgdbClient {
    fn games(&self, query: &str) -> Result<Vec<IgdbGame>, FetchError> {
        let request = self
            .http
            .post(&self.endpoint)
            .header("Client-ID", &self.client_id)
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.access_token)
            .body(query.to_string());
        send_json(&self.endpoint, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::decode_json;

    #[test]
    fn query_carries_filter_sort_and_window() {
        let query = GamesQuery {
            limit: 500,
            offset: 1_500,
        }
        .to_string();

        assert!(query.starts_with("fields id, name, genres.name, platforms.name,"));
        assert!(query.contains("involved_companies.company.name"));
        assert!(query.contains("where first_release_date != null;"));
        assert!(query.contains("sort first_release_date desc;"));
        assert!(query.contains("limit 500;"));
        assert!(query.ends_with("offset 1500;"));
    }

    #[test]
    fn error_payloads_do_not_decode_as_games() {
        let body = r#"{"title": "Syntax Error", "status": 400, "cause": "Expecting a STRING"}"#;
        let result: Result<Vec<IgdbGame>, _> = decode_json("https://api.igdb.com/v4/games", body);
        assert!(matches!(result, Err(FetchError::Decode { .. })));
    }
}
