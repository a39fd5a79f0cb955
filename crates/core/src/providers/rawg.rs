use reqwest::blocking::Client;

use super::send_json;
use crate::{error::FetchError, models::RawgPage};

/// Capability to list one page of RAWG games.
pub trait RawgApi {
    /// Fetch page `page` (one-based) of `page_size` games.
    fn games_page(&self, page: u32, page_size: u32) -> Result<RawgPage, FetchError>;
}

/// Client for `GET {api_url}?key=..&page=..&page_size=..`.
pub struct RawgClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl RawgClient {
    /// Client bound to one API key.
    pub fn new(http: Client, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl RawgApi for RawgClient {
    fn games_page(&self, page: u32, page_size: u32) -> Result<RawgPage, FetchError> {
        let request = self.http.get(&self.endpoint).query(&[
            ("key", self.api_key.clone()),
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ]);
        // The endpoint is reported without the query so the key stays out of logs.
        send_json(&self.endpoint, request)
    }
}
