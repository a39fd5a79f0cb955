use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::IgdbCredentials,
    error::{AuthError, FetchError},
    providers::decode_json,
};

/// Successful response of the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    /// Bearer token.
    pub access_token: String,
    /// Lifetime in seconds, as declared by the provider.
    pub expires_in: u64,
    /// Usually `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Something that can issue a fresh access token.
pub trait TokenSource {
    /// Perform one grant request.
    fn request_token(&self) -> Result<TokenGrant, AuthError>;
}

/// Client-credentials grant against `id.twitch.tv`.
pub struct TwitchAuth {
    http: Client,
    auth_url: String,
    credentials: IgdbCredentials,
}

impl TwitchAuth {
    /// Build a token source for the given endpoint and credentials.
    pub fn new(http: Client, auth_url: impl Into<String>, credentials: IgdbCredentials) -> Self {
        Self {
            http,
            auth_url: auth_url.into(),
            credentials,
        }
    }
}

impl TokenSource for TwitchAuth {
    fn request_token(&self) -> Result<TokenGrant, AuthError> {
        let url = self.auth_url.as_str();
        let response = self
            .http
            .post(url)
            .query(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(AuthError::Rejected(format!("{status}: {body}")));
        }

        Ok(decode_json(url, &body)?)
    }
}
