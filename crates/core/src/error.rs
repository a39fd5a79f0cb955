//! Typed errors surfaced by provider clients and configuration.

use thiserror::Error;

/// Failure while talking to a remote provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        /// Endpoint that was being called.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },
    /// The provider answered with a non-success status.
    #[error("{url} returned status {status}: {body}")]
    Status {
        /// Endpoint that was being called.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body, usually the provider's error payload.
        body: String,
    },
    /// The body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Endpoint that was being called.
        url: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while obtaining an OAuth access token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint rejected the client-credentials grant.
    #[error("failed to obtain access token: {0}")]
    Rejected(String),
    /// The token endpoint could not be reached or decoded.
    #[error("failed to obtain access token")]
    Request(#[from] FetchError),
}

/// Failure while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A credential required by the pipeline is not set.
    #[error("missing credential {0}; set it in the environment or in .env")]
    MissingCredential(&'static str),
    /// A numeric setting is outside its usable range.
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Dotted configuration key.
        key: &'static str,
        /// Human readable explanation.
        reason: String,
    },
}
