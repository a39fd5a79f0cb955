//! Twitch OAuth tokens for the IGDB API.

/// On-disk token cache.
pub mod cache;
/// Client-credentials grant against the Twitch token endpoint.
pub mod twitch;

pub use cache::{CachedToken, TokenCache, EXPIRY_MARGIN_SECS};
pub use twitch::{TokenGrant, TokenSource, TwitchAuth};
