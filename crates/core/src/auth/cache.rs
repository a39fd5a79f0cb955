use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::twitch::{TokenGrant, TokenSource};

/// Seconds subtracted from the provider lifetime before a token is considered expired.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Token persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedToken {
    /// Bearer token.
    pub access_token: String,
    /// Provider lifetime at issue time, kept for reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Provider token type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Absolute expiry as fractional unix seconds, margin already applied.
    pub expires_at: f64,
}

impl CachedToken {
    /// Stamp a fresh grant with its absolute expiry.
    pub fn from_grant(grant: TokenGrant, issued_at: DateTime<Utc>) -> Self {
        let expires_at =
            epoch_seconds(issued_at) + grant.expires_in as f64 - EXPIRY_MARGIN_SECS as f64;
        Self {
            access_token: grant.access_token,
            expires_in: Some(grant.expires_in),
            token_type: grant.token_type,
            expires_at,
        }
    }

    /// Whether the token may still be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        epoch_seconds(now) < self.expires_at
    }

    /// Expiry as a timestamp, for display.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt((self.expires_at * 1000.0) as i64)
            .single()
    }
}

/// JSON file holding at most one [`CachedToken`].
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Cache backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached token, returning `None` if the file does not exist.
    pub fn load(&self) -> Result<Option<CachedToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read token cache {}", self.path.display()))?;
        let token = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse token cache {}", self.path.display()))?;
        Ok(Some(token))
    }

    /// Overwrite the cache file, creating parent directories if needed.
    pub fn persist(&self, token: &CachedToken) -> Result<()> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let serialized =
            serde_json::to_string_pretty(token).context("failed to serialize token cache")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write token cache {}", self.path.display()))
    }

    /// Return a usable token, requesting and persisting a new one when needed.
    pub fn get_token(&self, source: &dyn TokenSource) -> Result<String> {
        self.get_token_at(source, Utc::now())
    }

    /// [`TokenCache::get_token`] with an explicit clock.
    pub fn get_token_at(&self, source: &dyn TokenSource, now: DateTime<Utc>) -> Result<String> {
        match self.load() {
            Ok(Some(cached)) if cached.is_valid_at(now) => {
                info!(
                    "Using cached OAuth token (expires {})",
                    cached
                        .expires_at_utc()
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| cached.expires_at.to_string())
                );
                return Ok(cached.access_token);
            }
            Ok(_) => {}
            Err(err) => warn!("Ignoring unusable token cache: {err:#}"),
        }

        info!("Requesting new OAuth token");
        let grant = source.request_token()?;
        let token = CachedToken::from_grant(grant, now);
        self.persist(&token)?;
        info!("New OAuth token cached in {}", self.path.display());
        Ok(token.access_token)
    }
}

fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use std::cell::Cell;
    use tempfile::tempdir;

    struct FakeSource {
        calls: Cell<usize>,
        reject: bool,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                reject: false,
            }
        }
    }

    impl TokenSource for FakeSource {
        fn request_token(&self) -> Result<TokenGrant, AuthError> {
            self.calls.set(self.calls.get() + 1);
            if self.reject {
                return Err(AuthError::Rejected(
                    r#"400 Bad Request: {"status":400,"message":"invalid client secret"}"#
                        .to_string(),
                ));
            }
            Ok(TokenGrant {
                access_token: "fresh-token".to_string(),
                expires_in: 5_000_000,
                token_type: Some("bearer".to_string()),
            })
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().expect("valid timestamp")
    }

    #[test]
    fn unexpired_cache_skips_provider() -> Result<()> {
        let dir = tempdir()?;
        let cache = TokenCache::new(dir.path().join("oauth_token.json"));
        cache.persist(&CachedToken {
            access_token: "cached-token".to_string(),
            expires_in: None,
            token_type: None,
            expires_at: 1_700_000_100.0,
        })?;

        let source = FakeSource::new();
        let token = cache.get_token_at(&source, at(1_700_000_000))?;
        assert_eq!(token, "cached-token");
        assert_eq!(source.calls.get(), 0);
        Ok(())
    }

    #[test]
    fn missing_cache_requests_once_and_persists() -> Result<()> {
        let dir = tempdir()?;
        let cache = TokenCache::new(dir.path().join("nested").join("oauth_token.json"));
        let source = FakeSource::new();

        let token = cache.get_token_at(&source, at(1_700_000_000))?;
        assert_eq!(token, "fresh-token");
        assert_eq!(source.calls.get(), 1);

        let stored = cache.load()?.expect("token persisted");
        assert_eq!(stored.access_token, "fresh-token");
        assert_eq!(stored.expires_at, 1_700_000_000.0 + 5_000_000.0 - 60.0);
        assert_eq!(stored.expires_in, Some(5_000_000));

        // A second call within the lifetime reuses the stored token.
        cache.get_token_at(&source, at(1_700_000_500))?;
        assert_eq!(source.calls.get(), 1);
        Ok(())
    }

    #[test]
    fn expired_cache_is_replaced() -> Result<()> {
        let dir = tempdir()?;
        let cache = TokenCache::new(dir.path().join("oauth_token.json"));
        cache.persist(&CachedToken {
            access_token: "stale".to_string(),
            expires_in: Some(60),
            token_type: None,
            expires_at: 1_700_000_000.0,
        })?;

        let source = FakeSource::new();
        let token = cache.get_token_at(&source, at(1_700_000_000))?;
        assert_eq!(token, "fresh-token");
        assert_eq!(source.calls.get(), 1);
        assert_eq!(cache.load()?.map(|t| t.access_token).as_deref(), Some("fresh-token"));
        Ok(())
    }

    #[test]
    fn reads_grant_shaped_cache_files() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("oauth_token.json");
        fs::write(
            &path,
            r#"{"access_token": "abc", "expires_in": 5184000, "token_type": "bearer", "expires_at": 1900000000.25}"#,
        )?;

        let cached = TokenCache::new(&path).load()?.expect("cache present");
        assert_eq!(cached.access_token, "abc");
        assert_eq!(cached.token_type.as_deref(), Some("bearer"));
        assert!(cached.is_valid_at(at(1_899_999_999)));
        assert!(!cached.is_valid_at(at(1_900_000_001)));
        Ok(())
    }

    #[test]
    fn corrupt_cache_falls_back_to_provider() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("oauth_token.json");
        fs::write(&path, "not json")?;

        let source = FakeSource::new();
        let token = TokenCache::new(&path).get_token_at(&source, at(1_700_000_000))?;
        assert_eq!(token, "fresh-token");
        assert_eq!(source.calls.get(), 1);
        Ok(())
    }

    #[test]
    fn rejected_grant_is_fatal_and_not_persisted() -> Result<()> {
        let dir = tempdir()?;
        let cache = TokenCache::new(dir.path().join("oauth_token.json"));
        let source = FakeSource {
            calls: Cell::new(0),
            reject: true,
        };

        let err = cache
            .get_token_at(&source, at(1_700_000_000))
            .expect_err("rejection must fail");
        assert!(format!("{err:#}").contains("invalid client secret"));
        assert_eq!(source.calls.get(), 1);
        assert!(!cache.path().exists());
        Ok(())
    }
}
