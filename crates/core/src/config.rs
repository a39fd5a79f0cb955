//! Layered application configuration.
//!
//! Values are resolved from built-in defaults, optional `config.toml` /
//! `gamefetch.toml` files, a local `.env` file, `GAMEFETCH_*` overrides and
//! finally the provider credential variables.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::{error::ConfigError, pagination::Pacing};

/// Directory under the user's config dir that may hold `config.toml`.
pub const CONFIG_DIR_NAME: &str = "gamefetch";

/// Environment variable holding the Twitch client id used for IGDB.
pub const TWITCH_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
/// Environment variable holding the Twitch client secret used for IGDB.
pub const TWITCH_CLIENT_SECRET: &str = "TWITCH_CLIENT_SECRET";
/// Environment variable holding the RAWG API key.
pub const RAWG_API_KEY: &str = "RAWG_API_KEY";

/// How a pipeline writes its CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Rewrite the whole file after every successful page.
    Incremental,
    /// Write the file once after the last page.
    OnCompletion,
}

/// Top-level configuration shared by every pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Twitch client id for the IGDB API.
    #[serde(alias = "TWITCH_CLIENT_ID")]
    pub twitch_client_id: Option<String>,
    /// Twitch client secret for the IGDB API.
    #[serde(alias = "TWITCH_CLIENT_SECRET")]
    pub twitch_client_secret: Option<String>,
    /// RAWG API key.
    #[serde(alias = "RAWG_API_KEY")]
    pub rawg_api_key: Option<String>,
    /// Shared HTTP client settings.
    pub http: HttpSettings,
    /// Delays applied between pages.
    pub pacing: PacingSettings,
    /// IGDB pipeline settings.
    pub igdb: IgdbSettings,
    /// RAWG pipeline settings.
    pub rawg: RawgSettings,
    /// Encyclopedia fallback settings.
    pub wikipedia: WikipediaSettings,
}

/// HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Pacing between pages, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    /// Wait after a page was fetched.
    pub success_delay_ms: u64,
    /// Wait after a page failed.
    pub failure_delay_ms: u64,
}

/// IGDB pipeline settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IgdbSettings {
    /// Twitch OAuth token endpoint.
    pub auth_url: String,
    /// IGDB API base URL (without the `/games` endpoint).
    pub api_url: String,
    /// Where the OAuth token is cached between runs.
    pub token_cache: PathBuf,
    /// CSV output path.
    pub output: PathBuf,
    /// CSV persistence strategy.
    pub persist: PersistMode,
    /// Records requested per query.
    pub page_size: u32,
    /// Offsets are requested while below this value.
    pub max_records: u32,
}

/// RAWG pipeline settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawgSettings {
    /// RAWG games list endpoint.
    pub api_url: String,
    /// CSV output path.
    pub output: PathBuf,
    /// CSV persistence strategy.
    pub persist: PersistMode,
    /// Records requested per page.
    pub page_size: u32,
    /// Last page requested (pages start at 1).
    pub max_pages: u32,
}

/// Encyclopedia lookup settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikipediaSettings {
    /// Language edition, e.g. `en`.
    pub language: String,
    /// Full API endpoint; derived from `language` when unset.
    pub api_url: Option<String>,
    /// Remember summaries by title for the rest of the run.
    pub cache_lookups: bool,
}

/// Client id and secret for the Twitch client-credentials grant.
#[derive(Debug, Clone)]
pub struct IgdbCredentials {
    /// Twitch client id.
    pub client_id: String,
    /// Twitch client secret.
    pub client_secret: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("gamefetch/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
        }
    }
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            success_delay_ms: 1_500,
            failure_delay_ms: 5_000,
        }
    }
}

impl Default for IgdbSettings {
    fn default() -> Self {
        Self {
            auth_url: "https://id.twitch.tv/oauth2/token".to_string(),
            api_url: "https://api.igdb.com/v4".to_string(),
            token_cache: PathBuf::from("oauth_token.json"),
            output: PathBuf::from("data/latest_game_data.csv"),
            persist: PersistMode::Incremental,
            page_size: 500,
            max_records: 5_000,
        }
    }
}

impl Default for RawgSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.rawg.io/api/games".to_string(),
            output: PathBuf::from("data/rawg_game_data.csv"),
            persist: PersistMode::OnCompletion,
            page_size: 40,
            max_pages: 10,
        }
    }
}

impl Default for WikipediaSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            api_url: None,
            cache_lookups: false,
        }
    }
}

impl AppConfig {
    /// Load configuration relative to the current working directory.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to resolve working directory")?;
        Self::load_from(&cwd)
    }

    /// Load configuration, looking for `gamefetch.toml` and `.env` in `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(user_config) = user_config_path() {
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder
            .add_source(File::from(dir.join("gamefetch.toml")).required(false))
            .add_source(
                File::new(&dir.join(".env").to_string_lossy(), FileFormat::Ini).required(false),
            )
            .add_source(
                Environment::with_prefix("GAMEFETCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to parse configuration")?;
        config.apply_credential_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML document layered over the defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Credentials for the IGDB pipeline.
    pub fn igdb_credentials(&self) -> Result<IgdbCredentials, ConfigError> {
        Ok(IgdbCredentials {
            client_id: required(&self.twitch_client_id, TWITCH_CLIENT_ID)?,
            client_secret: required(&self.twitch_client_secret, TWITCH_CLIENT_SECRET)?,
        })
    }

    /// API key for the RAWG pipeline.
    pub fn rawg_key(&self) -> Result<String, ConfigError> {
        required(&self.rawg_api_key, RAWG_API_KEY)
    }

    /// Pacing used by both paginators.
    pub fn pacing(&self) -> Pacing {
        Pacing {
            after_success: Duration::from_millis(self.pacing.success_delay_ms),
            after_failure: Duration::from_millis(self.pacing.failure_delay_ms),
        }
    }

    /// The process environment wins over `.env` for credentials.
    fn apply_credential_env(&mut self) {
        for (var, slot) in [
            (TWITCH_CLIENT_ID, &mut self.twitch_client_id),
            (TWITCH_CLIENT_SECRET, &mut self.twitch_client_secret),
            (RAWG_API_KEY, &mut self.rawg_api_key),
        ] {
            if let Some(value) = std::env::var(var).ok().filter(|value| !value.trim().is_empty()) {
                *slot = Some(value);
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.igdb.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "igdb.page_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.igdb.page_size > 500 {
            return Err(ConfigError::Invalid {
                key: "igdb.page_size",
                reason: format!("IGDB allows at most 500 per query, got {}", self.igdb.page_size),
            });
        }
        if self.rawg.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "rawg.page_size",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl WikipediaSettings {
    /// Endpoint of the MediaWiki action API for the configured language.
    pub fn endpoint(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.wikipedia.org/w/api.php", self.language))
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::MissingCredential(name))
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
}
