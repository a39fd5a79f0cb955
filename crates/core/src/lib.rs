#![warn(clippy::all, missing_docs)]

//! Core logic for gamefetch.
//!
//! This crate hosts configuration, the IGDB token cache, provider
//! clients, pagination, record flattening and CSV export used by the
//! command line entry points.

pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod pagination;
pub mod pipeline;
pub mod providers;

pub use config::{AppConfig, PersistMode};
pub use error::{AuthError, ConfigError, FetchError};
pub use models::{IgdbRecord, RawgRecord};
pub use pipeline::{fetch_igdb_games, fetch_rawg_games, run_all, RunSummary};
