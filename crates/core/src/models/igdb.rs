//! IGDB `games` payloads and their flattened CSV form.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use super::{join_named, join_names, CsvRecord, Named};

/// One element of the JSON array returned by `POST /games`.
#[derive(Debug, Clone, Deserialize)]
pub struct IgdbGame {
    pub id: u64,
    pub name: Option<String>,
    pub genres: Option<Vec<Named>>,
    pub platforms: Option<Vec<Named>>,
    /// Unix timestamp (seconds).
    pub first_release_date: Option<i64>,
    pub rating: Option<f64>,
    pub summary: Option<String>,
    pub cover: Option<Cover>,
    pub involved_companies: Option<Vec<InvolvedCompany>>,
    pub game_modes: Option<Vec<Named>>,
    pub franchise: Option<Named>,
    pub player_perspectives: Option<Vec<Named>>,
    pub themes: Option<Vec<Named>>,
    pub storyline: Option<String>,
    pub total_rating: Option<f64>,
}

/// Expanded `cover` reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Cover {
    pub url: Option<String>,
}

/// Expanded `involved_companies` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct InvolvedCompany {
    pub company: Named,
}

/// Flat row written to the IGDB CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IgdbRecord {
    pub id: u64,
    pub name: Option<String>,
    pub genres: String,
    pub platforms: String,
    pub first_release_date: Option<i64>,
    pub rating: Option<f64>,
    pub summary: Option<String>,
    pub cover_url: Option<String>,
    pub developers: String,
    pub game_modes: String,
    pub franchise: Option<String>,
    pub player_perspectives: String,
    pub themes: String,
    pub storyline: Option<String>,
    pub total_rating: Option<f64>,
}

impl CsvRecord for IgdbRecord {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "genres",
        "platforms",
        "first_release_date",
        "rating",
        "summary",
        "cover_url",
        "developers",
        "game_modes",
        "franchise",
        "player_perspectives",
        "themes",
        "storyline",
        "total_rating",
    ];
}

impl From<IgdbGame> for IgdbRecord {
    fn from(game: IgdbGame) -> Self {
        let developers = join_names(
            game.involved_companies
                .iter()
                .flatten()
                .map(|involved| involved.company.name.as_str()),
        );

        Self {
            id: game.id,
            genres: join_named(game.genres.as_deref()),
            platforms: join_named(game.platforms.as_deref()),
            first_release_date: game.first_release_date,
            rating: game.rating,
            cover_url: game.cover.and_then(|cover| cover.url),
            developers,
            game_modes: join_named(game.game_modes.as_deref()),
            franchise: game.franchise.map(|franchise| franchise.name),
            player_perspectives: join_named(game.player_perspectives.as_deref()),
            themes: join_named(game.themes.as_deref()),
            name: game.name,
            summary: game.summary,
            storyline: game.storyline,
            total_rating: game.total_rating,
        }
    }
}
