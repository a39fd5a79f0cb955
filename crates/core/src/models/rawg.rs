#![allow(missing_docs)]

//! RAWG `games` list payloads and their flattened CSV form.

use serde::{Deserialize, Serialize};

use super::{join_named, join_names, CsvRecord, Named};

/// Body of `GET /api/games`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawgPage {
    pub count: Option<u64>,
    pub next: Option<String>,
    pub results: Vec<RawgGame>,
}

/// One entry of `results`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawgGame {
    pub id: Option<u64>,
    pub name: Option<String>,
    /// `YYYY-MM-DD`, kept verbatim.
    pub released: Option<String>,
    pub genres: Option<Vec<Named>>,
    pub platforms: Option<Vec<PlatformEntry>>,
    pub developers: Option<Vec<Named>>,
    pub publishers: Option<Vec<Named>>,
    pub background_image: Option<String>,
    pub rating: Option<f64>,
    pub description: Option<String>,
}

/// RAWG wraps each platform one level deeper than IGDB.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformEntry {
    pub platform: Named,
}

impl RawgGame {
    /// The provider's own description, if it carries any text.
    pub fn own_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|description| !description.is_empty())
    }

    /// Flatten into a CSV row using an already resolved description.
    pub fn into_record(self, description: String) -> RawgRecord {
        RawgRecord {
            id: self.id,
            released: self.released,
            genres: join_named(self.genres.as_deref()),
            platforms: join_names(
                self.platforms
                    .iter()
                    .flatten()
                    .map(|entry| entry.platform.name.as_str()),
            ),
            developers: join_named(self.developers.as_deref()),
            publishers: join_named(self.publishers.as_deref()),
            background_image: self.background_image,
            rating: self.rating,
            name: self.name,
            description,
        }
    }
}

/// Flat row written to the RAWG CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawgRecord {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub released: Option<String>,
    pub genres: String,
    pub platforms: String,
    pub developers: String,
    pub publishers: String,
    pub background_image: Option<String>,
    pub rating: Option<f64>,
    pub description: String,
}

impl CsvRecord for RawgRecord {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "released",
        "genres",
        "platforms",
        "developers",
        "publishers",
        "background_image",
        "rating",
        "description",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn platforms_are_read_one_level_deeper() -> anyhow::Result<()> {
        let page: RawgPage = serde_json::from_value(json!({
            "count": 1,
            "next": "https://api.rawg.io/api/games?page=2",
            "results": [{
                "id": 3498,
                "name": "Grand Theft Auto V",
                "released": "2013-09-17",
                "background_image": "https://media.rawg.io/media/games/gtav.jpg",
                "rating": 4.47,
                "genres": [{"id": 4, "name": "Action"}],
                "platforms": [
                    {"platform": {"id": 187, "name": "PlayStation 5"}, "released_at": "2013-09-17"},
                    {"platform": {"id": 4, "name": "PC"}}
                ]
            }]
        }))?;

        let game = page.results.into_iter().next().expect("one result");
        assert_eq!(game.own_description(), None);
        let record = game.into_record("placeholder".to_string());
        assert_eq!(record.platforms, "PlayStation 5, PC");
        assert_eq!(record.genres, "Action");
        assert_eq!(record.released.as_deref(), Some("2013-09-17"));
        assert_eq!(record.developers, "");
        assert_eq!(record.publishers, "");
        assert_eq!(record.description, "placeholder");
        Ok(())
    }

    #[test]
    fn null_and_empty_companies_flatten_to_empty() -> anyhow::Result<()> {
        let game: RawgGame = serde_json::from_value(json!({
            "id": 1,
            "name": "Sample",
            "developers": null,
            "publishers": [],
            "description": ""
        }))?;
        assert_eq!(game.own_description(), None);
        let record = game.into_record(String::new());
        assert_eq!(record.developers, "");
        assert_eq!(record.publishers, "");
        Ok(())
    }

    #[test]
    fn keeps_present_companies() -> anyhow::Result<()> {
        let game: RawgGame = serde_json::from_value(json!({
            "id": 2,
            "name": "Portal 2",
            "developers": [{"name": "Valve Software"}],
            "publishers": [{"name": "Valve"}, {"name": "Electronic Arts"}],
            "description": "<p>Sequel.</p>"
        }))?;
        assert_eq!(game.own_description(), Some("<p>Sequel.</p>"));
        let record = game.into_record("<p>Sequel.</p>".to_string());
        assert_eq!(record.developers, "Valve Software");
        assert_eq!(record.publishers, "Valve, Electronic Arts");
        Ok(())
    }
}
