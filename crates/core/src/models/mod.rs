//! Provider payloads and the flat records written to CSV.

pub mod igdb;
pub mod rawg;

use serde::{Deserialize, Serialize};

pub use igdb::{IgdbGame, IgdbRecord};
pub use rawg::{RawgGame, RawgPage, RawgRecord};

/// Separator used when flattening nested collections into one column.
pub const LIST_SEPARATOR: &str = ", ";

/// A nested object that only matters for its `name`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Named {
    /// Display name.
    pub name: String,
}

/// A flat row with a fixed column order.
///
/// `HEADERS` must list the serialized field names in declaration order.
pub trait CsvRecord: Serialize {
    /// Column names, in output order.
    const HEADERS: &'static [&'static str];
}

/// Join names with [`LIST_SEPARATOR`]; an empty input yields an empty string.
pub fn join_names<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().collect::<Vec<_>>().join(LIST_SEPARATOR)
}

/// Flatten an optional list of [`Named`] entries.
pub fn join_named(items: Option<&[Named]>) -> String {
    join_names(items.unwrap_or_default().iter().map(|item| item.name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Named {
        Named {
            name: name.to_string(),
        }
    }

    #[test]
    fn joins_with_comma_space() {
        let genres = vec![named("RPG"), named("Action")];
        assert_eq!(join_named(Some(&genres)), "RPG, Action");
    }

    #[test]
    fn empty_and_absent_lists_flatten_to_empty() {
        assert_eq!(join_named(Some(&[])), "");
        assert_eq!(join_named(None), "");
    }
}
