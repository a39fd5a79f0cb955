//! CSV output.

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::CsvRecord;

/// Serialize `records` as CSV, header first, into any writer.
pub fn write_csv<W: Write, R: CsvRecord>(writer: W, records: &[R]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(R::HEADERS)
        .context("failed to write CSV header")?;
    for record in records {
        csv.serialize(record).context("failed to write CSV row")?;
    }
    csv.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Overwrite `path` with the header and every record, creating parent directories.
pub fn write_records<R: CsvRecord>(path: &Path, records: &[R]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file =
        fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, records).with_context(|| format!("failed to write {}", path.display()))?;

    info!("Saved {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IgdbRecord, RawgRecord};
    use tempfile::tempdir;

    fn igdb_record(id: u64) -> IgdbRecord {
        IgdbRecord {
            id,
            name: Some(format!("Game {id}")),
            genres: "RPG, Action".to_string(),
            platforms: String::new(),
            first_release_date: Some(1_700_000_000),
            rating: Some(81.5),
            summary: Some("Line one\nline \"two\"".to_string()),
            cover_url: None,
            developers: String::new(),
            game_modes: String::new(),
            franchise: None,
            player_perspectives: String::new(),
            themes: String::new(),
            storyline: None,
            total_rating: None,
        }
    }

    #[test]
    fn header_is_written_without_rows() -> Result<()> {
        let mut buf = Vec::new();
        write_csv::<_, RawgRecord>(&mut buf, &[])?;
        assert_eq!(
            String::from_utf8(buf)?,
            "id,name,released,genres,platforms,developers,publishers,background_image,rating,description\n"
        );
        Ok(())
    }

    #[test]
    fn header_matches_serialized_field_order() -> Result<()> {
        let mut buf = Vec::new();
        csv::Writer::from_writer(&mut buf).serialize(igdb_record(1))?;
        let text = String::from_utf8(buf)?;
        let derived = text.lines().next().unwrap_or_default();
        assert_eq!(derived, IgdbRecord::HEADERS.join(","));
        Ok(())
    }

    #[test]
    fn rows_quote_and_leave_absent_values_empty() -> Result<()> {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[igdb_record(42)])?;
        let text = String::from_utf8(buf)?;
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "42");
        assert_eq!(&rows[0][2], "RPG, Action");
        assert_eq!(&rows[0][5], "81.5");
        assert_eq!(&rows[0][6], "Line one\nline \"two\"");
        assert_eq!(&rows[0][7], "");
        assert_eq!(&rows[0][14], "");
        Ok(())
    }

    #[test]
    fn rewrites_file_and_creates_directories() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data").join("games.csv");

        write_records(&path, &[igdb_record(1), igdb_record(2)])?;
        write_records(&path, &[igdb_record(3)])?;

        let mut reader = csv::Reader::from_path(&path)?;
        assert_eq!(reader.headers()?.len(), IgdbRecord::HEADERS.len());
        let names: Vec<String> = reader
            .records()
            .map(|row| row.map(|row| row[1].to_string()))
            .collect::<Result<_, _>>()?;
        assert_eq!(names, vec!["Game 3".to_string()]);
        Ok(())
    }
}
