//! CSV sidecar parsing
//!
//! A sidecar is a CSV file inside a group that supplies rename metadata.
//! Headers are normalized with `_` so lookups use stable snake_case names
//! regardless of how the spreadsheet was exported; every cell is read as a
//! trimmed string.

use std::collections::HashMap;

use thiserror::Error;

use crate::normalize::normalize;

/// Extension identifying the sidecar within a group listing
pub const SIDECAR_EXTENSION: &str = ".csv";

/// Errors raised while reading a sidecar
#[derive(Debug, Error)]
pub enum SidecarError {
    /// The CSV payload could not be parsed
    #[error("Malformed sidecar: {0}")]
    Malformed(String),
}

/// One sidecar row: normalized column name -> trimmed cell value
#[derive(Debug, Clone, Default)]
pub struct SidecarRow {
    fields: HashMap<String, String>,
}

impl SidecarRow {
    /// Builds a row from name/value pairs (names are normalized here too,
    /// so callers can use the original column headings)
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut fields = HashMap::new();
        for (name, value) in pairs {
            fields.insert(normalize(name, '_'), value.trim().to_string());
        }
        Self { fields }
    }

    /// The cell value for a normalized column name, or `None` if the
    /// column is absent from the sidecar
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The cell value for a normalized column name, empty string if the
    /// column is absent
    #[must_use]
    pub fn field(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }
}

/// Parses sidecar bytes into rows
///
/// # Errors
/// Returns [`SidecarError::Malformed`] when the header or a record cannot
/// be read. Callers fall back to an empty mapping set on error.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<SidecarRow>, SidecarError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SidecarError::Malformed(format!("header: {e}")))?
        .iter()
        .map(|h| normalize(h, '_'))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SidecarError::Malformed(format!("record: {e}")))?;
        let mut fields = HashMap::with_capacity(headers.len());
        for (index, name) in headers.iter().enumerate() {
            let value = record.get(index).unwrap_or("").trim().to_string();
            fields.insert(name.clone(), value);
        }
        rows.push(SidecarRow { fields });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_headers() {
        let data = b"Program Type,Movie/Show Title\nmovie,Dawn\n";
        let rows = parse_rows(data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].field("program_type"), "movie");
        assert_eq!(rows[0].field("movie_show_title"), "Dawn");
    }

    #[test]
    fn test_parse_trims_cells() {
        let data = b"program_type,movie_filename\n  movie , a.mp4  \n";
        let rows = parse_rows(data).unwrap();
        assert_eq!(rows[0].field("program_type"), "movie");
        assert_eq!(rows[0].field("movie_filename"), "a.mp4");
    }

    #[test]
    fn test_parse_short_record_yields_empty_cells() {
        let data = b"a,b,c\n1,2\n";
        let rows = parse_rows(data).unwrap();
        assert_eq!(rows[0].field("c"), "");
    }

    #[test]
    fn test_parse_empty_body() {
        let rows = parse_rows(b"a,b\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_column_is_none() {
        let rows = parse_rows(b"a\n1\n").unwrap();
        assert!(rows[0].get("b").is_none());
        assert_eq!(rows[0].field("b"), "");
    }

    #[test]
    fn test_from_pairs_normalizes_names() {
        let row = SidecarRow::from_pairs(&[("Program Type", " movie ")]);
        assert_eq!(row.field("program_type"), "movie");
    }
}
