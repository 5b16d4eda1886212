//! Implements RegistryPort from a semicolon-delimited CSV file.
//!
//! The file is spreadsheet-exported: UTF-8 with an optional BOM, `;`
//! delimiter, a `user_id` column and a Russian `Инструмент` (or English
//! `instrument`) column. Rows with a missing or non-numeric id, or an empty
//! instrument, are skipped with a debug note; header matching is
//! case-insensitive.

use crate::domain::{DomainError, MusicianRegistry};
use crate::ports::RegistryPort;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub struct CsvRegistryLoader;

impl CsvRegistryLoader {
    pub fn new() -> Self {
        Self
    }

    fn parse(content: &str) -> Result<MusicianRegistry, DomainError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DomainError::Registry(format!("read header: {e}")))?
            .clone();
        let find_column = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };
        let id_col = find_column(&["user_id", "id"])
            .ok_or_else(|| DomainError::Registry("no user_id column".into()))?;
        let instr_col = headers
            .iter()
            .position(|h| {
                let h = h.trim().to_lowercase();
                h == "инструмент" || h == "instrument"
            })
            .ok_or_else(|| DomainError::Registry("no Инструмент column".into()))?;

        let mut by_user: HashMap<i64, String> = HashMap::new();
        let mut total_rows = 0usize;

        for record in reader.records() {
            let record = record.map_err(|e| DomainError::Registry(format!("read row: {e}")))?;
            total_rows += 1;

            let uid = record.get(id_col).map(str::trim).unwrap_or_default();
            let instrument = record.get(instr_col).map(str::trim).unwrap_or_default();
            if uid.is_empty() || instrument.is_empty() {
                debug!(row = total_rows, "skipping row without id or instrument");
                continue;
            }
            let Ok(uid) = uid.parse::<i64>() else {
                debug!(row = total_rows, uid, "skipping row with non-numeric id");
                continue;
            };
            by_user.insert(uid, instrument.to_string());
        }

        Ok(MusicianRegistry::new(by_user, total_rows))
    }
}

impl Default for CsvRegistryLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryPort for CsvRegistryLoader {
    async fn load(&self, path: &Path) -> Result<MusicianRegistry, DomainError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::Registry(format!("read {}: {e}", path.display())))?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semicolon_csv_with_bom() {
        let csv = "\u{feff}user_id;first_name;Инструмент\n1;Анна;скрипка 1\n2;Борис;труба\n";
        let reg = CsvRegistryLoader::parse(csv).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.total_rows(), 2);
        assert_eq!(reg.instrument(1), Some("скрипка 1"));
        assert_eq!(reg.instrument(2), Some("труба"));
    }

    #[test]
    fn skips_rows_with_missing_fields() {
        let csv = "user_id;Инструмент\n1;альт\n;флейта\n2;\nabc;гобой\n3;фагот\n";
        let reg = CsvRegistryLoader::parse(csv).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.total_rows(), 5);
        assert_eq!(reg.instrument(1), Some("альт"));
        assert_eq!(reg.instrument(3), Some("фагот"));
    }

    #[test]
    fn header_lookup_is_flexible() {
        let csv = "ID;Instrument\n7;cello\n";
        let reg = CsvRegistryLoader::parse(csv).unwrap();
        assert_eq!(reg.instrument(7), Some("cello"));
    }

    #[test]
    fn missing_instrument_column_is_an_error() {
        let csv = "user_id;first_name\n1;Анна\n";
        let err = CsvRegistryLoader::parse(csv).unwrap_err();
        assert!(matches!(err, DomainError::Registry(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_registry_error() {
        let loader = CsvRegistryLoader::new();
        let err = loader
            .load(Path::new("/definitely/not/here.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Registry(_)));
    }
}
