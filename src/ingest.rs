use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::ProgressResult;
use crate::models::RawLogEntry;

/// Entries read from a file, plus the records that could not be decoded at all.
#[derive(Debug, Default)]
pub struct LoadedEntries {
    pub entries: Vec<RawLogEntry>,
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

pub fn load_entries(path: &Path) -> ProgressResult<LoadedEntries> {
    match InputFormat::from_path(path) {
        InputFormat::Csv => load_csv(path),
        InputFormat::Json => load_json(path),
    }
}

/// Reads a JSON array of entries. Records with the wrong shape are skipped, not fatal.
pub fn load_json(path: &Path) -> ProgressResult<LoadedEntries> {
    let content = fs::read_to_string(path)?;
    parse_json(&content)
}

pub fn parse_json(content: &str) -> ProgressResult<LoadedEntries> {
    let records: Vec<serde_json::Value> = serde_json::from_str(content)?;
    let mut loaded = LoadedEntries::default();

    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<RawLogEntry>(record) {
            Ok(entry) => loaded.entries.push(entry),
            Err(err) => {
                warn!(index, error = %err, "skipping malformed JSON log entry");
                loaded.rejected += 1;
            }
        }
    }

    Ok(loaded)
}

#[derive(Deserialize)]
struct CsvRow {
    timestamp: String,
    score: Option<f64>,
    redness: Option<f64>,
    dryness: Option<f64>,
    acne: Option<f64>,
    notes: Option<String>,
}

impl From<CsvRow> for RawLogEntry {
    fn from(row: CsvRow) -> Self {
        let severities: BTreeMap<String, f64> = [
            ("redness", row.redness),
            ("dryness", row.dryness),
            ("acne", row.acne),
        ]
        .into_iter()
        .filter_map(|(axis, value)| value.map(|v| (axis.to_string(), v)))
        .collect();

        RawLogEntry {
            timestamp: row.timestamp,
            score: row.score,
            severities: (!severities.is_empty()).then_some(severities),
            notes: row.notes,
        }
    }
}

/// Reads `timestamp,score,redness,dryness,acne,notes` rows; blank cells are absent values.
pub fn load_csv(path: &Path) -> ProgressResult<LoadedEntries> {
    let reader = csv::Reader::from_path(path)?;
    Ok(read_csv(reader))
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> LoadedEntries {
    let mut loaded = LoadedEntries::default();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        match result {
            Ok(row) => loaded.entries.push(row.into()),
            Err(err) => {
                warn!(row = index + 1, error = %err, "skipping malformed CSV log entry");
                loaded.rejected += 1;
            }
        }
    }

    loaded
}
