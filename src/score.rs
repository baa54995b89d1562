use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EntryError;
use crate::models::{Measurement, RawLogEntry, ScoredEntry, CANONICAL_AXES};

pub const MAX_SCORE: f64 = 10.0;

/// Zoned shapes RFC 3339 refuses: minute precision, basic-format or hour-only offsets.
const ZONED_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

const UTC_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%MZ"];

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Reads the viewer's calendar date out of an ISO-8601 timestamp.
///
/// Zoned timestamps are shifted into the configured zone first; naive ones are
/// assumed to already be on the viewer's clock.
pub fn parse_local_date(raw: &str, config: &EngineConfig) -> Result<NaiveDate, EntryError> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(config.local_date(&instant));
    }

    for format in ZONED_DATETIME_FORMATS {
        if let Ok(instant) = DateTime::parse_from_str(raw, format) {
            return Ok(config.local_date(&instant));
        }
    }

    for format in UTC_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(config.local_date(&naive.and_utc().fixed_offset()));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| EntryError::Timestamp(raw.to_string()))
}

fn check_range(field: &str, value: f64) -> Result<f64, EntryError> {
    if value.is_finite() && (0.0..=MAX_SCORE).contains(&value) {
        Ok(value)
    } else {
        Err(EntryError::OutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

/// Picks the authoritative reading: a pre-computed score wins over severities.
///
/// Axis names are matched case-insensitively; if an axis appears twice under
/// different casing, the higher severity is kept.
pub fn measurement(entry: &RawLogEntry) -> Result<Measurement, EntryError> {
    if let Some(score) = entry.score {
        return Ok(Measurement::Score(check_range("score", score)?));
    }

    let severities = entry
        .severities
        .as_ref()
        .ok_or(EntryError::MissingMeasurement)?;
    let mut normalized: BTreeMap<String, f64> = BTreeMap::new();
    for (axis, value) in severities {
        let value = check_range(axis, *value)?;
        let slot = normalized.entry(axis.trim().to_lowercase()).or_insert(value);
        *slot = slot.max(value);
    }
    Ok(Measurement::Severities(normalized))
}

/// Maps a measurement onto the 0-10 wellness scale, higher is better.
pub fn wellness_score(measurement: &Measurement) -> f64 {
    match measurement {
        Measurement::Score(score) => *score,
        Measurement::Severities(severities) => {
            let extra_axes = severities
                .keys()
                .filter(|axis| !CANONICAL_AXES.contains(&axis.as_str()))
                .count();
            let axes = (CANONICAL_AXES.len() + extra_axes) as f64;
            let total: f64 = severities.values().sum();

            ((MAX_SCORE * axes - total) / axes).clamp(0.0, MAX_SCORE)
        }
    }
}

pub fn score_entry(entry: &RawLogEntry, config: &EngineConfig) -> Result<ScoredEntry, EntryError> {
    let date = parse_local_date(&entry.timestamp, config)?;
    let score = wellness_score(&measurement(entry)?);

    Ok(ScoredEntry {
        date,
        score,
        notes: entry.notes.clone(),
    })
}

/// Normalizes every entry, dropping the malformed ones. Returns the survivors and the drop count.
pub fn score_entries(entries: &[RawLogEntry], config: &EngineConfig) -> (Vec<ScoredEntry>, usize) {
    let mut scored = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;

    for entry in entries {
        match score_entry(entry, config) {
            Ok(value) => scored.push(value),
            Err(err) => {
                debug!(timestamp = %entry.timestamp, error = %err, "dropping log entry");
                dropped += 1;
            }
        }
    }

    (scored, dropped)
}
