use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU64;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::chart::ChartSeries;
use crate::error::{ProgressError, ProgressResult};

/// Severity axes every severity entry is scored against, present or not.
pub const CANONICAL_AXES: [&str; 3] = ["redness", "dryness", "acne"];

/// One log entry as supplied by the log store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severities: Option<BTreeMap<String, f64>>,
    #[serde(default, alias = "note", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RawLogEntry {
    pub fn scored(timestamp: impl Into<String>, score: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            score: Some(score),
            severities: None,
            notes: None,
        }
    }

    pub fn with_severities<'a>(
        timestamp: impl Into<String>,
        severities: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            score: None,
            severities: Some(
                severities
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
            ),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// The authoritative reading of an entry. Scores are higher-is-better, severities higher-is-worse.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Score(f64),
    Severities(BTreeMap<String, f64>),
}

/// An entry that survived normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub date: NaiveDate,
    pub score: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub scores: Vec<f64>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub score: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Declining => write!(f, "declining"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Stats {
    pub average: Option<f64>,
    pub latest: Option<f64>,
    pub count: usize,
}

/// How far back from `today` the series reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRange {
    Days(NonZeroU64),
    Unbounded,
}

impl DateRange {
    /// Rejects zero and negative day counts instead of guessing a default.
    pub fn from_days(days: i64) -> ProgressResult<Self> {
        u64::try_from(days)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self::Days)
            .ok_or(ProgressError::InvalidDateRange(days))
    }

    /// Earliest date kept, or `None` when nothing is excluded.
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Days(days) => today.checked_sub_days(Days::new(days.get())),
            Self::Unbounded => None,
        }
    }

    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        self.cutoff(today).map_or(true, |cutoff| date >= cutoff)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days(days) => write!(f, "last {} days", days),
            Self::Unbounded => write!(f, "all time"),
        }
    }
}

/// Everything the presentation layer needs for one (entries, range) request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub series: Vec<DailyPoint>,
    pub trend: Option<Trend>,
    pub stats: Stats,
    pub chart: ChartSeries,
    /// Entries rejected during normalization.
    pub dropped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_range_rejects_non_positive_days() {
        assert!(matches!(
            DateRange::from_days(0),
            Err(ProgressError::InvalidDateRange(0))
        ));
        assert!(matches!(
            DateRange::from_days(-7),
            Err(ProgressError::InvalidDateRange(-7))
        ));
        assert!(DateRange::from_days(30).is_ok());
    }

    #[test]
    fn cutoff_counts_back_from_today() {
        let range = DateRange::from_days(7).unwrap();
        let today = date(2024, 3, 15);
        assert_eq!(range.cutoff(today), Some(date(2024, 3, 8)));
        assert!(range.contains(today, date(2024, 3, 8)));
        assert!(!range.contains(today, date(2024, 3, 7)));
    }

    #[test]
    fn huge_ranges_keep_everything() {
        let range = DateRange::from_days(i64::MAX).unwrap();
        assert!(range.contains(date(2024, 3, 15), date(1970, 1, 1)));
        assert!(DateRange::Unbounded.contains(date(2024, 3, 15), date(1900, 1, 1)));
    }

    #[test]
    fn raw_entry_accepts_note_alias() {
        let entry: RawLogEntry = serde_json::from_str(
            r#"{"timestamp":"2024-03-01","severities":{"redness":2},"note":"new cleanser"}"#,
        )
        .unwrap();
        assert_eq!(entry.notes.as_deref(), Some("new cleanser"));
        assert!(entry.score.is_none());
    }

    #[test]
    fn trend_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Trend::Improving).unwrap(), "\"improving\"");
        assert_eq!(serde_json::to_string(&None::<Trend>).unwrap(), "null");
    }
}
