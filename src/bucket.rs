use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{DayBucket, ScoredEntry};

/// Groups normalized entries by calendar date, keeping arrival order within each day.
pub fn bucket_by_day(entries: &[ScoredEntry]) -> BTreeMap<NaiveDate, DayBucket> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for entry in entries {
        let bucket = buckets.entry(entry.date).or_insert_with(|| DayBucket {
            date: entry.date,
            ..DayBucket::default()
        });

        bucket.scores.push(entry.score);
        if let Some(note) = entry.notes.as_deref().map(str::trim) {
            if !note.is_empty() {
                bucket.notes.push(note.to_string());
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, score: f64, notes: Option<&str>) -> ScoredEntry {
        ScoredEntry {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            score,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn empty_input_gives_empty_map() {
        assert!(bucket_by_day(&[]).is_empty());
    }

    #[test]
    fn same_day_entries_merge_in_arrival_order() {
        let entries = vec![
            entry(2, 4.0, Some("morning flare")),
            entry(1, 9.0, None),
            entry(2, 6.0, Some("   ")),
            entry(2, 8.0, Some("calmer tonight")),
        ];
        let buckets = bucket_by_day(&entries);

        assert_eq!(buckets.len(), 2);
        let day_two = &buckets[&NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()];
        assert_eq!(day_two.scores, vec![4.0, 6.0, 8.0]);
        assert_eq!(day_two.notes, vec!["morning flare", "calmer tonight"]);
    }
}
