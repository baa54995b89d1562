use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{DailyPoint, DateRange, DayBucket};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Collapses each day's bucket into one point, ascending by date. Days without logs are skipped.
pub fn build_series(buckets: &BTreeMap<NaiveDate, DayBucket>, delimiter: &str) -> Vec<DailyPoint> {
    buckets
        .values()
        .filter_map(|bucket| {
            mean(&bucket.scores).map(|score| DailyPoint {
                date: bucket.date,
                score,
                notes: bucket.notes.join(delimiter),
            })
        })
        .collect()
}

pub fn filter_range(series: Vec<DailyPoint>, range: DateRange, today: NaiveDate) -> Vec<DailyPoint> {
    series
        .into_iter()
        .filter(|point| range.contains(today, point.date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn bucket(day: u32, scores: &[f64], notes: &[&str]) -> (NaiveDate, DayBucket) {
        (
            date(day),
            DayBucket {
                date: date(day),
                scores: scores.to_vec(),
                notes: notes.iter().map(|n| n.to_string()).collect(),
            },
        )
    }

    #[test]
    fn averages_each_day_and_joins_notes() {
        let buckets: BTreeMap<_, _> = [
            bucket(5, &[10.0, 0.0], &["new serum", "itchy"]),
            bucket(1, &[7.0], &[]),
        ]
        .into_iter()
        .collect();

        let series = build_series(&buckets, " | ");
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date(1));
        assert_eq!(series[0].notes, "");
        assert!((series[1].score - 5.0).abs() < 1e-9);
        assert_eq!(series[1].notes, "new serum | itchy");
    }

    #[test]
    fn range_filter_drops_old_points() {
        let series = vec![
            DailyPoint {
                date: date(1),
                score: 5.0,
                notes: String::new(),
            },
            DailyPoint {
                date: date(10),
                score: 6.0,
                notes: String::new(),
            },
        ];
        let filtered = filter_range(series, DateRange::from_days(7).unwrap(), date(12));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, date(10));
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }
}
