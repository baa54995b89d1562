use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use tracing::info;

use crate::bucket::bucket_by_day;
use crate::chart::ChartSeries;
use crate::config::EngineConfig;
use crate::models::{DateRange, ProgressReport, RawLogEntry};
use crate::score::score_entries;
use crate::series::{build_series, filter_range};
use crate::stats::summarize;
use crate::trend::classify_trend;

/// Runs the whole aggregation for one request. `today` anchors the date range.
pub fn analyze(
    entries: &[RawLogEntry],
    range: DateRange,
    today: NaiveDate,
    config: &EngineConfig,
) -> ProgressReport {
    let (scored, dropped) = score_entries(entries, config);
    let buckets = bucket_by_day(&scored);
    let series = filter_range(build_series(&buckets, &config.notes_delimiter), range, today);

    let trend = classify_trend(&series, config.trend_window, config.dead_zone);
    let stats = summarize(&series);
    let chart = ChartSeries::from_series(&series, config);

    info!(
        entries = entries.len(),
        dropped,
        days = series.len(),
        %range,
        "progress analyzed"
    );

    ProgressReport {
        series,
        trend,
        stats,
        chart,
        dropped,
    }
}

fn fingerprint(entries: &[RawLogEntry]) -> u64 {
    let mut hasher = DefaultHasher::new();
    entries.len().hash(&mut hasher);
    for entry in entries {
        entry.timestamp.hash(&mut hasher);
        entry.score.map(f64::to_bits).hash(&mut hasher);
        entry.severities.is_some().hash(&mut hasher);
        if let Some(severities) = &entry.severities {
            severities.len().hash(&mut hasher);
            for (axis, value) in severities {
                axis.hash(&mut hasher);
                value.to_bits().hash(&mut hasher);
            }
        }
        entry.notes.hash(&mut hasher);
    }
    hasher.finish()
}

type CacheKey = (u64, DateRange, NaiveDate);

/// Memoizes reports per (entries, range, today). Results are identical to calling `analyze`.
///
/// The fingerprint only selects a slot; a hit also requires the stored entries to equal the input.
#[derive(Debug, Default)]
pub struct ProgressCache {
    config: EngineConfig,
    reports: HashMap<CacheKey, Vec<(Vec<RawLogEntry>, ProgressReport)>>,
}

impl ProgressCache {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            reports: HashMap::new(),
        }
    }

    pub fn get_or_analyze(
        &mut self,
        entries: &[RawLogEntry],
        range: DateRange,
        today: NaiveDate,
    ) -> &ProgressReport {
        let key = (fingerprint(entries), range, today);
        let config = &self.config;
        let slot = self.reports.entry(key).or_default();

        let index = match slot
            .iter()
            .position(|(cached, _)| cached.as_slice() == entries)
        {
            Some(index) => index,
            None => {
                slot.push((entries.to_vec(), analyze(entries, range, today, config)));
                slot.len() - 1
            }
        };
        &slot[index].1
    }

    pub fn len(&self) -> usize {
        self.reports.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trend;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn empty_input_is_a_valid_empty_report() {
        let report = analyze(&[], DateRange::Unbounded, today(), &EngineConfig::default());
        assert!(report.series.is_empty());
        assert!(report.chart.is_empty());
        assert_eq!(report.trend, None);
        assert_eq!(report.stats.count, 0);
        assert_eq!(report.stats.latest, None);
    }

    #[test]
    fn range_filter_applies_before_stats_and_trend() {
        let mut entries = Vec::new();
        for day in 1..=14u32 {
            let score = if day <= 7 { 2.0 } else { 9.0 };
            entries.push(RawLogEntry::scored(format!("2024-03-{day:02}T08:00:00"), score));
        }
        let config = EngineConfig::default();

        let all = analyze(&entries, DateRange::Unbounded, today(), &config);
        assert_eq!(all.trend, Some(Trend::Improving));
        assert_eq!(all.stats.count, 14);

        let recent = analyze(&entries, DateRange::from_days(20).unwrap(), today(), &config);
        assert_eq!(recent.stats.count, 4);
        assert_eq!(recent.stats.average, Some(9.0));
        assert_eq!(recent.trend, None);
    }

    #[test]
    fn cache_returns_the_same_report() {
        let entries = vec![
            RawLogEntry::scored("2024-03-30", 6.0),
            RawLogEntry::scored("2024-03-31", 8.0).with_notes("good day"),
        ];
        let config = EngineConfig::default();
        let expected = analyze(&entries, DateRange::Unbounded, today(), &config);

        let mut cache = ProgressCache::new(config);
        assert_eq!(cache.get_or_analyze(&entries, DateRange::Unbounded, today()), &expected);
        assert_eq!(cache.get_or_analyze(&entries, DateRange::Unbounded, today()), &expected);
        assert_eq!(cache.len(), 1);

        let mut changed = entries.clone();
        changed[0].score = Some(2.0);
        assert_ne!(cache.get_or_analyze(&changed, DateRange::Unbounded, today()), &expected);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cache_tells_missing_and_empty_severities_apart() {
        let missing = vec![RawLogEntry {
            timestamp: "2024-03-30T08:00:00".into(),
            score: None,
            severities: None,
            notes: None,
        }];
        let mut empty = missing.clone();
        empty[0].severities = Some(Default::default());

        let config = EngineConfig::default();
        let expected = analyze(&empty, DateRange::Unbounded, today(), &config);
        assert_eq!(expected.stats.count, 1);
        assert_eq!(expected.stats.latest, Some(10.0));

        let mut cache = ProgressCache::new(config);
        assert_eq!(
            cache
                .get_or_analyze(&missing, DateRange::Unbounded, today())
                .dropped,
            1
        );
        assert_eq!(cache.get_or_analyze(&empty, DateRange::Unbounded, today()), &expected);
        assert_eq!(cache.len(), 2);
    }
}
