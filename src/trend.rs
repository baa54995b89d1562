use crate::models::{DailyPoint, Trend};
use crate::series::mean;

/// Compares the last `window` points against the `window` points before them.
///
/// Windows are counted in logged days, not calendar days, so a sparse logger's
/// windows can stretch over weeks. Returns `None` when either window is empty.
pub fn classify_trend(series: &[DailyPoint], window: usize, dead_zone: f64) -> Option<Trend> {
    let recent_start = series.len().saturating_sub(window);
    let older_start = recent_start.saturating_sub(window);

    let recent: Vec<f64> = series[recent_start..].iter().map(|p| p.score).collect();
    let older: Vec<f64> = series[older_start..recent_start]
        .iter()
        .map(|p| p.score)
        .collect();

    let diff = mean(&recent)? - mean(&older)?;

    if diff.abs() < dead_zone {
        Some(Trend::Stable)
    } else if diff > 0.0 {
        Some(Trend::Improving)
    } else {
        Some(Trend::Declining)
    }
}
