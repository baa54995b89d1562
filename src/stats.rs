use crate::models::{DailyPoint, Stats};
use crate::series::mean;

/// Day-weighted summary of an already filtered series.
pub fn summarize(series: &[DailyPoint]) -> Stats {
    let scores: Vec<f64> = series.iter().map(|point| point.score).collect();

    Stats {
        average: mean(&scores),
        latest: series
            .iter()
            .max_by_key(|point| point.date)
            .map(|point| point.score),
        count: series.len(),
    }
}
