//! Aggregates irregular skin-condition log entries into daily wellness scores,
//! a trend classification, chart bars and summary statistics.

pub mod bucket;
pub mod chart;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod score;
pub mod series;
pub mod stats;
pub mod trend;

pub use chart::{ChartBar, ChartSeries, ColorTier, ViewMode};
pub use config::EngineConfig;
pub use error::{EntryError, ProgressError, ProgressResult};
pub use models::{DailyPoint, DateRange, ProgressReport, RawLogEntry, Stats, Trend};
pub use pipeline::{analyze, ProgressCache};
