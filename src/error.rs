use thiserror::Error;

/// Reasons a single log entry is dropped before bucketing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("unparsable timestamp `{0}`")]
    Timestamp(String),

    #[error("entry carries neither a score nor severities")]
    MissingMeasurement,

    #[error("{field} value {value} is outside 0..=10")]
    OutOfRange { field: String, value: f64 },
}

/// Errors surfaced to callers of the engine.
#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("date range must be a positive number of days, got {0}")]
    InvalidDateRange(i64),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ProgressResult<T> = Result<T, ProgressError>;
