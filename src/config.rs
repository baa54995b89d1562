use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use serde::Deserialize;

use crate::error::{ProgressError, ProgressResult};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest rendered bar, so a score of 0 stays visible.
    pub min_bar_height: f64,
    pub max_bar_height: f64,
    /// Number of daily points in each trend window.
    pub trend_window: usize,
    /// Mean differences below this are reported as stable.
    pub dead_zone: f64,
    pub notes_delimiter: String,
    /// Offset used to read calendar dates from zoned timestamps. `None` uses the host's local zone.
    pub utc_offset_minutes: Option<i32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_bar_height: 4.0,
            max_bar_height: 120.0,
            trend_window: 7,
            dead_zone: 0.5,
            notes_delimiter: " | ".to_string(),
            utc_offset_minutes: None,
        }
    }
}

impl EngineConfig {
    /// Loads a YAML config file; fields not present keep their defaults.
    pub fn load(path: &Path) -> ProgressResult<Self> {
        let yaml_content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_yaml::from_str(&yaml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ProgressResult<()> {
        if !(self.max_bar_height.is_finite() && self.max_bar_height > 0.0) {
            return Err(ProgressError::Config(format!(
                "max_bar_height must be positive, got {}",
                self.max_bar_height
            )));
        }
        if !(self.min_bar_height.is_finite() && self.min_bar_height >= 0.0)
            || self.min_bar_height > self.max_bar_height
        {
            return Err(ProgressError::Config(format!(
                "min_bar_height must lie in 0..={}, got {}",
                self.max_bar_height, self.min_bar_height
            )));
        }
        if self.trend_window == 0 {
            return Err(ProgressError::Config("trend_window must be at least 1".into()));
        }
        if !(self.dead_zone.is_finite() && self.dead_zone >= 0.0) {
            return Err(ProgressError::Config(format!(
                "dead_zone must be non-negative, got {}",
                self.dead_zone
            )));
        }
        if self.fixed_offset().is_none() && self.utc_offset_minutes.is_some() {
            return Err(ProgressError::Config(format!(
                "utc_offset_minutes out of range: {:?}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    fn fixed_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes.checked_mul(60)?))
    }

    /// Calendar date of a zoned instant as seen by the viewer.
    pub fn local_date(&self, instant: &DateTime<FixedOffset>) -> NaiveDate {
        match self.fixed_offset() {
            Some(offset) => instant.with_timezone(&offset).date_naive(),
            None => instant.with_timezone(&Local).date_naive(),
        }
    }
}
