use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::models::DailyPoint;
use crate::score::MAX_SCORE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTier {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl ColorTier {
    /// Lower edges are inclusive: 8.0 is excellent, 7.999 is good.
    pub fn for_score(score: f64) -> Self {
        if score >= 8.0 {
            Self::Excellent
        } else if score >= 6.0 {
            Self::Good
        } else if score >= 4.0 {
            Self::Fair
        } else {
            Self::NeedsAttention
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsAttention => "needs-attention",
        }
    }

    fn glyph(&self) -> char {
        match self {
            Self::Excellent => '█',
            Self::Good => '▓',
            Self::Fair => '▒',
            Self::NeedsAttention => '░',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub height: f64,
    pub color_tier: ColorTier,
    /// ISO date; locale formatting is left to the renderer.
    pub label: String,
    pub raw_score: f64,
    pub raw_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Chart,
    List { newest_first: bool },
}

/// Render-ready bars, one per daily point and in the same ascending order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ChartSeries {
    pub bars: Vec<ChartBar>,
}

impl ChartSeries {
    pub fn from_series(series: &[DailyPoint], config: &EngineConfig) -> Self {
        let bars = series
            .iter()
            .map(|point| ChartBar {
                height: bar_height(point.score, config),
                color_tier: ColorTier::for_score(point.score),
                label: point.date.to_string(),
                raw_score: point.score,
                raw_date: point.date,
            })
            .collect();
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars in the order a view mode shows them; the bars themselves are shared.
    pub fn view(&self, mode: ViewMode) -> Vec<&ChartBar> {
        match mode {
            ViewMode::Chart | ViewMode::List { newest_first: false } => self.bars.iter().collect(),
            ViewMode::List { newest_first: true } => self.bars.iter().rev().collect(),
        }
    }

    /// Plain-text rendition: one row per bar, bar length scaled to at most `width` columns.
    pub fn render_text(&self, mode: ViewMode, width: usize, config: &EngineConfig) -> String {
        let mut output = String::new();

        if self.bars.is_empty() {
            let _ = writeln!(output, "No data yet.");
            return output;
        }

        for bar in self.view(mode) {
            match mode {
                ViewMode::Chart => {
                    let columns = bar_columns(bar.height, width, config.max_bar_height);
                    let glyphs: String = std::iter::repeat(bar.color_tier.glyph())
                        .take(columns)
                        .collect();
                    let _ = writeln!(output, "{} {:<width$} {:>4.1}", bar.label, glyphs, bar.raw_score);
                }
                ViewMode::List { .. } => {
                    let _ = writeln!(
                        output,
                        "- {}: {:.1} ({})",
                        bar.label,
                        bar.raw_score,
                        bar.color_tier.as_str()
                    );
                }
            }
        }

        output
    }
}

pub fn bar_height(score: f64, config: &EngineConfig) -> f64 {
    (score / MAX_SCORE * config.max_bar_height).max(config.min_bar_height)
}

fn bar_columns(height: f64, width: usize, max_bar_height: f64) -> usize {
    let ratio = if max_bar_height > 0.0 {
        (height / max_bar_height).clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((ratio * width as f64).round() as usize).clamp(1, width.max(1))
}
