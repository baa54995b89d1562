use std::fmt::Write;

use chrono::NaiveDate;

use crate::chart::ViewMode;
use crate::config::EngineConfig;
use crate::models::{DateRange, ProgressReport, Trend};

/// Label shown for a trend; a missing trend reads as neutral rather than as an error.
pub fn trend_label(trend: Option<Trend>) -> &'static str {
    match trend {
        Some(Trend::Improving) => "Improving",
        Some(Trend::Declining) => "Declining",
        Some(Trend::Stable) => "Stable",
        None => "Stable (not enough data for a trend)",
    }
}

fn score_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub fn build_report(
    report: &ProgressReport,
    range: DateRange,
    today: NaiveDate,
    config: &EngineConfig,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Skin Progress Report");
    let _ = writeln!(output, "Generated on {} for {}", today, range);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");

    if report.stats.count == 0 {
        let _ = writeln!(output, "No data yet. Log a few check-ins to see progress.");
    } else {
        let _ = writeln!(output, "- Average score: {}", score_or_dash(report.stats.average));
        let _ = writeln!(output, "- Latest score: {}", score_or_dash(report.stats.latest));
        let _ = writeln!(output, "- Days logged: {}", report.stats.count);
        let _ = writeln!(output, "- Trend: {}", trend_label(report.trend));
    }
    if report.dropped > 0 {
        let _ = writeln!(output, "- Entries skipped as malformed: {}", report.dropped);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Daily Scores");
    let _ = writeln!(output, "```");
    let _ = write!(
        output,
        "{}",
        report
            .chart
            .render_text(ViewMode::Chart, 30, config)
    );
    let _ = writeln!(output, "```");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Notes");

    let noted: Vec<_> = report
        .series
        .iter()
        .rev()
        .filter(|point| !point.notes.is_empty())
        .take(5)
        .collect();

    if noted.is_empty() {
        let _ = writeln!(output, "No notes recorded for this window.");
    } else {
        for point in noted {
            let _ = writeln!(output, "- {} ({:.1}): {}", point.date, point.score, point.notes);
        }
    }

    output
}
