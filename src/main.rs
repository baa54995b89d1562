use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use skin_progress::chart::ViewMode;
use skin_progress::ingest;
use skin_progress::report::{build_report, trend_label};
use skin_progress::{analyze, DateRange, EngineConfig, ProgressReport};

#[derive(Parser)]
#[command(name = "skin-progress")]
#[command(about = "Daily wellness scores and trends from skin-condition logs", long_about = None)]
struct Cli {
    /// YAML file overriding chart, trend and time zone settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("range")
        .args(["days", "all"])
        .multiple(false)
))]
struct InputArgs {
    /// JSON array or CSV file of log entries
    #[arg(long)]
    input: PathBuf,
    /// Only include the last N days
    #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
    days: i64,
    /// Include the whole history
    #[arg(long)]
    all: bool,
}

impl InputArgs {
    fn range(&self) -> anyhow::Result<DateRange> {
        if self.all {
            return Ok(DateRange::Unbounded);
        }
        DateRange::from_days(self.days).context("--days must be a positive number")
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Chart,
    List,
}

#[derive(Subcommand)]
enum Commands {
    /// Print average, latest score, day count and trend
    Summary {
        #[command(flatten)]
        input: InputArgs,
        /// Emit the full progress report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Draw the daily scores as text bars or a list
    Chart {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum, default_value_t = View::Chart)]
        view: View,
        #[arg(long)]
        newest_first: bool,
        #[arg(long, default_value_t = 40)]
        width: usize,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn run_pipeline(
    input: &InputArgs,
    config: &EngineConfig,
    today: NaiveDate,
) -> anyhow::Result<(ProgressReport, DateRange)> {
    let range = input.range()?;
    let loaded = ingest::load_entries(&input.input)
        .with_context(|| format!("failed to read log entries from {}", input.input.display()))?;
    if loaded.rejected > 0 {
        warn!(rejected = loaded.rejected, "some records could not be decoded");
    }

    Ok((analyze(&loaded.entries, range, today, config), range))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Summary { input, json } => {
            let (report, range) = run_pipeline(&input, &config, today)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            if report.stats.count == 0 {
                println!("No data yet for {range}.");
                return Ok(());
            }

            println!("Progress for {range}:");
            if let Some(average) = report.stats.average {
                println!("- average score {average:.1}");
            }
            if let Some(latest) = report.stats.latest {
                println!("- latest score {latest:.1}");
            }
            println!("- {} days logged", report.stats.count);
            println!("- trend: {}", trend_label(report.trend));
        }
        Commands::Chart {
            input,
            view,
            newest_first,
            width,
        } => {
            let (report, _) = run_pipeline(&input, &config, today)?;
            let mode = match view {
                View::Chart => ViewMode::Chart,
                View::List => ViewMode::List { newest_first },
            };
            print!(
                "{}",
                report.chart.render_text(mode, width, &config)
            );
        }
        Commands::Report { input, out } => {
            let (report, range) = run_pipeline(&input, &config, today)?;
            let markdown = build_report(&report, range, today, &config);
            std::fs::write(&out, markdown)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
