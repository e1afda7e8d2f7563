//! Satisfaction pipeline CLI Module
//!
//! Command-line interface for running the training pipeline and inspecting data.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::PipelineError;
use crate::evaluation::MetricKind;
use crate::pipeline::{PipelineConfig, PipelineReport, TrainingPipeline};
use crate::tracking::{ExperimentTracker, LocalStorage, Run, RunStatus, StorageBackend};
use crate::utils::IngestData;

// ─── Output ────────────────────────────────────────────────────────────────────

/// Terminal colour roles used by every command
#[derive(Clone, Copy)]
enum Tone {
    Rule,
    Label,
    Active,
    Good,
    Bad,
}

fn paint(text: &str, tone: Tone) -> ColoredString {
    let (r, g, b) = match tone {
        Tone::Rule => (95, 95, 95),
        Tone::Label => (145, 145, 145),
        Tone::Active => (110, 160, 250),
        Tone::Good => (90, 200, 115),
        Tone::Bad => (225, 95, 95),
    };
    text.truecolor(r, g, b)
}

fn rule(width: usize) {
    println!("  {}", paint(&"─".repeat(width), Tone::Rule));
}

fn heading(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    rule(56);
}

/// One `label  value` row with the label column padded to `width`
fn field(label: &str, value: impl std::fmt::Display, width: usize) {
    println!("  {} {}", paint(&format!("{label:<width$}"), Tone::Label), value);
}

fn status_tag(status: RunStatus) -> ColoredString {
    match status {
        RunStatus::Finished => paint("finished", Tone::Good),
        RunStatus::Failed => paint("failed", Tone::Bad),
        RunStatus::Running => paint("running", Tone::Active),
    }
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "satisfaction")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Customer satisfaction training pipeline")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest, clean, train and evaluate
    Run {
        /// Input data file (CSV or TSV); overrides the config file
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Pipeline configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Label column name
        #[arg(short, long)]
        label: Option<String>,

        /// Fraction of rows held out for testing
        #[arg(long)]
        test_size: Option<f64>,

        /// Seed for the train/test shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Metrics to compute, in order (repeatable)
        #[arg(short, long, value_enum)]
        metric: Vec<MetricKind>,

        /// Directory receiving the run file
        #[arg(long)]
        tracking_dir: Option<PathBuf>,

        /// Experiment name recorded with the run
        #[arg(short, long)]
        experiment: Option<String>,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },

    /// List saved runs
    Runs {
        /// Directory holding the run files
        #[arg(short, long, default_value = "runs")]
        dir: PathBuf,
    },
}

/// Command line overrides for a pipeline run
#[derive(Debug, Default, Clone)]
pub struct RunArgs {
    pub data: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub label: Option<String>,
    pub test_size: Option<f64>,
    pub seed: Option<u64>,
    pub metrics: Vec<MetricKind>,
    pub tracking_dir: Option<PathBuf>,
    pub experiment: Option<String>,
}

impl RunArgs {
    /// Load the config file (or defaults) and apply the overrides on top
    pub fn resolve(self) -> crate::error::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(data) = self.data {
            config.data_path = Some(data);
        }
        if let Some(label) = self.label {
            config.split.label_column = label;
        }
        if let Some(test_size) = self.test_size {
            config.split.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.split.random_state = seed;
        }
        if !self.metrics.is_empty() {
            config.metrics = self.metrics;
        }
        if let Some(dir) = self.tracking_dir {
            config.tracking_dir = Some(dir);
        }
        if let Some(name) = self.experiment {
            config.experiment_name = name;
        }

        config.validate()?;
        Ok(config)
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.resolve()?;
    let data_path = config
        .data_path
        .clone()
        .ok_or_else(|| PipelineError::ConfigError("no data path given (use --data or data_path)".to_string()))?;

    print_run_header(&config, &data_path);

    heading("Run");
    let tracker = ExperimentTracker::new(config.experiment_name.clone());
    let source = IngestData::new(&data_path);

    let start = Instant::now();
    let outcome = TrainingPipeline::new(config.clone()).run(&source, &tracker);

    let status = match &outcome {
        Ok(_) => RunStatus::Finished,
        Err(_) => RunStatus::Failed,
    };
    tracker.finish(status);
    match &outcome {
        Ok(_) => field("Pipeline", format!("{} in {:.2?}", status_tag(status), start.elapsed()), 12),
        Err(e) => field("Pipeline", format!("{} {}", status_tag(status), paint(&e.to_string(), Tone::Rule)), 12),
    }

    if let Some(dir) = &config.tracking_dir {
        if let Some(path) = tracker.save(dir) {
            field("Run file", path.display(), 12);
        }
    }

    let report = outcome?;
    print_report(&report);
    Ok(())
}

fn print_run_header(config: &PipelineConfig, data_path: &Path) {
    println!();
    println!(
        "  {} {}",
        "Customer Satisfaction Pipeline".white().bold(),
        paint(&format!("v{}", env!("CARGO_PKG_VERSION")), Tone::Rule)
    );
    rule(56);
    field("Data", data_path.display(), 12);
    field("Label", &config.split.label_column, 12);
    field("Test size", config.split.test_size, 12);
    field("Seed", config.split.random_state, 12);
    field("Model", &config.model.kind, 12);
}

fn print_report(report: &PipelineReport) {
    heading("Results");
    field("Rows", report.n_rows, 16);
    field("Train / test", format!("{} / {}", report.n_train, report.n_test), 16);
    field("Features", report.feature_names.len(), 16);
    println!();

    for metric in &report.metrics {
        field(metric.kind.label(), format!("{:.4}", metric.value).white().bold(), 16);
    }
    println!();
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    let df = IngestData::new(data_path).get_data()?;

    heading("Data");
    field("File", data_path.display(), 12);
    field("Rows", df.height(), 12);
    field("Columns", df.width(), 12);
    field("Memory", format!("{:.2} MB", df.estimated_size() as f64 / 1024.0 / 1024.0), 12);

    heading("Columns");
    for col in df.get_columns() {
        println!(
            "  {:<28} {}",
            col.name().as_str(),
            paint(
                &format!(
                    "{:?}, {} null, {} unique",
                    col.dtype(),
                    col.null_count(),
                    col.n_unique().unwrap_or(0)
                ),
                Tone::Label
            )
        );
    }

    println!();
    Ok(())
}

/// Saved runs under `storage`, oldest first
pub fn load_runs(storage: &dyn StorageBackend) -> crate::error::Result<Vec<Run>> {
    let mut runs = storage
        .list_runs()?
        .iter()
        .map(|id| storage.load_run(id))
        .collect::<crate::error::Result<Vec<_>>>()?;
    runs.sort_by_key(|run| run.start_time);
    Ok(runs)
}

pub fn cmd_runs(dir: &Path) -> anyhow::Result<()> {
    let runs = load_runs(&LocalStorage::new(dir))?;

    heading(&format!("Runs in {}", dir.display()));
    if runs.is_empty() {
        println!("  {}", paint("no saved runs", Tone::Label));
        println!();
        return Ok(());
    }

    for run in &runs {
        let scores: Vec<String> = run
            .metrics
            .iter()
            .map(|(name, value)| format!("{name}={value:.4}"))
            .collect();
        println!(
            "  {}  {:<10} {:<22} {:>7.2}s  {}",
            paint(&run.run_id, Tone::Active),
            status_tag(run.status),
            run.experiment_name,
            run.duration_secs(),
            scores.join(" ")
        );
    }

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::parse_from([
            "satisfaction", "run", "--data", "orders.csv", "--test-size", "0.3",
            "--metric", "r2", "--metric", "mse",
        ]);

        match cli.command {
            Commands::Run { data, test_size, metric, .. } => {
                assert_eq!(data, Some(PathBuf::from("orders.csv")));
                assert_eq!(test_size, Some(0.3));
                assert_eq!(metric, vec![MetricKind::R2, MetricKind::Mse]);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let args = RunArgs {
            data: Some(PathBuf::from("orders.csv")),
            label: Some("score".to_string()),
            seed: Some(7),
            metrics: vec![MetricKind::Rmse],
            ..Default::default()
        };

        let config = args.resolve().unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("orders.csv")));
        assert_eq!(config.split.label_column, "score");
        assert_eq!(config.split.random_state, 7);
        assert_eq!(config.split.test_size, 0.2);
        assert_eq!(config.metrics, vec![MetricKind::Rmse]);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = RunArgs {
            test_size: Some(1.5),
            ..Default::default()
        };
        assert!(matches!(args.resolve(), Err(PipelineError::ConfigError(_))));
    }

    #[test]
    fn test_cli_parses_runs_dir() {
        match Cli::parse_from(["satisfaction", "runs"]).command {
            Commands::Runs { dir } => assert_eq!(dir, PathBuf::from("runs")),
            _ => panic!("expected runs command"),
        }
    }

    #[test]
    fn test_load_runs_reads_saved_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(load_runs(&storage).unwrap().is_empty());

        let first = ExperimentTracker::new("first");
        first.finish(RunStatus::Finished);
        first.save(dir.path()).unwrap();
        let second = ExperimentTracker::new("second");
        second.finish(RunStatus::Failed);
        second.save(dir.path()).unwrap();

        let runs = load_runs(&storage).unwrap();
        let names: Vec<&str> = runs.iter().map(|r| r.experiment_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(runs[1].status, RunStatus::Failed);
    }

    #[test]
    fn test_unreadable_run_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("run_broken.json"), "{ not json").unwrap();

        let err = load_runs(&LocalStorage::new(dir.path())).unwrap_err();
        assert!(matches!(err, PipelineError::ConfigError(_)));
    }
}
