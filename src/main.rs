//! Satisfaction pipeline - Main Entry Point

use clap::Parser;
use satisfaction_pipeline::cli::{cmd_info, cmd_run, cmd_runs, Cli, Commands, RunArgs};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "satisfaction_pipeline=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { data, config, label, test_size, seed, metric, tracking_dir, experiment } => {
            cmd_run(RunArgs {
                data,
                config,
                label,
                test_size,
                seed,
                metrics: metric,
                tracking_dir,
                experiment,
            })?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
        Commands::Runs { dir } => {
            cmd_runs(&dir)?;
        }
    }

    Ok(())
}
