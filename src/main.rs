//! Photo Organizer - sort photos into dated folders
//!
//! Plans source → `<out>/<YYYY>/<YYYY-MM>/` moves, prints them as a table
//! and applies them when `--do-it` is given.

use anyhow::Result;
use clap::Parser;
use photo_organizer::{Cli, Config, Organizer, TableRenderer, render_report, summary_line};
use std::io::{IsTerminal, stdout};
use std::path::Path;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Keep the guard alive until every log line is flushed
    let _guard = setup_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Photo Organizer starting"
    );

    match run(&cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "Run failed");
            eprintln!("Error: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    if cli.verbose {
        info!(?config, "Configuration loaded");
    }

    validate_config(&config);

    let organizer = Organizer::new(config);
    let report = organizer.run()?;

    let out = stdout();
    let color = out.is_terminal();
    let mut table = TableRenderer::new(out.lock(), organizer.config().preview_limit).with_color(color);
    render_report(&mut table, &report)?;
    drop(table);
    println!("{}", summary_line(&report));

    if let Some(failure) = report.failure {
        return Err(failure.into());
    }

    Ok(())
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        info!(config_file = %config_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Warn about layouts that work but are probably not intended
fn validate_config(config: &Config) {
    if config.output_dir.starts_with(&config.source_dir) {
        warn!(
            output = %config.output_dir.display(),
            source = %config.source_dir.display(),
            "Output directory is inside the source directory, sorted files will be rescanned on the next run"
        );
    }
}

/// Setup logging: console always, plus a log file when requested
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let Some(log_path) = cli.log_file.as_deref() else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(open_log_file(log_path)?);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    Ok(file)
}
