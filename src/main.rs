//! koanwatch - CLI entry point
//!
//! Watches koan sources, rebuilds on save and reports progress.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use koanwatch::cli::{Cli, Command, get_log_path};
use koanwatch::config::Config;
use koanwatch::orchestrator::{Orchestrator, exit_requested};
use koanwatch::report::Console;
use koanwatch::runner::{CommandBuildTool, CommandHarness};
use koanwatch::watcher::WatchSet;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Log to file; the console belongs to the Master
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Reading logs must not truncate them, so no logging setup here
        Some(Command::Logs { lines }) => cmd_logs(lines),
        Some(Command::Sweep) => {
            let (config, base) = prepare(&cli)?;
            cmd_sweep(&config, base).await
        }
        Some(Command::Sources) => {
            let (config, base) = prepare(&cli)?;
            cmd_sources(&config, base)
        }
        None | Some(Command::Watch) => {
            let (config, base) = prepare(&cli)?;
            cmd_watch(&config, base).await
        }
    }
}

/// Set up logging, then load and validate configuration
fn prepare(cli: &Cli) -> Result<(Config, PathBuf)> {
    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let base = std::env::current_dir().context("Failed to determine working directory")?;
    info!(sources = config.sources.len(), base = %base.display(), "koanwatch loaded config");
    Ok((config, base))
}

type CommandOrchestrator = Orchestrator<CommandBuildTool, CommandHarness, std::io::Stdout>;

fn orchestrator(config: &Config, base: &Path) -> CommandOrchestrator {
    Orchestrator::new(
        config.resolved_sources(base),
        CommandBuildTool::new(config.build.clone()),
        CommandHarness::new(config.harness.program.clone()),
        Console::stdout(),
    )
}

/// Build, sweep, then rebuild on every save until asked to stop
async fn cmd_watch(config: &Config, base: PathBuf) -> Result<()> {
    let mut orch = orchestrator(config, &base);
    if let Err(e) = orch.check_sources() {
        info!(error = %e, "Nothing to watch");
        return Ok(());
    }

    orch.build_everything().await.context("Failed to write to console")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let watches = WatchSet::start(orch.sources(), &config.watch, tx).context("Failed to start watching")?;
    info!(watchers = watches.len(), "Watching sources");

    orch.sweep().await.context("Failed to write to console")?;
    orch.announce_watching().context("Failed to write to console")?;

    orch.run(rx, exit_requested()).await.context("Failed to write to console")?;

    watches.stop();
    info!("koanwatch stopped");
    Ok(())
}

/// Build and check every source once
async fn cmd_sweep(config: &Config, base: PathBuf) -> Result<()> {
    let mut orch = orchestrator(config, &base);
    if let Err(e) = orch.check_sources() {
        info!(error = %e, "Nothing to sweep");
        return Ok(());
    }

    let outcomes = orch.startup_sweep().await.context("Failed to write to console")?;
    info!(cycles = outcomes.len(), "Sweep finished");
    Ok(())
}

/// List configured sources
fn cmd_sources(config: &Config, base: PathBuf) -> Result<()> {
    let found = |present: bool| if present { "found".green() } else { "missing".red() };

    for source in config.resolved_sources(&base) {
        println!("{} ({})", source.name.bold(), source.pattern());
        println!("  watch:    {} [{}]", source.watch_dir.display(), found(source.watch_dir.is_dir()));
        println!("  artifact: {} [{}]", source.artifact.display(), found(source.artifact.exists()));
    }

    println!();
    println!("build:   {} {}", config.build.program, config.build.collection);
    println!("harness: {}", config.harness.program.display());
    Ok(())
}

/// Show logs
fn cmd_logs(lines: usize) -> Result<()> {
    let log_path = get_log_path();

    if !log_path.exists() {
        println!("No log file found at: {}", log_path.display());
        println!("koanwatch may not have been run yet.");
        return Ok(());
    }

    // Read last N lines
    let file = fs::File::open(&log_path).context("Failed to open log file")?;
    let reader = BufReader::new(file);
    let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{}", line);
    }

    Ok(())
}
