//! Main Orchestrator implementation

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::state::{CycleOutcome, Phase, SourceState};
use crate::analysis::{analyze, split_lines};
use crate::domain::{Analysis, Source, find_owner};
use crate::report::Console;
use crate::runner::{BuildTool, KoanHarness};
use crate::watcher::ChangeEvent;

/// Conditions that stop koanwatch before any watching begins
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Koan directories not found: {}", display_paths(.0))]
    MissingSources(Vec<PathBuf>),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

/// Drives the watch, build, run, analyze, report cycle
///
/// The orchestrator owns every piece of per-source state and handles one
/// change at a time, so two cycles never touch the same source (or its
/// artifact) concurrently.
pub struct Orchestrator<B, H, W>
where
    B: BuildTool,
    H: KoanHarness,
    W: Write,
{
    sources: Vec<Source>,
    states: Vec<SourceState>,
    builder: B,
    harness: H,
    console: Console<W>,
    phase: Phase,
}

impl<B, H, W> Orchestrator<B, H, W>
where
    B: BuildTool,
    H: KoanHarness,
    W: Write,
{
    /// Create an orchestrator with fresh state for every source
    pub fn new(sources: Vec<Source>, builder: B, harness: H, console: Console<W>) -> Self {
        debug!(source_count = sources.len(), "Orchestrator::new: called");
        let states = sources.iter().map(|_| SourceState::default()).collect();
        Self {
            sources,
            states,
            builder,
            harness,
            console,
            phase: Phase::Idle,
        }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The snapshot the next cycle of source `index` will compare against
    pub fn analysis(&self, index: usize) -> Option<&Analysis> {
        self.states.get(index).map(|state| &state.analysis)
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, "Orchestrator: phase change");
        self.phase = phase;
    }

    /// Verify every watch directory exists
    ///
    /// Prints where the koans were expected when any is missing.
    pub fn check_sources(&mut self) -> Result<(), StartupError> {
        let missing: Vec<PathBuf> = self
            .sources
            .iter()
            .filter(|source| !source.watch_dir.is_dir())
            .map(|source| source.watch_dir.clone())
            .collect();

        if missing.is_empty() {
            debug!("Orchestrator::check_sources: all watch directories present");
            return Ok(());
        }

        error!(?missing, "Watch directories missing");
        if let Err(e) = self.console.missing_sources(&self.sources) {
            warn!(error = %e, "Failed to print missing sources");
        }
        Err(StartupError::MissingSources(missing))
    }

    /// Tell the user what is being watched and how to leave
    pub fn announce_watching(&mut self) -> io::Result<()> {
        self.console.watching(&self.sources)
    }

    /// Build everything once
    pub async fn build_everything(&mut self) -> io::Result<()> {
        info!("Building all sources");
        self.enter(Phase::Building);
        self.console.pondering(None)?;
        match self.builder.build(None).await {
            Ok(0) => {}
            Ok(exit_code) => warn!(exit_code, "Initial build failed"),
            Err(e) => {
                error!(error = %e, "Initial build could not run");
                self.console.runner_error(&e)?;
            }
        }
        self.enter(Phase::Idle);
        Ok(())
    }

    /// Run every source once against the initial build
    ///
    /// Each source starts the steady state with a fresh snapshot and an
    /// empty debouncer, so the first organic change is never swallowed.
    pub async fn sweep(&mut self) -> io::Result<Vec<CycleOutcome>> {
        let mut outcomes = Vec::with_capacity(self.sources.len());
        for index in 0..self.sources.len() {
            debug!(source = %self.sources[index].name, "Orchestrator::sweep: running");
            outcomes.push(self.run_and_report(index).await?);
            self.states[index].reset();
        }
        Ok(outcomes)
    }

    /// Build everything, then sweep every source
    pub async fn startup_sweep(&mut self) -> io::Result<Vec<CycleOutcome>> {
        self.build_everything().await?;
        self.sweep().await
    }

    /// Handle one filesystem notification
    pub async fn handle_change(&mut self, event: &ChangeEvent) -> io::Result<CycleOutcome> {
        debug!(path = ?event.path, "Orchestrator::handle_change: called");

        let Some((index, _)) = find_owner(&self.sources, &event.path) else {
            debug!(path = ?event.path, "Orchestrator::handle_change: no owning source");
            return Ok(CycleOutcome::Unowned);
        };

        match self.states[index].debouncer.observe_file(&event.path) {
            Ok(true) => {}
            Ok(false) => return Ok(CycleOutcome::Duplicate { source: index }),
            Err(e) => {
                debug!(path = ?event.path, error = %e, "Orchestrator::handle_change: cannot read timestamp");
                return Ok(CycleOutcome::Unreadable { source: index });
            }
        }

        info!(source = %self.sources[index].name, path = ?event.path, "Change detected");
        if !self.build_source(index).await? {
            self.enter(Phase::Idle);
            return Ok(CycleOutcome::Failed { source: index });
        }
        self.run_and_report(index).await
    }

    /// Build one source; false when the build tool could not be run at all
    async fn build_source(&mut self, index: usize) -> io::Result<bool> {
        self.enter(Phase::Building);
        let source = &self.sources[index];
        self.console.pondering(Some(source))?;

        match self.builder.build(Some(source)).await {
            Ok(0) => Ok(true),
            Ok(exit_code) => {
                // The run step will find no fresh artifact
                self.console.build_error(exit_code)?;
                Ok(true)
            }
            Err(e) => {
                error!(source = %source.name, error = %e, "Build could not run");
                self.console.runner_error(&e)?;
                Ok(false)
            }
        }
    }

    /// Run the harness for one source and report on its output
    async fn run_and_report(&mut self, index: usize) -> io::Result<CycleOutcome> {
        self.enter(Phase::Running);
        let source = &self.sources[index];

        // The harness alone decides whether there was an artifact to check
        let output = match self.harness.run(source).await {
            Ok(Some(output)) => {
                self.console.checking()?;
                output
            }
            Ok(None) => {
                debug!(source = %source.name, "Orchestrator::run_and_report: no artifact");
                self.console.no_artifact(source)?;
                self.enter(Phase::Idle);
                return Ok(CycleOutcome::NoArtifact { source: index });
            }
            Err(e) => {
                error!(source = %source.name, error = %e, "Harness could not run");
                self.console.runner_error(&e)?;
                self.enter(Phase::Idle);
                return Ok(CycleOutcome::Failed { source: index });
            }
        };

        self.enter(Phase::Reporting);
        let lines = split_lines(&output);
        let analysis = analyze(&lines, &self.states[index].analysis);
        self.console.report(&analysis, &lines)?;
        info!(
            source = %self.sources[index].name,
            completed = analysis.completed_koans,
            total = analysis.total_koans,
            "Koans checked"
        );

        self.states[index].analysis = analysis.clone();
        self.enter(Phase::Idle);
        Ok(CycleOutcome::Reported { source: index, analysis })
    }

    /// Process change events until `shutdown` resolves or the channel closes
    ///
    /// A cycle in flight always finishes before shutdown is noticed.
    pub async fn run(
        &mut self,
        mut events: mpsc::UnboundedReceiver<ChangeEvent>,
        shutdown: impl Future<Output = ()>,
    ) -> io::Result<()> {
        info!("Orchestrator started");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        warn!("Change channel closed");
                        break;
                    };
                    let outcome = self.handle_change(&event).await?;
                    debug!(?outcome, "Orchestrator::run: cycle finished");
                }
            }
        }

        info!("Orchestrator stopped");
        Ok(())
    }
}
