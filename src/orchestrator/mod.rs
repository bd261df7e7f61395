//! Orchestration of the watch, build, run, analyze, report cycle
//!
//! One [`Orchestrator`] owns the per-source state and processes change
//! notifications strictly one at a time.

mod core;
mod shutdown;
mod state;

pub use core::{Orchestrator, StartupError};
pub use shutdown::{enter_pressed, exit_requested};
pub use state::{CycleOutcome, Phase, SourceState};
