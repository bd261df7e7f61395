//! Orchestrator state

use std::fmt;

use crate::domain::Analysis;
use crate::watcher::ChangeDebouncer;

/// Where the orchestrator is within a cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Building,
    Running,
    Reporting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Building => write!(f, "building"),
            Self::Running => write!(f, "running"),
            Self::Reporting => write!(f, "reporting"),
        }
    }
}

/// Mutable per-source state carried from one cycle to the next
#[derive(Debug, Clone, Default)]
pub struct SourceState {
    /// Snapshot from the previous cycle
    pub analysis: Analysis,

    /// Last forwarded change for this source
    pub debouncer: ChangeDebouncer,
}

impl SourceState {
    /// Back to the initial state: no history, next change always forwarded
    pub fn reset(&mut self) {
        self.analysis = Analysis::default();
        self.debouncer.reset();
    }
}

/// What happened to one change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No source owns the changed path
    Unowned,
    /// Same file and modification time as the last forwarded change
    Duplicate { source: usize },
    /// The changed file vanished before its timestamp could be read
    Unreadable { source: usize },
    /// The build left no artifact to run
    NoArtifact { source: usize },
    /// The build tool or harness could not be run
    Failed { source: usize },
    /// The harness ran and its output was analyzed
    Reported { source: usize, analysis: Analysis },
}

impl CycleOutcome {
    /// Index of the source this outcome belongs to
    pub fn source(&self) -> Option<usize> {
        match self {
            Self::Unowned => None,
            Self::Duplicate { source }
            | Self::Unreadable { source }
            | Self::NoArtifact { source }
            | Self::Failed { source }
            | Self::Reported { source, .. } => Some(*source),
        }
    }
}
