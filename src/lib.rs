//! koanwatch - the Master who watches you walk the path of the koans
//!
//! koanwatch watches one or more source directories of a koan exercise. When
//! a koan file is saved it rebuilds the owning project, runs the koan harness
//! against the fresh build, and tells you how far along the path you are.
//!
//! # Core Concepts
//!
//! - **Source**: a language with its own extension, watch directory and build artifact
//! - **Cycle**: build, run the harness, analyze its output, report
//! - **Analysis**: the snapshot each cycle compares against to spot progress
//! - **One cycle at a time**: notifications are handled strictly in order
//!
//! # Modules
//!
//! - [`analysis`] - Harness output grammar, analyzer and progress bar
//! - [`master`] - The Master's commentary
//! - [`orchestrator`] - The cycle driver and shutdown triggers
//! - [`runner`] - Build tool and koan harness processes
//! - [`watcher`] - Filesystem watching and change debouncing
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod analysis;
pub mod cli;
pub mod config;
pub mod domain;
pub mod master;
pub mod orchestrator;
pub mod report;
pub mod runner;
pub mod watcher;

// Re-export commonly used types
pub use config::{BuildConfig, Config, HarnessConfig};
pub use domain::{Analysis, Source};
pub use orchestrator::{CycleOutcome, Orchestrator, Phase, StartupError};
pub use report::Console;
pub use runner::{BuildTool, CommandBuildTool, CommandHarness, KoanHarness, RunnerError};
pub use watcher::{ChangeEvent, WatchConfig, WatchSet};
