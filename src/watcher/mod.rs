//! Watcher module for koan source changes
//!
//! A [`WatchSet`] holds one filesystem watch per source and forwards writes
//! to files with the source's extension. A per-source [`ChangeDebouncer`]
//! collapses the duplicate notifications editors emit for a single save.

mod config;
mod debounce;
mod watch_set;

pub use config::WatchConfig;
pub use debounce::{ChangeDebouncer, normalize};
pub use watch_set::{ChangeEvent, WatchSet, is_relevant};
