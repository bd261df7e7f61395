//! Watcher configuration

use notify::RecursiveMode;
use serde::{Deserialize, Serialize};

/// Configuration for the source watchers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Watch subdirectories of each source directory too
    ///
    /// Off by default: build output folders often contain generated files
    /// with the source extension.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

fn default_recursive() -> bool {
    false
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { recursive: false }
    }
}

impl WatchConfig {
    /// Get the notify recursion mode
    pub fn recursive_mode(&self) -> RecursiveMode {
        if self.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        }
    }
}
