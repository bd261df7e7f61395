//! Source - one watched koan tree

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One watched code tree: the extension it owns, its project name, the
/// directory to watch, and where a successful build leaves its artifact.
///
/// Sources are loaded once from configuration and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// File extension owned by this source, without the leading dot
    #[serde(deserialize_with = "deserialize_extension")]
    pub extension: String,

    /// Project name, passed to the build tool for scoped builds
    pub name: String,

    /// Directory watched for changes
    #[serde(rename = "watch-dir")]
    pub watch_dir: PathBuf,

    /// Build output consumed (and deleted) by the harness
    pub artifact: PathBuf,
}

impl Source {
    /// Create a new source, normalizing the extension
    pub fn new(
        extension: impl AsRef<str>,
        name: impl Into<String>,
        watch_dir: impl Into<PathBuf>,
        artifact: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extension: normalize_extension(extension.as_ref()),
            name: name.into(),
            watch_dir: watch_dir.into(),
            artifact: artifact.into(),
        }
    }

    /// Check whether a changed path belongs to this source
    pub fn owns(&self, path: &Path) -> bool {
        let owned = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension));
        debug!(source = %self.name, ?path, owned, "Source::owns: called");
        owned
    }

    /// Glob-style pattern shown to the user, e.g. `*.cs`
    pub fn pattern(&self) -> String {
        format!("*.{}", self.extension)
    }

    /// Resolve relative paths against a base directory
    pub fn resolved(&self, base: &Path) -> Self {
        Self {
            extension: self.extension.clone(),
            name: self.name.clone(),
            watch_dir: base.join(&self.watch_dir),
            artifact: base.join(&self.artifact),
        }
    }
}

/// Strip the leading dot and lowercase an extension
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn deserialize_extension<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_extension(&raw))
}

/// Find the source owning a changed path
pub fn find_owner<'a>(sources: &'a [Source], path: &Path) -> Option<(usize, &'a Source)> {
    sources.iter().enumerate().find(|(_, source)| source.owns(path))
}
