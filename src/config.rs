//! koanwatch configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Source;
use crate::watcher::WatchConfig;

/// Main koanwatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Watched koan trees, in the order they are swept at startup
    pub sources: Vec<Source>,

    /// Build tool invocation
    pub build: BuildConfig,

    /// Koan harness invocation
    pub harness: HarnessConfig,

    /// Filesystem watch settings
    pub watch: WatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            build: BuildConfig::default(),
            harness: HarnessConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

/// The classic two-language koan layout
fn default_sources() -> Vec<Source> {
    vec![
        Source::new("cs", "CSharp", "CSharp", "CSharp/bin/debug/csharp.dll"),
        Source::new("vb", "VBNet", "VBNet", "VBNet/bin/debug/VBNet.dll"),
    ]
}

impl Config {
    /// Validate configuration before use
    ///
    /// Sources must exist, own a non-empty extension, and never share one.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(eyre::eyre!("No sources configured. Add at least one entry under `sources`."));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.extension.is_empty() {
                return Err(eyre::eyre!("Source '{}' has an empty extension", source.name));
            }
            if !seen.insert(source.extension.as_str()) {
                return Err(eyre::eyre!(
                    "Extension '.{}' is claimed by more than one source (last: '{}')",
                    source.extension,
                    source.name
                ));
            }
        }

        if self.build.program.trim().is_empty() {
            return Err(eyre::eyre!("build.program must not be empty"));
        }
        if self.harness.program.as_os_str().is_empty() {
            return Err(eyre::eyre!("harness.program must not be empty"));
        }
        Ok(())
    }

    /// Sources with relative paths resolved against `base`
    pub fn resolved_sources(&self, base: &Path) -> Vec<Source> {
        self.sources.iter().map(|source| source.resolved(base)).collect()
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .koanwatch.yml
        let local_config = PathBuf::from(".koanwatch.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/koanwatch/koanwatch.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("koanwatch").join("koanwatch.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Build tool invocation
///
/// The command line is `program` followed by `args` with `{collection}`
/// replaced, then `project-args` with `{project}` replaced when only one
/// source is rebuilt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build executable
    pub program: String,

    /// Project collection built at startup (solution, workspace manifest...)
    pub collection: String,

    /// Arguments selecting the collection
    pub args: Vec<String>,

    /// Extra arguments restricting the build to one project
    #[serde(rename = "project-args")]
    pub project_args: Vec<String>,

    /// Discard the build tool's own console output
    pub quiet: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "devenv".to_string(),
            collection: "DotNetKoans.sln".to_string(),
            args: vec!["{collection}".to_string(), "/build".to_string(), "Debug".to_string()],
            project_args: vec!["/project".to_string(), "{project}".to_string()],
            quiet: false,
        }
    }
}

/// Koan harness invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Harness executable, given the artifact path as its only argument
    pub program: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("KoanRunner/bin/debug/koanrunner.exe"),
        }
    }
}
