//! Build invoker

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::error::RunnerError;
use crate::config::BuildConfig;
use crate::domain::Source;

/// Builds the koan projects
#[async_trait]
pub trait BuildTool: Send + Sync {
    /// Build one source's project, or the whole collection when `scope` is None
    ///
    /// Returns the build tool's exit code. A process killed by a signal
    /// reports -1.
    async fn build(&self, scope: Option<&Source>) -> Result<i32, RunnerError>;
}

/// Runs the configured build executable as a child process
#[derive(Debug, Clone)]
pub struct CommandBuildTool {
    config: BuildConfig,
}

impl CommandBuildTool {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Arguments for a build of `scope` (or everything)
    pub fn arguments(&self, scope: Option<&Source>) -> Vec<String> {
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| arg.replace("{collection}", &self.config.collection))
            .collect();

        if let Some(source) = scope {
            args.extend(
                self.config
                    .project_args
                    .iter()
                    .map(|arg| arg.replace("{project}", &source.name)),
            );
        }
        args
    }
}

#[async_trait]
impl BuildTool for CommandBuildTool {
    async fn build(&self, scope: Option<&Source>) -> Result<i32, RunnerError> {
        let args = self.arguments(scope);
        debug!(program = %self.config.program, ?args, "CommandBuildTool::build: called");

        let mut command = Command::new(&self.config.program);
        command.args(&args).stdin(Stdio::null());
        if self.config.quiet {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let mut child = command.spawn().map_err(|source| RunnerError::Launch {
            program: self.config.program.clone(),
            source,
        })?;

        let status = child.wait().await.map_err(|source| RunnerError::Wait {
            program: self.config.program.clone(),
            source,
        })?;

        let exit_code = status.code().unwrap_or(-1);
        if exit_code == 0 {
            info!(project = ?scope.map(|s| &s.name), "Build succeeded");
        } else {
            warn!(project = ?scope.map(|s| &s.name), exit_code, "Build failed");
        }
        Ok(exit_code)
    }
}
