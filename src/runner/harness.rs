//! Harness invoker

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::error::RunnerError;
use crate::domain::Source;

/// Runs the koans in a built artifact
#[async_trait]
pub trait KoanHarness: Send + Sync {
    /// Run the harness against `source`'s artifact and capture its stdout
    ///
    /// Returns `Ok(None)` without doing anything when the artifact does not
    /// exist. Otherwise the artifact is deleted afterwards, whether the
    /// harness succeeded, failed, or could not be launched.
    async fn run(&self, source: &Source) -> Result<Option<String>, RunnerError>;
}

/// Runs the configured harness executable as a child process
#[derive(Debug, Clone)]
pub struct CommandHarness {
    program: PathBuf,
}

impl CommandHarness {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    async fn capture(&self, artifact: &Path) -> Result<String, RunnerError> {
        let output = Command::new(&self.program)
            .arg(artifact)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| RunnerError::Launch {
                program: self.program_name(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "CommandHarness::capture: harness wrote to stderr");
        }
        debug!(
            exit_code = ?output.status.code(),
            stdout_len = output.stdout.len(),
            "CommandHarness::capture: harness exited"
        );
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Delete a consumed artifact, tolerating one that is already gone
fn remove_artifact(artifact: &Path) {
    match std::fs::remove_file(artifact) {
        Ok(()) => debug!(?artifact, "remove_artifact: deleted"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(?artifact, error = %e, "Failed to delete artifact"),
    }
}

#[async_trait]
impl KoanHarness for CommandHarness {
    async fn run(&self, source: &Source) -> Result<Option<String>, RunnerError> {
        debug!(source = %source.name, artifact = ?source.artifact, "CommandHarness::run: called");

        if !source.artifact.exists() {
            debug!("CommandHarness::run: no artifact, skipping");
            return Ok(None);
        }

        let result = self.capture(&source.artifact).await;
        remove_artifact(&source.artifact);
        result.map(Some)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // `cat` prints the artifact, so the artifact's content doubles as harness output
    fn source_in(dir: &Path) -> Source {
        Source::new("cs", "CSharp", dir, dir.join("csharp.dll"))
    }

    #[tokio::test]
    async fn test_missing_artifact_skips_run() {
        let temp = tempfile::tempdir().unwrap();
        let harness = CommandHarness::new("cat");
        let source = source_in(temp.path());

        let output = harness.run(&source).await.unwrap();

        assert!(output.is_none());
        assert!(!source.artifact.exists());
    }

    #[tokio::test]
    async fn test_captures_stdout_and_deletes_artifact() {
        let temp = tempfile::tempdir().unwrap();
        let harness = CommandHarness::new("cat");
        let source = source_in(temp.path());
        std::fs::write(&source.artifact, "PASS: about_asserts\nTotal: 1, Completed: 1\n").unwrap();

        let output = harness.run(&source).await.unwrap().unwrap();

        assert!(output.contains("PASS: about_asserts"));
        assert!(output.contains("Total: 1, Completed: 1"));
        assert!(!source.artifact.exists());
    }

    #[tokio::test]
    async fn test_deletes_artifact_on_failing_exit() {
        let temp = tempfile::tempdir().unwrap();
        let harness = CommandHarness::new("false");
        let source = source_in(temp.path());
        std::fs::write(&source.artifact, "binary").unwrap();

        let output = harness.run(&source).await.unwrap().unwrap();

        assert!(output.is_empty());
        assert!(!source.artifact.exists());
    }

    #[tokio::test]
    async fn test_launch_failure_is_error_and_deletes_artifact() {
        let temp = tempfile::tempdir().unwrap();
        let harness = CommandHarness::new(temp.path().join("no-such-harness"));
        let source = source_in(temp.path());
        std::fs::write(&source.artifact, "binary").unwrap();

        let err = harness.run(&source).await.unwrap_err();

        assert!(matches!(err, RunnerError::Launch { .. }));
        assert!(!source.artifact.exists());
    }
}
