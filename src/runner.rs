//!
//! src/runner.rs
//!
//! Narrow capability for shelling out to external binaries so the
//! tool clients can be exercised against a scripted runner in tests
//!
//!

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::errors::AlbumizerError;

/// Captured output of a finished external command.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Both streams as one blob, for callers that scan tool chatter.
    pub fn combined(&self) -> String {
        let mut all = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !all.is_empty() && !all.ends_with('\n') {
                all.push('\n');
            }
            all.push_str(&self.stderr);
        }
        all
    }
}

/// Runs `program` with `args` to completion. A non-zero exit becomes
/// [`AlbumizerError::Tool`] carrying the captured output verbatim.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, AlbumizerError>;
}

/// Spawns via tokio::process under a bounded timeout; on expiry the
/// child is killed and the call fails instead of hanging the pipeline.
pub struct TokioRunner {
    timeout: std::time::Duration,
}

impl TokioRunner {
    pub fn new(timeout: std::time::Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, AlbumizerError> {
        tracing::debug!(tool = program, ?args, "running external command");

        let result = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, result).await {
            Err(_) => {
                return Err(AlbumizerError::Timeout {
                    tool: program.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AlbumizerError::Config(format!(
                    "{program} was not found in PATH"
                )));
            }
            Ok(Err(e)) => return Err(AlbumizerError::Io(e)),
            Ok(Ok(output)) => output,
        };

        let captured = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if output.status.success() {
            Ok(captured)
        } else {
            Err(AlbumizerError::Tool {
                tool: program.to_string(),
                status: output.status.code().unwrap_or(-1),
                output: captured.combined(),
            })
        }
    }
}
