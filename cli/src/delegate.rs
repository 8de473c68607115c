//! External build tool invocation.
//!
//! The tool is probed with a bare invocation first so a missing install is
//! reported as such rather than as a failed build. The real run inherits
//! stdin, stdout and stderr, so progress output reaches the terminal as the
//! tool writes it.

use std::process::Stdio;

use kpod_core::error::{KpodError, Result};
use tokio::process::Command;

/// Runs one external program on behalf of the caller.
#[derive(Debug, Clone)]
pub struct ProcessDelegate {
    program: String,
}

impl ProcessDelegate {
    /// Create a delegate for `program` (a name looked up on `PATH`, or a path).
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The delegated program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check that the program can be found and runs.
    pub async fn probe(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| KpodError::DependencyMissing {
                tool: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(KpodError::DependencyMissing {
                tool: self.program.clone(),
                reason: output.status.to_string(),
            });
        }

        Ok(())
    }

    /// Probe, then run the program with `args` and wait for it to exit.
    pub async fn run(&self, args: &[String]) -> Result<()> {
        self.probe().await?;

        tracing::info!(program = %self.program, args = ?args, "Running build tool");

        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| KpodError::ExecutionFailed {
                tool: self.program.clone(),
                reason: e.to_string(),
                exit_code: None,
            })?;

        if !status.success() {
            return Err(KpodError::ExecutionFailed {
                tool: self.program.clone(),
                reason: status.to_string(),
                exit_code: status.code(),
            });
        }

        tracing::debug!(program = %self.program, "Build tool finished");
        Ok(())
    }
}
