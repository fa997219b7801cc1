//! Safe subprocess execution.
//!
//! Provides utilities for running external commands safely with:
//! - No shell interpretation (direct exec)
//! - Optional sudo elevation prefix
//! - Optional timeouts (none means wait indefinitely)
//! - Captured stdout/stderr

use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{CommandErrorKind, SetupError};

/// Result of a subprocess execution.
#[derive(Debug, Clone)]
pub struct SubprocessResult {
    /// Whether the command exited successfully (exit code 0).
    pub success: bool,
    /// The exit code, if available.
    pub exit_code: Option<i32>,
    /// Captured stdout as a string.
    pub stdout: String,
    /// Captured stderr as a string.
    pub stderr: String,
}

impl SubprocessResult {
    /// Create a SubprocessResult from a std::process::Output.
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Builder for subprocess execution.
pub struct SubprocessBuilder {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    elevate: bool,
}

impl SubprocessBuilder {
    /// Create a new subprocess builder.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            timeout: None,
            elevate: false,
        }
    }

    /// Add arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Set a timeout for the command. Without one, `run` blocks until the
    /// process exits.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the command through sudo. The caller must hold elevation rights;
    /// sudo may prompt on the inherited terminal.
    pub fn elevate(mut self, elevate: bool) -> Self {
        self.elevate = elevate;
        self
    }

    /// Execute the command and wait for completion.
    ///
    /// With a timeout configured, the process is polled and killed when the
    /// limit is exceeded. Without one, this blocks until the process exits.
    pub fn run(self) -> Result<SubprocessResult, SetupError> {
        debug!(
            program = %self.program,
            args = ?self.args,
            elevate = self.elevate,
            timeout_secs = self.timeout.map(|t| t.as_secs()),
            "Executing subprocess"
        );

        let mut cmd = if self.elevate {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.program);
            cmd
        } else {
            Command::new(&self.program)
        };
        cmd.args(&self.args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let start = Instant::now();

        let Some(timeout) = self.timeout else {
            // No timeout: block until the process exits.
            let output = cmd.output().map_err(|e| SetupError::Command {
                kind: CommandErrorKind::ExecutionFailed {
                    message: format!("Failed to run {}: {}", self.program, e),
                },
            })?;
            let result = SubprocessResult::from_output(output);
            debug!(
                success = result.success,
                exit_code = ?result.exit_code,
                duration_ms = start.elapsed().as_millis(),
                "Subprocess completed"
            );
            return Ok(result);
        };

        // Spawn and poll for completion with timeout enforcement
        let mut child = cmd.spawn().map_err(|e| SetupError::Command {
            kind: CommandErrorKind::ExecutionFailed {
                message: format!("Failed to spawn {}: {}", self.program, e),
            },
        })?;

        let poll_interval = Duration::from_millis(100);

        loop {
            match child.try_wait() {
                Ok(Some(_status)) => {
                    // Process has finished - get the full output
                    let output = child.wait_with_output().map_err(|e| SetupError::Command {
                        kind: CommandErrorKind::ExecutionFailed {
                            message: format!("Failed to get output from {}: {}", self.program, e),
                        },
                    })?;
                    let result = SubprocessResult::from_output(output);
                    debug!(
                        success = result.success,
                        exit_code = ?result.exit_code,
                        duration_ms = start.elapsed().as_millis(),
                        "Subprocess completed"
                    );
                    return Ok(result);
                }
                Ok(None) => {
                    // Process still running - check timeout
                    if start.elapsed() > timeout {
                        warn!(
                            program = %self.program,
                            timeout_secs = timeout.as_secs(),
                            "Process timed out, killing"
                        );
                        if let Err(e) = child.kill() {
                            warn!(error = %e, "Failed to kill timed-out process");
                        }
                        // Reap the zombie process
                        let _ = child.wait();
                        return Err(SetupError::Command {
                            kind: CommandErrorKind::Timeout {
                                timeout_secs: timeout.as_secs(),
                            },
                        });
                    }
                    std::thread::sleep(poll_interval);
                }
                Err(e) => {
                    return Err(SetupError::Command {
                        kind: CommandErrorKind::ExecutionFailed {
                            message: format!("Failed to check process status: {}", e),
                        },
                    });
                }
            }
        }
    }
}

/// Run a command with the given arguments and optional timeout.
///
/// This is a convenience function for simple, non-elevated command execution.
pub fn run_command(
    program: &str,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<SubprocessResult, SetupError> {
    SubprocessBuilder::new(program)
        .args(args.iter().copied())
        .timeout(timeout)
        .run()
}
