//! External command execution.
//!
//! [`CommandRunner`] is the seam between the provisioning procedure and the
//! operating system. The real implementation spawns processes with
//! `tokio::process`; tests substitute a scripted runner.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::Arc;

use tracing::debug;

use calsetup_core::{SetupError, SetupResult};

/// A boxed future for async trait methods.
///
/// Boxed futures keep [`CommandRunner`] object safe so the provisioner can
/// hold a `Box<dyn CommandRunner>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub status: Option<i32>,
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    /// Creates a successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Creates a failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Returns true if the command exited with status 0.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Returns the non-empty, trimmed lines of stdout.
    pub fn stdout_lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().map(str::trim).filter(|l| !l.is_empty())
    }
}

/// Runs external programs.
pub trait CommandRunner: Send + Sync {
    /// Resolves a program name to an executable path, or `None` if absent.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Runs a program to completion with captured output and no stdin.
    ///
    /// A non-zero exit is not an error here; callers decide what it means.
    fn capture<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, SetupResult<CommandOutput>>;

    /// Runs a program attached to the terminal, for interactive prompts.
    fn interactive<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, SetupResult<Option<i32>>>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for Arc<T> {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        (**self).locate(program)
    }

    fn capture<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, SetupResult<CommandOutput>> {
        (**self).capture(program, args)
    }

    fn interactive<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, SetupResult<Option<i32>>> {
        (**self).interactive(program, args)
    }
}

/// Formats a command line for logs and error messages.
pub fn command_line(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Runs commands on the local system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Creates a new system runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!(program, error = %e, "program not found");
                None
            }
        }
    }

    fn capture<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, SetupResult<CommandOutput>> {
        Box::pin(async move {
            let line = command_line(program, args);
            debug!(command = %line, "running");

            let output = tokio::process::Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|source| SetupError::Spawn {
                    command: line.clone(),
                    source,
                })?;

            let output = CommandOutput {
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            };
            debug!(command = %line, status = ?output.status, "finished");
            Ok(output)
        })
    }

    fn interactive<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> BoxFuture<'a, SetupResult<Option<i32>>> {
        Box::pin(async move {
            let line = command_line(program, args);
            debug!(command = %line, "running interactively");

            let status = tokio::process::Command::new(program)
                .args(args)
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(|source| SetupError::Spawn {
                    command: line.clone(),
                    source,
                })?;

            debug!(command = %line, status = ?status.code(), "finished");
            Ok(status.code())
        })
    }
}
