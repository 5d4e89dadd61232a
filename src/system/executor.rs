// src/system/executor.rs

use crate::CancellationToken;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use std::sync::atomic::Ordering;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with a non-zero error code.")]
    NonZeroExitStatus {
        command: String,
        /// Captured standard error, surfaced verbatim to the user.
        stderr: String,
    },
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("Operation was cancelled by the user.")]
    Cancelled,
}

/// Process-execution seam. Invoked at most once per confirmed generation
/// run and never retried by the caller.
pub trait CommandRunner {
    /// Runs `command_line` and returns its captured standard output.
    fn execute(&mut self, command_line: &str) -> Result<String, ExecutionError>;
}

/// Spawns the command directly via the OS, with a `cmd /C` fallback for
/// Windows shell built-ins.
#[derive(Debug)]
pub struct ShellRunner {
    cwd: PathBuf,
    cancellation_token: CancellationToken,
}

impl ShellRunner {
    pub fn new(cwd: impl Into<PathBuf>, cancellation_token: CancellationToken) -> Self {
        Self {
            cwd: cwd.into(),
            cancellation_token,
        }
    }
}

impl CommandRunner for ShellRunner {
    fn execute(&mut self, command_line: &str) -> Result<String, ExecutionError> {
        execute_and_capture(command_line, &self.cwd, &self.cancellation_token)
    }
}

/// Executes a command and captures its standard output and standard error.
/// Blocking; cancellation is only checked *before* starting, since a
/// generation command is expected to be short-lived.
pub fn execute_and_capture(
    command_line: &str,
    cwd: &Path,
    cancellation_token: &CancellationToken,
) -> Result<String, ExecutionError> {
    if cancellation_token.load(Ordering::SeqCst) {
        return Err(ExecutionError::Cancelled);
    }

    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let parts = shlex::split(trimmed_command)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?;
    let (program, args) = parts
        .split_first()
        .ok_or(ExecutionError::EmptyCommand)?;
    let clean_cwd = dunce::simplified(cwd);

    let spawn = |program: &str, args: &[String]| {
        StdCommand::new(program)
            .args(args)
            .current_dir(clean_cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
    };

    // Fallback logic for Windows built-in commands. Try a direct spawn
    // first; on `NotFound`, retry the whole line through `cmd /C`.
    let output = match spawn(program, args) {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(trimmed_command)
                .current_dir(clean_cwd)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?
        }
        Err(e) => {
            return Err(ExecutionError::CommandFailed(trimmed_command.to_string(), e));
        }
    };

    if !output.status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: trimmed_command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
        command: trimmed_command.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn token(cancelled: bool) -> CancellationToken {
        Arc::new(AtomicBool::new(cancelled))
    }

    #[test]
    fn empty_command_is_an_error() {
        let result = execute_and_capture("   ", Path::new("."), &token(false));
        assert!(matches!(result, Err(ExecutionError::EmptyCommand)));
    }

    #[test]
    fn cancelled_token_short_circuits() {
        let result = execute_and_capture("echo hi", Path::new("."), &token(true));
        assert!(matches!(result, Err(ExecutionError::Cancelled)));
    }

    #[test]
    fn unbalanced_quotes_fail_to_parse() {
        let result = execute_and_capture("echo \"oops", Path::new("."), &token(false));
        assert!(matches!(result, Err(ExecutionError::CommandParse(_))));
    }
}
