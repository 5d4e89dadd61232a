// src/cli/handlers/commons.rs

// Shared pieces used by both generation handlers.

use crate::constants::GENERATE_RUNNER;
use crate::system::executor::{CommandRunner, ExecutionError};
use anyhow::{Result, anyhow};
use colored::Colorize;
use std::env;
use std::path::PathBuf;

/// The project root the run operates on: the `--root` override, or the
/// current directory.
pub fn resolve_project_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match root {
        Some(path) => path,
        None => env::current_dir()?,
    };
    Ok(dunce::simplified(&root).to_path_buf())
}

/// Invocation paths may be given relative to the project root.
pub fn absolute_target(project_root: &std::path::Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_root.join(path)
    }
}

/// Hands the built schematic invocation to the process runner, exactly once.
/// Captured output is echoed; a failing command surfaces its stderr payload
/// verbatim before reporting the failure. Never retried.
pub fn launch_command(built_command: &str, runner: &mut dyn CommandRunner) -> Result<()> {
    let command_line = format!("{GENERATE_RUNNER} {built_command}");
    println!("{}", command_line.cyan());

    match runner.execute(&command_line) {
        Ok(stdout) => {
            println!("{stdout}");
            println!("{}", "Schematics worked!".green());
            Ok(())
        }
        Err(ExecutionError::NonZeroExitStatus { stderr, .. }) => {
            eprintln!("{stderr}");
            Err(anyhow!("Schematics failed, see output above."))
        }
        Err(e) => Err(e.into()),
    }
}
