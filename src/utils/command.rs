//! Command execution primitives with consistent error handling.

use std::path::Path;
use std::process::{Command, Output};

use serde::Serialize;

use crate::error::{Error, Result, ToolchainCommandFailedDetails};

/// Captured output from command execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CapturedOutput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr: String,
}

impl CapturedOutput {
    pub fn new(stdout: String, stderr: String) -> Self {
        Self { stdout, stderr }
    }

    fn from_output(output: &Output) -> Self {
        Self::new(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty() && self.stderr.is_empty()
    }
}

/// Human-readable command line for messages.
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a command in a specific directory, capturing its output.
///
/// A command that cannot be spawned or exits unsuccessfully becomes a
/// `toolchain.command_failed` error carrying both output streams.
pub fn run_in(dir: &Path, program: &str, args: &[&str]) -> Result<CapturedOutput> {
    let command = display_command(program, args);

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            Error::toolchain_command_failed(ToolchainCommandFailedDetails {
                command: command.clone(),
                exit_code: None,
                stdout: String::new(),
                stderr: format!("Failed to run {}: {}", program, e),
            })
        })?;

    let captured = CapturedOutput::from_output(&output);

    if !output.status.success() {
        return Err(Error::toolchain_command_failed(
            ToolchainCommandFailedDetails {
                command,
                exit_code: output.status.code(),
                stdout: captured.stdout,
                stderr: captured.stderr,
            },
        ));
    }

    Ok(captured)
}

/// The stream worth showing a user.
///
/// Prefers stderr, where the go command reports progress, and falls back to
/// stdout if stderr is empty.
pub fn display_text(output: &CapturedOutput) -> &str {
    if !output.stderr.is_empty() {
        &output.stderr
    } else {
        &output.stdout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn run_in_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_in(dir.path(), "echo", &["hello"]).unwrap();
        assert_eq!(output.stdout, "hello");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn run_in_fails_with_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_in(dir.path(), "nonexistent_command_xyz", &["mod", "tidy"]).unwrap_err();
        assert_eq!(err.code.as_str(), "toolchain.command_failed");
        assert_eq!(err.details["command"], "nonexistent_command_xyz mod tidy");
    }

    #[cfg(unix)]
    #[test]
    fn run_in_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_in(dir.path(), "false", &[]).unwrap_err();
        assert_eq!(err.details["exitCode"], 1);
    }

    #[test]
    fn display_text_prefers_stderr() {
        let output = CapturedOutput::new("stdout content".into(), "stderr content".into());
        assert_eq!(display_text(&output), "stderr content");
    }

    #[test]
    fn display_text_falls_back_to_stdout() {
        let output = CapturedOutput::new("stdout content".into(), String::new());
        assert_eq!(display_text(&output), "stdout content");
        assert!(!output.is_empty());
    }
}
