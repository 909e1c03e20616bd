//! Go toolchain steps run after a dependency has been moved to a new major
//! version, so go.mod and go.sum pick up the new requirement.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::utils::command::{self, CapturedOutput};

/// A toolchain command that ran successfully.
#[derive(Debug, Clone, Serialize)]
pub struct ToolchainStep {
    pub command: String,
    #[serde(skip_serializing_if = "CapturedOutput::is_empty")]
    pub output: CapturedOutput,
}

/// `go get <path>@latest` in `dir`.
pub fn go_get(dir: &Path, go_binary: &str, module_path: &str) -> Result<ToolchainStep> {
    let target = format!("{}@latest", module_path);
    run_step(dir, go_binary, &["get", &target])
}

/// `go mod tidy` in `dir`.
pub fn go_mod_tidy(dir: &Path, go_binary: &str) -> Result<ToolchainStep> {
    run_step(dir, go_binary, &["mod", "tidy"])
}

fn run_step(dir: &Path, go_binary: &str, args: &[&str]) -> Result<ToolchainStep> {
    let display = command::display_command(go_binary, args);
    log_status!("toolchain", "Running {}", display);

    let output = command::run_in(dir, go_binary, args)?;
    if !output.is_empty() {
        log_status!("toolchain", "{}", command::display_text(&output));
    }

    Ok(ToolchainStep {
        command: display,
        output,
    })
}
