//! Bump engine: move a module tree to a new major version of a module path.
//!
//! 1. Validate the new path and find what it corresponds to in go.mod
//! 2. Walk the module tree and run the transformers for each file kind
//! 3. Write the changed files (or return a dry-run preview)
//! 4. For a dependency, let the go command fetch it and tidy go.mod

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::BumpConfig;
use crate::error::Result;
use crate::modpath::check_path;
use crate::module::{read_module, Target};
use crate::toolchain::{self, ToolchainStep};
use crate::transform::{run_transformers, FileKind, TransformerSet};
use crate::utils::io;
use crate::walk::{relative_slash_path, walk_files, WalkOptions};

#[derive(Debug, Clone)]
pub struct BumpSpec {
    pub new_path: String,
    pub walk: WalkOptions,
}

impl BumpSpec {
    pub fn new(new_path: impl Into<String>) -> Self {
        Self {
            new_path: new_path.into(),
            walk: WalkOptions::default(),
        }
    }

    pub fn with_walk(mut self, walk: WalkOptions) -> Self {
        self.walk = walk;
        self
    }
}

/// A planned content change to one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    /// Path relative to the module root, `/`-separated.
    pub file: String,
    pub kind: FileKind,
    #[serde(skip)]
    pub new_content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BumpResult {
    pub new_path: String,
    pub target: Target,
    pub edits: Vec<FileEdit>,
    pub files_scanned: usize,
    pub applied: bool,
}

impl BumpResult {
    pub fn changed(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// Compute every file edit for moving `root` to `spec.new_path`.
///
/// Nothing is written. A file that cannot be transformed fails the whole
/// plan, with the file named in the error details.
pub fn plan_bump(spec: &BumpSpec, root: &Path) -> Result<BumpResult> {
    check_path(&spec.new_path)?;

    let module = read_module(root)?;
    let target = module.resolve_target(&spec.new_path)?;
    log_status!(
        "bump",
        "{} -> {} ({})",
        target.current(),
        spec.new_path,
        if target.is_dependency() { "dependency" } else { "main module" }
    );

    let transformers = TransformerSet::new(&spec.new_path)?;
    let files = walk_files(root, &spec.walk)?;

    let mut edits = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    for path in &files {
        let Some(kind) = FileKind::detect(path) else {
            continue;
        };

        // A symlinked file and its target are one file on disk.
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
        if !seen.insert(resolved) {
            continue;
        }
        let relative = relative_slash_path(path, root);

        let content = io::read_file(path, &format!("read {}", relative))?;
        let updated = run_transformers(&content, transformers.for_kind(kind))
            .map_err(|e| e.with_file(relative.clone()))?;

        if let Some(new_content) = updated {
            edits.push(FileEdit {
                file: relative,
                kind,
                new_content,
            });
        }
    }

    log_status!(
        "bump",
        "Scanned {} files, {} to rewrite",
        files.len(),
        edits.len()
    );

    Ok(BumpResult {
        new_path: spec.new_path.clone(),
        target,
        edits,
        files_scanned: files.len(),
        applied: false,
    })
}

/// Write planned edits to disk.
pub fn apply_bump(result: &mut BumpResult, root: &Path) -> Result<()> {
    for edit in &result.edits {
        let path: PathBuf = root.join(&edit.file);
        io::write_file_atomic(&path, &edit.new_content, &format!("write {}", edit.file))?;
        log_status!("bump", "Rewrote {}", edit.file);
    }

    result.applied = true;
    Ok(())
}

/// Run `go get` and `go mod tidy` after a dependency bump was applied.
///
/// Nothing runs for the main module, for a dry run, or when the config
/// switches the steps off. Tidy only runs after a successful get.
pub fn run_toolchain(
    result: &BumpResult,
    root: &Path,
    config: &BumpConfig,
) -> Result<Vec<ToolchainStep>> {
    let mut steps = Vec::new();

    if !result.applied || !result.target.is_dependency() || !config.go_get {
        return Ok(steps);
    }

    steps.push(toolchain::go_get(root, &config.go_binary, &result.new_path)?);
    if config.tidy {
        steps.push(toolchain::go_mod_tidy(root, &config.go_binary)?);
    }

    Ok(steps)
}
