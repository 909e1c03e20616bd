//! Module tree walking.
//!
//! Follows the go command's conventions for what belongs to a module:
//! `testdata` directories and anything whose name starts with `.` or `_` are
//! ignored. On top of that, configured directory names and relative-path
//! globs can be excluded.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::transform::FileKind;

/// Directory names the go command never treats as part of a package.
const ALWAYS_SKIP_DIRS: &[&str] = &["testdata"];

#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Extra directory names skipped at any depth.
    pub skip_dirs: Vec<String>,
    /// Globs matched against `/`-separated paths relative to the root.
    pub exclude: Vec<String>,
}

impl WalkOptions {
    fn skips_dir(&self, name: &str) -> bool {
        ALWAYS_SKIP_DIRS.contains(&name) || self.skip_dirs.iter().any(|d| d == name)
    }

    fn excludes(&self, relative: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, relative))
    }
}

/// Collect every go.mod, Go and proto file under `root`, sorted.
pub fn walk_files(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_recursive(root, root, options, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_recursive(
    dir: &Path,
    root: &Path,
    options: &WalkOptions,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read dir {}", dir.display())))
        })?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if is_ignored_name(&name) {
            continue;
        }

        let relative = relative_slash_path(&path, root);
        if options.excludes(&relative) {
            continue;
        }

        // file_type() does not follow symlinks, so linked directories are
        // never descended into.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if options.skips_dir(&name) {
                continue;
            }
            walk_recursive(&path, root, options, files)?;
        } else if file_type.is_symlink() && path.is_dir() {
            continue;
        } else if FileKind::detect(&path).is_some() {
            files.push(path);
        }
    }

    Ok(())
}

fn is_ignored_name(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Path relative to `root`, `/`-separated on every platform.
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
