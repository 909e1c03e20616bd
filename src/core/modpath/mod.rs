//! Go module path handling: major version suffixes and import path rewriting.
//!
//! - `major` recognizes `/vN` suffix segments
//! - `split` separates a module path into prefix and major version
//! - `rewrite` moves an import path onto a new module path
//! - `check` validates a module path before anything is rewritten

mod check;
mod major;
mod rewrite;
mod split;

pub use check::check_path;
pub use major::is_path_major;
pub use rewrite::{classify_major_position, rewrite_import_path, MajorPosition};
pub use split::{split_path_version, SplitPath, DOTTED_DIALECT_PREFIX};

/// Module prefix of a path, or `None` when the path cannot be split.
pub fn module_prefix(path: &str) -> Option<String> {
    split_path_version(path).ok().map(|split| split.prefix)
}
