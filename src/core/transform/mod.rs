//! Per-format transformers that move module paths inside file contents.
//!
//! Each format locates the module paths its grammar can carry, asks
//! [`crate::modpath::rewrite_import_path`] for the replacement and splices the
//! result back. A transformer returns new content only when some path's text
//! actually changed, so callers never rewrite an untouched file.
//!
//! - `gomod` - the `module` directive of go.mod
//! - `gofile` - import declarations of Go sources
//! - `proto` - `import` statements and `go_package` options of .proto files

mod gofile;
mod gomod;
mod proto;

pub use gofile::{scan_imports, GoFileTransformer, ImportSpec};
pub use gomod::GoModTransformer;
pub use proto::ProtoTransformer;

use crate::error::Result;
use crate::module::GO_MOD_FILE;
use serde::Serialize;
use std::ops::Range;
use std::path::Path;

/// Transforms the content of a file for a new module path.
pub trait Transformer {
    /// Short format name, added to the details of any error it returns.
    fn format(&self) -> &'static str;

    /// Returns the new content, or `None` when nothing changed.
    fn transform(&self, content: &str) -> Result<Option<String>>;
}

/// File kinds that can carry module paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    GoMod,
    Go,
    Proto,
}

impl FileKind {
    pub fn detect(path: &Path) -> Option<Self> {
        if path.file_name().and_then(|n| n.to_str()) == Some(GO_MOD_FILE) {
            return Some(FileKind::GoMod);
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("go") => Some(FileKind::Go),
            Some("proto") => Some(FileKind::Proto),
            _ => None,
        }
    }
}

/// The transformers for every file kind, built once per run.
pub struct TransformerSet {
    go_mod: Vec<Box<dyn Transformer>>,
    go: Vec<Box<dyn Transformer>>,
    proto: Vec<Box<dyn Transformer>>,
}

impl TransformerSet {
    pub fn new(new_path: &str) -> Result<Self> {
        Ok(Self {
            go_mod: vec![Box::new(GoModTransformer::new(new_path))],
            go: vec![Box::new(GoFileTransformer::new(new_path))],
            proto: vec![Box::new(ProtoTransformer::new(new_path)?)],
        })
    }

    pub fn for_kind(&self, kind: FileKind) -> &[Box<dyn Transformer>] {
        match kind {
            FileKind::GoMod => &self.go_mod,
            FileKind::Go => &self.go,
            FileKind::Proto => &self.proto,
        }
    }
}

/// Run transformers in order, each one seeing the previous one's output.
///
/// On conflicting changes the last transformer wins. Returns `None` when no
/// transformer changed the content.
pub fn run_transformers(content: &str, transformers: &[Box<dyn Transformer>]) -> Result<Option<String>> {
    let mut current: Option<String> = None;

    for transformer in transformers {
        let input = current.as_deref().unwrap_or(content);
        let output = transformer
            .transform(input)
            .map_err(|e| e.with_format(transformer.format()))?;
        if let Some(next) = output {
            current = Some(next);
        }
    }

    Ok(current.filter(|updated| updated != content))
}

/// A replacement of a byte range in the original content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Splice {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Apply non-overlapping splices, working back to front so earlier offsets
/// stay valid.
pub(crate) fn apply_splices(content: &str, mut splices: Vec<Splice>) -> String {
    splices.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut out = content.to_string();
    for splice in splices {
        out.replace_range(splice.range, &splice.replacement);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Append(&'static str);

    impl Transformer for Append {
        fn format(&self) -> &'static str {
            "test"
        }

        fn transform(&self, content: &str) -> Result<Option<String>> {
            Ok(Some(format!("{}{}", content, self.0)))
        }
    }

    struct Noop;

    impl Transformer for Noop {
        fn format(&self) -> &'static str {
            "noop"
        }

        fn transform(&self, _content: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    struct Reject;

    impl Transformer for Reject {
        fn format(&self) -> &'static str {
            "reject"
        }

        fn transform(&self, content: &str) -> Result<Option<String>> {
            Err(crate::error::Error::module_path_invalid(content, "rejected"))
        }
    }

    #[test]
    fn errors_name_the_failing_format() {
        let chain: Vec<Box<dyn Transformer>> = vec![Box::new(Append("a")), Box::new(Reject)];
        let err = run_transformers("x", &chain).unwrap_err();
        assert_eq!(err.code.as_str(), "modpath.invalid");
        assert_eq!(err.details["format"], "reject");

        let set = TransformerSet::new("example.org/foo/v2").unwrap();
        let err = run_transformers("not go", set.for_kind(FileKind::Go)).unwrap_err();
        assert_eq!(err.details["format"], "go");
    }

    #[test]
    fn detects_file_kinds() {
        assert_eq!(FileKind::detect(Path::new("a/go.mod")), Some(FileKind::GoMod));
        assert_eq!(FileKind::detect(Path::new("a/main.go")), Some(FileKind::Go));
        assert_eq!(FileKind::detect(Path::new("api/v1/x.proto")), Some(FileKind::Proto));
        assert_eq!(FileKind::detect(Path::new("go.sum")), None);
        assert_eq!(FileKind::detect(Path::new("README.md")), None);
    }

    #[test]
    fn transformers_run_in_order() {
        let chain: Vec<Box<dyn Transformer>> =
            vec![Box::new(Append("a")), Box::new(Noop), Box::new(Append("b"))];
        assert_eq!(run_transformers("x", &chain).unwrap().as_deref(), Some("xab"));
    }

    #[test]
    fn untouched_content_reports_none() {
        let chain: Vec<Box<dyn Transformer>> = vec![Box::new(Noop)];
        assert_eq!(run_transformers("x", &chain).unwrap(), None);
    }

    #[test]
    fn splices_apply_back_to_front() {
        let out = apply_splices(
            "import \"a\"; import \"b\"",
            vec![
                Splice {
                    range: 7..10,
                    replacement: "\"aa/v2\"".to_string(),
                },
                Splice {
                    range: 19..22,
                    replacement: "\"bb\"".to_string(),
                },
            ],
        );
        assert_eq!(out, "import \"aa/v2\"; import \"bb\"");
    }
}
