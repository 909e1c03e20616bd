use serde::Serialize;

use crate::error::{Error, Result};

use super::major::is_path_major;

/// Paths under this host carry their major version after a dot (`yaml.v2`).
pub const DOTTED_DIALECT_PREFIX: &str = "gopkg.in/";

const UNSTABLE_SUFFIX: &str = "-unstable";

/// A module path separated into its prefix and major version suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitPath {
    pub prefix: String,
    /// `v2` style segment for regular paths, `.v2` for the dotted dialect.
    /// `None` means major version 1.
    pub major: Option<String>,
}

impl SplitPath {
    fn unversioned(path: &str) -> Self {
        SplitPath {
            prefix: path.to_string(),
            major: None,
        }
    }

    /// Whether the path belongs to the dotted-version dialect.
    pub fn is_dotted(&self) -> bool {
        self.prefix.starts_with(DOTTED_DIALECT_PREFIX)
    }
}

/// Split a module path into prefix and major version.
///
/// A trailing segment that looks like a version (`v` followed by digits and
/// dots) must be a valid major suffix, otherwise the path is rejected:
/// `example.org/foo/v1` and `example.org/foo/v2.1` are errors rather than
/// unversioned paths.
pub fn split_path_version(path: &str) -> Result<SplitPath> {
    if path.is_empty() {
        return Err(Error::module_path_invalid(path, "path is empty"));
    }

    if path.starts_with(DOTTED_DIALECT_PREFIX) {
        return split_dotted(path);
    }

    let Some((prefix, last)) = path.rsplit_once('/') else {
        return Ok(SplitPath::unversioned(path));
    };

    if !looks_like_major(last) {
        return Ok(SplitPath::unversioned(path));
    }

    if prefix.is_empty() {
        return Err(Error::module_path_invalid(
            path,
            "major version suffix has no module path before it",
        ));
    }

    if !is_path_major(last) {
        return Err(Error::module_path_invalid(path, major_problem(last)));
    }

    Ok(SplitPath {
        prefix: prefix.to_string(),
        major: Some(last.to_string()),
    })
}

fn looks_like_major(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars.next() == Some('v')
        && segment.len() > 1
        && chars.all(|c| c.is_ascii_digit() || c == '.')
}

fn major_problem(segment: &str) -> &'static str {
    if segment == "v1" {
        "major version suffix v1 is not allowed, version 1 has no suffix"
    } else if segment.contains('.') {
        "major version suffix must not contain dots"
    } else {
        "major version suffix must not start with zero"
    }
}

fn split_dotted(path: &str) -> Result<SplitPath> {
    let body = path.strip_suffix(UNSTABLE_SUFFIX).unwrap_or(path);
    let head = body.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &body[head.len()..];

    let Some(prefix) = head.strip_suffix(".v") else {
        return Err(Error::module_path_invalid(
            path,
            "gopkg.in paths must end in .vN",
        ));
    };

    if digits.is_empty() {
        return Err(Error::module_path_invalid(
            path,
            "gopkg.in paths must end in .vN",
        ));
    }

    if digits.starts_with('0') && digits != "0" {
        return Err(Error::module_path_invalid(
            path,
            "major version must not start with zero",
        ));
    }

    if prefix.len() <= DOTTED_DIALECT_PREFIX.len() || prefix.ends_with('/') {
        return Err(Error::module_path_invalid(
            path,
            "gopkg.in path has no package name",
        ));
    }

    Ok(SplitPath {
        prefix: prefix.to_string(),
        major: Some(path[prefix.len()..].to_string()),
    })
}
