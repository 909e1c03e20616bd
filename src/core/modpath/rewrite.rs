use crate::error::Result;

use super::major::is_path_major;
use super::split::split_path_version;

/// Where a major version suffix sits in the path elements following a
/// module prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorPosition {
    /// Right after the module prefix.
    Canonical,
    /// Nowhere in the tail.
    Absent,
    /// Deeper in the tail, where the new module path cannot account for it.
    Conflict,
}

/// Classify the path elements that follow a module prefix.
pub fn classify_major_position(tail: &[&str]) -> MajorPosition {
    match tail.split_first() {
        None => MajorPosition::Absent,
        Some((first, _)) if is_path_major(first) => MajorPosition::Canonical,
        Some((_, rest)) if rest.iter().any(|el| is_path_major(el)) => MajorPosition::Conflict,
        Some(_) => MajorPosition::Absent,
    }
}

/// Move `import_path` onto `new_module`.
///
/// Returns `Ok(None)` when the import path belongs to another module, is
/// already equal to the new module path, or carries a major version in a
/// position the new module path does not explain. The returned path may be
/// textually equal to the input (e.g. `.../v2/sub` under `.../v2`).
///
/// Fails only when `new_module` itself cannot be split into prefix and major
/// version.
pub fn rewrite_import_path(new_module: &str, import_path: &str) -> Result<Option<String>> {
    if new_module.is_empty() || import_path.is_empty() || new_module == import_path {
        return Ok(None);
    }

    let split = split_path_version(new_module)?;

    if split.is_dotted() {
        return Ok(rewrite_dotted(new_module, &split.prefix, import_path));
    }

    let Some(rest) = strip_module_prefix(import_path, &split.prefix) else {
        return Ok(None);
    };

    let mut tail: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').collect()
    };
    let major = split.major.as_deref();

    match classify_major_position(&tail) {
        MajorPosition::Conflict => return Ok(None),
        MajorPosition::Canonical => match major {
            Some(major) => tail[0] = major,
            None => {
                tail.remove(0);
            }
        },
        MajorPosition::Absent => {
            if let Some(major) = major {
                tail.insert(0, major);
            }
        }
    }

    let mut rewritten = split.prefix;
    for el in tail {
        rewritten.push('/');
        rewritten.push_str(el);
    }

    Ok(Some(rewritten))
}

/// Remainder of `path` after `prefix`, only when the prefix ends on a path
/// element boundary. The leading slash is dropped.
fn strip_module_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// Dotted dialect: any path rooted at `prefix` plus a dotted version marker
/// (`gopkg.in/yaml.v1`, `gopkg.in/yaml.v1/sub`) is replaced by the new module
/// path as a whole.
fn rewrite_dotted(new_module: &str, prefix: &str, import_path: &str) -> Option<String> {
    let rest = import_path.strip_prefix(prefix)?;
    let root_major = rest.split('/').next().unwrap_or(rest);

    if !is_dotted_major(root_major) {
        return None;
    }

    Some(new_module.to_string())
}

fn is_dotted_major(s: &str) -> bool {
    let s = s.strip_suffix("-unstable").unwrap_or(s);
    s.strip_prefix(".v")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(new_module: &str, import_path: &str) -> Option<String> {
        rewrite_import_path(new_module, import_path).unwrap()
    }

    #[test]
    fn v1_to_v2_without_subdirs() {
        assert_eq!(
            rewrite("example.org/foo/bar/v2", "example.org/foo/bar").as_deref(),
            Some("example.org/foo/bar/v2")
        );
    }

    #[test]
    fn v1_to_v2_with_subdirs() {
        assert_eq!(
            rewrite("example.org/foo/bar/v2", "example.org/foo/bar/sub/dir").as_deref(),
            Some("example.org/foo/bar/v2/sub/dir")
        );
    }

    #[test]
    fn v2_to_v3() {
        assert_eq!(
            rewrite("example.org/foo/bar/v3", "example.org/foo/bar/v2").as_deref(),
            Some("example.org/foo/bar/v3")
        );
        assert_eq!(
            rewrite("example.org/foo/bar/v3", "example.org/foo/bar/v2/sub/dir").as_deref(),
            Some("example.org/foo/bar/v3/sub/dir")
        );
    }

    #[test]
    fn v2_to_v1() {
        assert_eq!(
            rewrite("example.org/foo/bar", "example.org/foo/bar/v2").as_deref(),
            Some("example.org/foo/bar")
        );
        assert_eq!(
            rewrite("example.org/foo/bar", "example.org/foo/bar/v2/sub/dir").as_deref(),
            Some("example.org/foo/bar/sub/dir")
        );
    }

    #[test]
    fn round_trip_restores_original() {
        let bumped = rewrite("example.org/foo/bar/v2", "example.org/foo/bar").unwrap();
        assert_eq!(
            rewrite("example.org/foo/bar", &bumped).as_deref(),
            Some("example.org/foo/bar")
        );
    }

    #[test]
    fn unrelated_path_is_not_matched() {
        assert_eq!(rewrite("example.org/foo/bar/v2", "example.org/bar/foo"), None);
    }

    #[test]
    fn prefix_must_end_on_element_boundary() {
        assert_eq!(rewrite("example.org/foo/bar/v2", "example.org/foo/barbaz"), None);
        assert_eq!(rewrite("example.org/foo/bar/v2", "example.org/foo/barbaz/v2"), None);
    }

    #[test]
    fn equal_and_empty_inputs_are_noops() {
        assert_eq!(rewrite("example.org/foo/bar/v2", "example.org/foo/bar/v2"), None);
        assert_eq!(rewrite("", "example.org/foo/bar"), None);
        assert_eq!(rewrite("example.org/foo/bar/v2", ""), None);
    }

    #[test]
    fn major_in_unexpected_position_is_not_matched() {
        assert_eq!(
            rewrite("example.org/foo/bar/v2", "example.org/foo/bar/v/v2v/v3"),
            None
        );
        assert_eq!(rewrite("example.org/foo/bar", "example.org/foo/bar/sub/v2/x"), None);
    }

    #[test]
    fn already_current_subpath_converges() {
        assert_eq!(
            rewrite("example.org/foo/bar/v2", "example.org/foo/bar/v2/sub").as_deref(),
            Some("example.org/foo/bar/v2/sub")
        );
    }

    #[test]
    fn rewriting_twice_is_stable() {
        let once = rewrite("example.org/foo/bar/v2", "example.org/foo/bar/sub").unwrap();
        assert_eq!(rewrite("example.org/foo/bar/v2", &once), Some(once.clone()));
    }

    #[test]
    fn invalid_new_module_is_an_error() {
        let err = rewrite_import_path("example.org/foo/bar/v1", "example.org/foo/bar").unwrap_err();
        assert_eq!(err.code.as_str(), "modpath.invalid");
    }

    #[test]
    fn dotted_dialect_replaces_whole_path() {
        assert_eq!(
            rewrite("gopkg.in/yaml.v2", "gopkg.in/yaml.v1").as_deref(),
            Some("gopkg.in/yaml.v2")
        );
        assert_eq!(
            rewrite("gopkg.in/yaml.v1", "gopkg.in/yaml.v2").as_deref(),
            Some("gopkg.in/yaml.v1")
        );
        assert_eq!(
            rewrite("gopkg.in/yaml.v3", "gopkg.in/yaml.v2/sub").as_deref(),
            Some("gopkg.in/yaml.v3")
        );
        assert_eq!(
            rewrite("gopkg.in/check.v1", "gopkg.in/check.v2-unstable/a/b").as_deref(),
            Some("gopkg.in/check.v1")
        );
    }

    #[test]
    fn dotted_dialect_ignores_other_paths() {
        assert_eq!(rewrite("gopkg.in/yaml.v2", "example.org/foo/bar"), None);
        assert_eq!(rewrite("gopkg.in/yaml.v2", "gopkg.in/yamlx.v1"), None);
        assert_eq!(rewrite("gopkg.in/yaml.v2", "gopkg.in/yaml"), None);
    }

    #[test]
    fn classify_major_position_branches() {
        assert_eq!(classify_major_position(&[]), MajorPosition::Absent);
        assert_eq!(classify_major_position(&["v2", "sub"]), MajorPosition::Canonical);
        assert_eq!(classify_major_position(&["sub", "dir"]), MajorPosition::Absent);
        assert_eq!(classify_major_position(&["v", "v2v", "v3"]), MajorPosition::Conflict);
    }
}
