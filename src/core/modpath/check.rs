use crate::error::{Error, Result};

use super::split::split_path_version;

const RESERVED_WINDOWS_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Validate a module path before it is used as a rewrite target.
///
/// Rules:
/// - elements are non-empty, separated by single slashes, with no leading or
///   trailing slash
/// - elements use ASCII letters, digits and `-._~`, and neither start nor end
///   with a dot
/// - the first element is a lowercase host name containing a dot
/// - the path splits into prefix and a valid major version
pub fn check_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::module_path_invalid(path, "empty string"));
    }

    if path.starts_with('/') || path.ends_with('/') {
        return Err(Error::module_path_invalid(
            path,
            "leading or trailing slash",
        ));
    }

    for (idx, elem) in path.split('/').enumerate() {
        check_element(path, elem)?;
        if idx == 0 {
            check_first_element(path, elem)?;
        }
    }

    split_path_version(path)?;
    Ok(())
}

fn check_element(path: &str, elem: &str) -> Result<()> {
    if elem.is_empty() {
        return Err(Error::module_path_invalid(path, "double slash"));
    }

    if elem == "." || elem == ".." {
        return Err(Error::module_path_invalid(
            path,
            format!("invalid path element '{}'", elem),
        ));
    }

    if elem.starts_with('.') {
        return Err(Error::module_path_invalid(
            path,
            format!("leading dot in path element '{}'", elem),
        ));
    }

    if elem.ends_with('.') {
        return Err(Error::module_path_invalid(
            path,
            format!("trailing dot in path element '{}'", elem),
        ));
    }

    if let Some(c) = elem.chars().find(|c| !is_module_path_char(*c)) {
        return Err(Error::module_path_invalid(
            path,
            format!("invalid char '{}'", c),
        ));
    }

    let short = elem.split('.').next().unwrap_or(elem);
    if RESERVED_WINDOWS_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(short))
    {
        return Err(Error::module_path_invalid(
            path,
            format!("'{}' disallowed as path element component on Windows", short),
        ));
    }

    Ok(())
}

fn check_first_element(path: &str, elem: &str) -> Result<()> {
    if !elem.contains('.') {
        return Err(Error::module_path_invalid(
            path,
            "missing dot in first path element",
        ));
    }

    if elem.starts_with('-') {
        return Err(Error::module_path_invalid(
            path,
            "leading dash in first path element",
        ));
    }

    if let Some(c) = elem
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
    {
        return Err(Error::module_path_invalid(
            path,
            format!("invalid char '{}' in first path element", c),
        ));
    }

    Ok(())
}

fn is_module_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}
