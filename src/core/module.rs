//! `go.mod` reading.
//!
//! Only the directives modbump needs are understood: the `module` directive
//! (with the byte span of its path, for splicing) and `require` directives,
//! single-line or in blocks, with their `// indirect` markers. Everything
//! else is skipped line by line.

use crate::error::{Error, Result};
use crate::modpath::module_prefix;
use crate::utils::io;
use serde::Serialize;
use std::ops::Range;
use std::path::Path;

pub const GO_MOD_FILE: &str = "go.mod";

/// The `module` directive of a go.mod file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDirective {
    pub path: String,
    /// Byte range of the path token in the file, quotes included.
    pub span: Range<usize>,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Require {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoMod {
    pub module: ModuleDirective,
    pub requires: Vec<Require>,
}

impl GoMod {
    pub fn direct_requires(&self) -> impl Iterator<Item = &Require> {
        self.requires.iter().filter(|r| !r.indirect)
    }
}

/// The main module and its direct dependencies.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub path: String,
    pub direct_requires: Vec<String>,
}

/// What a new module path corresponds to in the current module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// The main module itself is being moved.
    MainModule { current: String },
    /// A direct dependency is being moved.
    Dependency { current: String },
}

impl Target {
    pub fn current(&self) -> &str {
        match self {
            Target::MainModule { current } | Target::Dependency { current } => current,
        }
    }

    pub fn is_dependency(&self) -> bool {
        matches!(self, Target::Dependency { .. })
    }
}

impl ModuleInfo {
    /// Find the module that `new_path` is a new major version of.
    ///
    /// The main module wins over a dependency with the same prefix.
    pub fn resolve_target(&self, new_path: &str) -> Result<Target> {
        let wanted = module_prefix(new_path)
            .ok_or_else(|| Error::module_path_invalid(new_path, "cannot split major version"))?;

        if module_prefix(&self.path).as_deref() == Some(wanted.as_str()) {
            return Ok(Target::MainModule {
                current: self.path.clone(),
            });
        }

        self.direct_requires
            .iter()
            .find(|dep| module_prefix(dep).as_deref() == Some(wanted.as_str()))
            .map(|dep| Target::Dependency {
                current: dep.clone(),
            })
            .ok_or_else(|| {
                Error::module_not_related(new_path, &self.path, self.direct_requires.clone())
            })
    }
}

/// Read the go.mod file in `dir`.
pub fn read_module(dir: &Path) -> Result<ModuleInfo> {
    let go_mod_path = dir.join(GO_MOD_FILE);
    if !go_mod_path.is_file() {
        return Err(Error::go_mod_missing(dir.display().to_string()));
    }

    let label = go_mod_path.display().to_string();
    let content = io::read_file(&go_mod_path, &format!("read {}", label))?;
    let go_mod = parse_go_mod(&content, &label)?;

    Ok(ModuleInfo {
        path: go_mod.module.path.clone(),
        direct_requires: go_mod.direct_requires().map(|r| r.path.clone()).collect(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Other,
}

/// Parse the parts of a go.mod file modbump cares about.
///
/// `label` names the file in errors.
pub fn parse_go_mod(content: &str, label: &str) -> Result<GoMod> {
    let mut module: Option<ModuleDirective> = None;
    let mut requires = Vec::new();
    let mut block = Block::None;
    let mut offset = 0;

    for (idx, raw_line) in content.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += raw_line.len();
        let line_no = idx + 1;

        let (code, comment) = split_comment(raw_line.trim_end_matches(['\n', '\r']));
        let trimmed = code.trim();
        if trimmed.is_empty() {
            continue;
        }

        if block != Block::None {
            if trimmed == ")" {
                block = Block::None;
            } else if block == Block::Require {
                requires.push(parse_require(trimmed, comment, label, line_no)?);
            }
            continue;
        }

        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (trimmed, ""),
        };

        match verb {
            "module" => {
                if module.is_some() {
                    return Err(Error::go_mod_invalid(
                        label,
                        Some(line_no),
                        "repeated module statement",
                    ));
                }
                let start = line_start + token_offset(raw_line, rest);
                module = Some(parse_module_token(rest, start, label, line_no)?);
            }
            "require" if rest == "(" => block = Block::Require,
            "require" => requires.push(parse_require(rest, comment, label, line_no)?),
            _ if rest == "(" || rest.ends_with(" (") => block = Block::Other,
            _ => {}
        }
    }

    if block != Block::None {
        return Err(Error::go_mod_invalid(label, None, "unterminated block"));
    }

    let module = module
        .ok_or_else(|| Error::go_mod_invalid(label, None, "missing module statement"))?;

    Ok(GoMod { module, requires })
}

/// Split a line at `//`, ignoring slashes inside quoted strings.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let mut in_quotes = false;
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_quotes = !in_quotes,
            b'\\' if in_quotes => i += 1,
            b'/' if !in_quotes && bytes.get(i + 1) == Some(&b'/') => {
                return (&line[..i], Some(&line[i + 2..]));
            }
            _ => {}
        }
        i += 1;
    }
    (line, None)
}

/// Byte offset of `token` (a subslice of `line`) within `line`.
fn token_offset(line: &str, token: &str) -> usize {
    token.as_ptr() as usize - line.as_ptr() as usize
}

fn parse_module_token(
    token: &str,
    start: usize,
    label: &str,
    line_no: usize,
) -> Result<ModuleDirective> {
    if token.is_empty() {
        return Err(Error::go_mod_invalid(
            label,
            Some(line_no),
            "module statement has no path",
        ));
    }

    let (path, quoted) = unquote(token)
        .ok_or_else(|| Error::go_mod_invalid(label, Some(line_no), "invalid quoted module path"))?;

    if path.split_whitespace().count() != 1 {
        return Err(Error::go_mod_invalid(
            label,
            Some(line_no),
            "module statement expects a single path",
        ));
    }

    Ok(ModuleDirective {
        path,
        span: start..start + token.len(),
        quoted,
    })
}

fn parse_require(
    entry: &str,
    comment: Option<&str>,
    label: &str,
    line_no: usize,
) -> Result<Require> {
    let mut fields = entry.split_whitespace();
    let (Some(path), Some(version), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(Error::go_mod_invalid(
            label,
            Some(line_no),
            "require expects a module path and a version",
        ));
    };

    let (path, _) = unquote(path)
        .ok_or_else(|| Error::go_mod_invalid(label, Some(line_no), "invalid quoted module path"))?;

    let indirect = comment.is_some_and(|c| {
        let c = c.trim();
        c == "indirect" || c.starts_with("indirect;")
    });

    Ok(Require {
        path,
        version: version.to_string(),
        indirect,
    })
}

fn unquote(token: &str) -> Option<(String, bool)> {
    match token.strip_prefix('"') {
        Some(inner) => inner
            .strip_suffix('"')
            .filter(|s| !s.contains('"') && !s.contains('\\'))
            .map(|s| (s.to_string(), true)),
        None => Some((token.to_string(), false)),
    }
}
