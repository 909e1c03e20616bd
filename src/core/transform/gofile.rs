use std::ops::Range;

use crate::error::{Error, Result};
use crate::modpath::rewrite_import_path;

use super::{apply_splices, Splice, Transformer};

const FORMAT: &str = "go";

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Replaces import paths in a Go source file.
///
/// Import declarations are read with a small scanner over the file header
/// (package clause, then `import` declarations, comments skipped). Only the
/// string literals of matching imports are replaced; aliases, comments,
/// grouping and the literal's quote style stay as they are.
pub struct GoFileTransformer {
    new_path: String,
}

impl GoFileTransformer {
    pub fn new(new_path: impl Into<String>) -> Self {
        Self {
            new_path: new_path.into(),
        }
    }
}

impl Transformer for GoFileTransformer {
    fn format(&self) -> &'static str {
        FORMAT
    }

    fn transform(&self, content: &str) -> Result<Option<String>> {
        let mut splices = Vec::new();

        for spec in scan_imports(content)? {
            // Literals we cannot decode are left alone.
            let Some(path) = spec.path else {
                continue;
            };

            if let Some(rewritten) = rewrite_import_path(&self.new_path, &path)? {
                if rewritten != path {
                    splices.push(Splice {
                        range: spec.literal,
                        replacement: quote(&rewritten, spec.raw),
                    });
                }
            }
        }

        if splices.is_empty() {
            return Ok(None);
        }

        Ok(Some(apply_splices(content, splices)))
    }
}

/// One import spec of a Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Decoded path, `None` if the literal uses escapes we do not decode.
    pub path: Option<String>,
    /// Byte range of the string literal, quotes included.
    pub literal: Range<usize>,
    /// Raw (backquoted) literal.
    pub raw: bool,
}

/// Collect the import specs of a Go source file.
///
/// A leading byte order mark is skipped; literal ranges stay offsets into `src`.
pub fn scan_imports(src: &str) -> Result<Vec<ImportSpec>> {
    let pos = if src.starts_with(BYTE_ORDER_MARK) {
        BYTE_ORDER_MARK.len_utf8()
    } else {
        0
    };
    let mut scanner = Scanner { src, pos };
    let mut specs = Vec::new();

    scanner.skip_trivia()?;
    if !scanner.keyword("package") {
        return Err(Error::transform_failed(FORMAT, "expected package clause"));
    }
    scanner.skip_trivia()?;
    if scanner.ident().is_none() {
        return Err(Error::transform_failed(FORMAT, "expected package name"));
    }

    loop {
        scanner.skip_trivia()?;
        if !scanner.keyword("import") {
            break;
        }
        scanner.skip_trivia()?;

        if scanner.eat('(') {
            loop {
                scanner.skip_trivia()?;
                if scanner.eat(')') {
                    break;
                }
                specs.push(scanner.import_spec()?);
            }
        } else {
            specs.push(scanner.import_spec()?);
        }
    }

    Ok(specs)
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, semicolons and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            if let Some(c) = rest.chars().next().filter(|c| c.is_whitespace() || *c == ';') {
                self.pos += c.len_utf8();
            } else if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if let Some(body) = rest.strip_prefix("/*") {
                let end = body
                    .find("*/")
                    .ok_or_else(|| Error::transform_failed(FORMAT, "comment not terminated"))?;
                self.pos += end + 4;
            } else {
                return Ok(());
            }
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let len = rest
            .char_indices()
            .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
            .last()
            .map(|(idx, c)| idx + c.len_utf8())
            .unwrap_or(0);

        if len == 0 {
            return None;
        }

        self.pos += len;
        Some(&rest[..len])
    }

    fn keyword(&mut self, keyword: &str) -> bool {
        let start = self.pos;
        if self.ident() == Some(keyword) {
            return true;
        }
        self.pos = start;
        false
    }

    fn import_spec(&mut self) -> Result<ImportSpec> {
        // Package name or `.`, not needed for the rewrite.
        if self.eat('.') || self.ident().is_some() {
            self.skip_trivia()?;
        }

        let start = self.pos;
        let rest = self.rest();

        let (path, len, raw) = if let Some(body) = rest.strip_prefix('`') {
            let end = body
                .find('`')
                .ok_or_else(|| Error::transform_failed(FORMAT, "raw string literal not terminated"))?;
            (Some(body[..end].to_string()), end + 2, true)
        } else if let Some(body) = rest.strip_prefix('"') {
            let end = interpreted_end(body)
                .ok_or_else(|| Error::transform_failed(FORMAT, "string literal not terminated"))?;
            (unescape(&body[..end]), end + 2, false)
        } else {
            return Err(Error::transform_failed(FORMAT, "expected import path"));
        };

        self.pos += len;

        Ok(ImportSpec {
            path,
            literal: start..start + len,
            raw,
        })
    }
}

/// Index of the closing quote of an interpreted string body.
fn interpreted_end(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some(i),
            b'\n' => return None,
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
    None
}

fn unescape(body: &str) -> Option<String> {
    if !body.contains('\\') {
        return Some(body.to_string());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let decoded = match chars.next()? {
            '\\' => '\\',
            '"' => '"',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            'x' => hex_char(&mut chars, 2)?,
            'u' => hex_char(&mut chars, 4)?,
            'U' => hex_char(&mut chars, 8)?,
            _ => return None,
        };
        out.push(decoded);
    }

    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}

fn quote(path: &str, raw: bool) -> String {
    if raw {
        format!("`{}`", path)
    } else {
        format!("\"{}\"", path.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
