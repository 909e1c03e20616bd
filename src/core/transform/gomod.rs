use crate::error::Result;
use crate::modpath::{module_prefix, split_path_version};
use crate::module::parse_go_mod;

use super::{apply_splices, Splice, Transformer};

/// Replaces the module path in a go.mod file.
///
/// Only the `module` directive is touched, and only when the current module
/// path shares its prefix with the new one. Requirements are left for the Go
/// toolchain to update.
pub struct GoModTransformer {
    new_path: String,
}

impl GoModTransformer {
    pub fn new(new_path: impl Into<String>) -> Self {
        Self {
            new_path: new_path.into(),
        }
    }
}

impl Transformer for GoModTransformer {
    fn format(&self) -> &'static str {
        "go.mod"
    }

    fn transform(&self, content: &str) -> Result<Option<String>> {
        let target = split_path_version(&self.new_path)?;
        let go_mod = parse_go_mod(content, "go.mod")?;

        if module_prefix(&go_mod.module.path).as_deref() != Some(target.prefix.as_str()) {
            return Ok(None);
        }

        if go_mod.module.path == self.new_path {
            return Ok(None);
        }

        let replacement = if go_mod.module.quoted {
            format!("\"{}\"", self.new_path)
        } else {
            self.new_path.clone()
        };

        Ok(Some(apply_splices(
            content,
            vec![Splice {
                range: go_mod.module.span,
                replacement,
            }],
        )))
    }
}
