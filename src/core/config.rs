//! Optional per-module configuration, read from `modbump.json` next to go.mod.
//!
//! Command-line flags are layered over the file: `--exclude` adds globs,
//! `--no-get` and `--no-tidy` switch the toolchain steps off.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::io;
use crate::walk::WalkOptions;

pub const CONFIG_FILE: &str = "modbump.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BumpConfig {
    pub skip_dirs: Vec<String>,
    pub exclude: Vec<String>,
    pub go_get: bool,
    pub tidy: bool,
    pub go_binary: String,
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self {
            skip_dirs: Vec::new(),
            exclude: Vec::new(),
            go_get: true,
            tidy: true,
            go_binary: "go".to_string(),
        }
    }
}

/// Flag overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub exclude: Vec<String>,
    pub no_get: bool,
    pub no_tidy: bool,
}

impl BumpConfig {
    /// Load `modbump.json` from `dir`, or the defaults when it does not exist.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let label = path.display().to_string();
        let content = io::read_file(&path, &format!("read {}", label))?;
        Self::parse(&content, &label)
    }

    /// Parse configuration JSON. `label` names the source in errors.
    ///
    /// Malformed JSON is `config.invalid_json`; well-formed JSON that does not
    /// fit (unknown keys, wrong types) is `config.invalid_value`.
    pub fn parse(content: &str, label: &str) -> Result<Self> {
        let raw: Value =
            serde_json::from_str(content).map_err(|e| Error::config_invalid_json(label, e))?;

        let config: BumpConfig = serde_json::from_value(raw)
            .map_err(|e| Error::config_invalid_value(CONFIG_FILE, None, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.go_binary.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "go_binary",
                Some(self.go_binary.clone()),
                "must not be empty",
            ));
        }

        if let Some(glob) = self.exclude.iter().find(|g| g.trim().is_empty()) {
            return Err(Error::config_invalid_value(
                "exclude",
                Some(glob.clone()),
                "globs must not be empty",
            ));
        }

        Ok(())
    }

    pub fn apply_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        self.exclude.extend(overrides.exclude.iter().cloned());
        if overrides.no_get {
            self.go_get = false;
        }
        if overrides.no_tidy {
            self.tidy = false;
        }
        self
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            skip_dirs: self.skip_dirs.clone(),
            exclude: self.exclude.clone(),
        }
    }
}
