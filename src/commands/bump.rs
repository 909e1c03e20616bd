use clap::Args;
use serde::Serialize;

use modbump::bump::{self, BumpSpec};
use modbump::config::{BumpConfig, ConfigOverrides};
use modbump::module::Target;
use modbump::toolchain::ToolchainStep;
use modbump::transform::FileKind;
use modbump::utils::validation;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct BumpArgs {
    /// New module path, e.g. example.org/foo/v2
    new_path: String,
    /// Module root containing go.mod
    #[arg(long, default_value = ".")]
    path: String,
    /// Report the planned edits without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Do not run `go get` after bumping a dependency
    #[arg(long)]
    no_get: bool,
    /// Do not run `go mod tidy` after `go get`
    #[arg(long)]
    no_tidy: bool,
    /// Exclude paths matching this glob (relative to the module root)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum BumpOutput {
    #[serde(rename = "bump")]
    Bump {
        new_path: String,
        target: Target,
        dry_run: bool,
        files_scanned: usize,
        total_files: usize,
        edits: Vec<EditSummary>,
        applied: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        toolchain: Vec<ToolchainStep>,
    },
}

#[derive(Serialize)]
pub struct EditSummary {
    pub file: String,
    pub kind: FileKind,
}

pub fn run(args: BumpArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<BumpOutput> {
    let new_path = validation::require_non_empty(
        &args.new_path,
        "new_path",
        "New module path is required",
    )?
    .to_string();
    let root = crate::commands::resolve_root(&args.path)?;

    let config = BumpConfig::load(&root)?.apply_overrides(&ConfigOverrides {
        exclude: args.exclude,
        no_get: args.no_get,
        no_tidy: args.no_tidy,
    });

    let spec = BumpSpec::new(new_path).with_walk(config.walk_options());
    let mut result = bump::plan_bump(&spec, &root)?;

    let mut toolchain = Vec::new();
    if !args.dry_run {
        bump::apply_bump(&mut result, &root)?;
        toolchain = bump::run_toolchain(&result, &root, &config)?;
    }

    let exit_code = if result.changed() { 0 } else { 1 };

    Ok((
        BumpOutput::Bump {
            new_path: result.new_path,
            target: result.target,
            dry_run: args.dry_run,
            files_scanned: result.files_scanned,
            total_files: result.edits.len(),
            edits: result
                .edits
                .iter()
                .map(|e| EditSummary {
                    file: e.file.clone(),
                    kind: e.kind,
                })
                .collect(),
            applied: result.applied,
            toolchain,
        },
        exit_code,
    ))
}
