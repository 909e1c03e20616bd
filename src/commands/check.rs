use clap::Args;
use serde::Serialize;

use modbump::modpath::{self, SplitPath};
use modbump::module::{self, Target};
use modbump::utils::validation;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct CheckArgs {
    /// New module path to validate
    new_path: String,
    /// Module root containing go.mod
    #[arg(long, default_value = ".")]
    path: String,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum CheckOutput {
    #[serde(rename = "check")]
    Check {
        new_path: String,
        split: SplitPath,
        main_module: String,
        target: Target,
    },
}

pub fn run(args: CheckArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<CheckOutput> {
    let new_path = validation::require_non_empty(
        &args.new_path,
        "new_path",
        "New module path is required",
    )?;
    let root = crate::commands::resolve_root(&args.path)?;

    modpath::check_path(new_path)?;
    let split = modpath::split_path_version(new_path)?;

    let info = module::read_module(&root)?;
    let target = info.resolve_target(new_path)?;

    Ok((
        CheckOutput::Check {
            new_path: new_path.to_string(),
            split,
            main_module: info.path,
            target,
        },
        0,
    ))
}
