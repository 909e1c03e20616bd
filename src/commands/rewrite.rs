use clap::Args;
use serde::Serialize;

use modbump::modpath::{self, SplitPath};
use modbump::utils::validation;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct RewriteArgs {
    /// New module path, e.g. example.org/foo/v2
    new_path: String,
    /// Import paths to move onto the new module path
    #[arg(num_args = 1..)]
    import_paths: Vec<String>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RewriteOutput {
    #[serde(rename = "rewrite")]
    Rewrite {
        new_path: String,
        split: SplitPath,
        results: Vec<RewriteDecision>,
        total_changed: usize,
    },
}

#[derive(Serialize)]
pub struct RewriteDecision {
    pub import_path: String,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<String>,
    pub changed: bool,
}

pub fn run(args: RewriteArgs) -> CmdResult<RewriteOutput> {
    let new_path = validation::require_non_empty(
        &args.new_path,
        "new_path",
        "New module path is required",
    )?;
    validation::require_non_empty_vec(&args.import_paths, "import_paths")?;

    let split = modpath::split_path_version(new_path)?;

    let results = args
        .import_paths
        .iter()
        .map(|import_path| {
            let rewritten = modpath::rewrite_import_path(new_path, import_path)?;
            Ok(RewriteDecision {
                import_path: import_path.clone(),
                matched: rewritten.is_some(),
                changed: rewritten.as_deref().is_some_and(|r| r != import_path),
                rewritten,
            })
        })
        .collect::<modbump::Result<Vec<_>>>()?;

    let total_changed = results.iter().filter(|r| r.changed).count();

    Ok((
        RewriteOutput::Rewrite {
            new_path: new_path.to_string(),
            split,
            results,
            total_changed,
        },
        0,
    ))
}
