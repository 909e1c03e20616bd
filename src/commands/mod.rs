use std::path::PathBuf;

pub type CmdResult<T> = modbump::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod bump;
pub mod check;
pub mod rewrite;

/// Resolve a `--path` argument to an existing directory.
///
/// `~` and environment variables are expanded.
pub(crate) fn resolve_root(path: &str) -> modbump::Result<PathBuf> {
    let expanded = shellexpand::full(path).map_err(|e| {
        modbump::Error::validation_invalid_argument(
            "path",
            format!("Cannot expand path '{}': {}", path, e),
            None,
            None,
        )
    })?;

    let root = PathBuf::from(expanded.as_ref());
    if !root.is_dir() {
        return Err(modbump::Error::validation_invalid_argument(
            "path",
            format!("Directory not found: {}", root.display()),
            None,
            Some(vec![expanded.to_string()]),
        ));
    }

    Ok(root)
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (modbump::Result<serde_json::Value>, i32) {
    crate::tty::status("modbump is working...");

    match command {
        // Pure commands
        crate::Commands::Rewrite(args) => dispatch!(args, rewrite),

        // Commands that read a module tree
        crate::Commands::Bump(args) => dispatch!(args, global, bump),
        crate::Commands::Check(args) => dispatch!(args, global, check),
    }
}
