use serde::de::DeserializeOwned;
use std::path::Path;

pub type CmdResult<T> = resrc::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod relocate;
pub mod split;

/// Read and deserialize a JSON plan/spec file.
pub(crate) fn read_spec_file<T: DeserializeOwned>(path: &Path) -> resrc::Result<T> {
    let content = resrc::io::read_file(path, &format!("read spec {}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}

macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (resrc::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Relocate(args) => dispatch!(args, global, relocate),
        crate::Commands::Split(args) => dispatch!(args, global, split),
    }
}
