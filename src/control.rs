//! Resolution and invocation of engine-control commands.
//!
//! Control commands are administrative operations addressed by name, kept
//! apart from user scripts. They are numerous and sparsely used, so the
//! engine keeps a registry of the ones already loaded and the dispatcher
//! falls back to loading a `ctl.*` module only on a registry miss.

use crate::engine::{CallArg, ControlLoadError, ControlLookup, ScriptEngine};
use crate::error::HostError;
use crate::options;

/// Name of the always-present optimization control function.
pub const OPTIMIZE_COMMAND: &str = "opt";

/// Dispatch a raw control command of the form `name` or `name=options`.
///
/// The name is resolved against the engine's registry first; on a miss the
/// engine loads the matching `ctl.*` module and registers its `start`
/// entry, so dispatching the same command again hits the registry. A
/// command with neither a registry entry nor a loadable module fails with
/// [`HostError::UnknownCommand`], which callers can tell apart from an
/// error raised by a command that did run.
pub fn dispatch<E: ScriptEngine>(engine: &mut E, raw: &str) -> Result<(), HostError> {
    let (name, option) = match raw.split_once('=') {
        Some((name, option)) => (name, Some(option)),
        None => (raw, None),
    };

    let target = match engine.lookup_control(name) {
        ControlLookup::Found(target) => target,
        ControlLookup::NotFound => {
            tracing::debug!(command = name, "control registry miss, loading module");
            match engine.load_control(name) {
                Ok(target) => target,
                Err(ControlLoadError::NotFound) => {
                    return Err(HostError::UnknownCommand(name.to_string()));
                }
                Err(ControlLoadError::Failed(diag)) => return Err(HostError::Runtime(diag)),
            }
        }
    };

    invoke(engine, &target, option)
}

/// Apply an optimization directive through the fixed `opt` control
/// function. The function is registered when the engine comes up, so there
/// is no fallback-load stage here.
pub fn apply_optimization<E: ScriptEngine>(
    engine: &mut E,
    option: Option<&str>,
) -> Result<(), HostError> {
    match engine.lookup_control(OPTIMIZE_COMMAND) {
        ControlLookup::Found(target) => invoke(engine, &target, option),
        ControlLookup::NotFound => Err(HostError::UnknownCommand(OPTIMIZE_COMMAND.to_string())),
    }
}

fn invoke<E: ScriptEngine>(
    engine: &mut E,
    target: &E::Callable,
    option: Option<&str>,
) -> Result<(), HostError> {
    let args: Vec<CallArg> = options::decode(option);
    engine
        .call(target, &args)
        .map(|_| ())
        .map_err(HostError::Runtime)
}
