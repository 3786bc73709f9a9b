//! Loading and running a single code unit against the engine.

use std::path::PathBuf;

use crate::engine::ScriptEngine;
use crate::error::HostError;

/// A self-contained piece of source to load and execute.
///
/// Units are ephemeral: loaded, run, and discarded. The name or path is
/// carried only for diagnostics. A `File` unit without a path reads from
/// standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeUnit {
    Inline { source: String, name: String },
    File { path: Option<PathBuf> },
}

impl CodeUnit {
    pub fn inline(source: impl Into<String>, name: impl Into<String>) -> Self {
        CodeUnit::Inline {
            source: source.into(),
            name: name.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        CodeUnit::File {
            path: Some(path.into()),
        }
    }

    pub fn stdin() -> Self {
        CodeUnit::File { path: None }
    }
}

/// Load a unit and run it to completion, discarding its results.
///
/// There is no partial success: a compile failure maps to
/// [`HostError::Load`], a raised error to [`HostError::Runtime`], and both
/// end the whole invocation once they reach the top-level handler. Only
/// all-or-nothing units go through here (the init unit, `-e` strings, the
/// main script, the stdin batch); interactive input has its own recovery
/// loop.
pub fn execute<E: ScriptEngine>(engine: &mut E, unit: &CodeUnit) -> Result<(), HostError> {
    let chunk = match unit {
        CodeUnit::Inline { source, name } => engine.load_string(source, name),
        CodeUnit::File { path } => engine.load_file(path.as_deref()),
    }
    .map_err(HostError::Load)?;
    engine.call(&chunk, &[]).map_err(HostError::Runtime)?;
    Ok(())
}
