//! The single error type every host operation funnels into.
//!
//! The original four termination styles (loader exits, immediate exits on
//! flag failures, the generic exit on an unrecognized flag, and the normal
//! teardown path) collapse into one `Result` chain; only the binary entry
//! point turns a `HostError` into a process exit.

use thiserror::Error;

use crate::engine::Diagnostic;

/// Errors that abort a host invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    /// The source of a code unit did not compile.
    #[error("{0}")]
    Load(Diagnostic),

    /// A code unit, library require, or control invocation raised at run time.
    #[error("{0}")]
    Runtime(Diagnostic),

    /// A control command with no registry entry and no loadable module.
    #[error("unknown control command '{0}' or ctl.{0} module not installed")]
    UnknownCommand(String),

    /// A flag the scanner does not know.
    #[error("unrecognized option '-{0}'")]
    Unrecognized(char),

    /// A flag that takes a value appeared last with nothing after it.
    #[error("option '-{0}' requires an argument")]
    MissingValue(char),
}
