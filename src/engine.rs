//! The contract between the host and the embedded scripting engine.
//!
//! The host never touches an engine's internals; everything it needs is
//! expressed through [`ScriptEngine`]: compiling code units, invoking
//! callables, requiring modules, and resolving control commands against an
//! engine-owned registry. Implementations keep their own value types behind
//! the `Callable` and `Module` associated types, so the host logic works the
//! same against the production backend and against a scripted test double.

use std::fmt;
use std::path::Path;

/// Namespace prefix for dynamically loadable control-command modules.
///
/// A control command `foo` that is not already registered is looked for in
/// the engine module `ctl.foo`.
pub const CONTROL_NAMESPACE: &str = "ctl.";

/// One positional call argument decoded from a compact option string.
///
/// `Absent` stands for an empty segment between commas and is passed to the
/// engine as its null value; `Text` carries the literal segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Absent,
    Text(String),
}

impl CallArg {
    pub fn text(value: impl Into<String>) -> Self {
        CallArg::Text(value.into())
    }
}

/// A diagnostic produced by the engine for a failed load or call.
///
/// `incomplete` is set when a load failed only because the source ended in
/// the middle of a construct; the interactive loop uses it to keep reading
/// continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub incomplete: bool,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            incomplete: false,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of querying the control-command registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlLookup<C> {
    Found(C),
    NotFound,
}

/// Why a fallback load of a control module produced no callable.
///
/// `NotFound` covers both a missing `ctl.*` module and a module without a
/// `start` entry; the dispatcher reports it as "no such control command".
/// Any other failure inside the load surfaces as `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlLoadError {
    NotFound,
    Failed(Diagnostic),
}

/// Minimal engine surface consumed by the host.
///
/// All operations are synchronous; the engine state is owned by the caller
/// for the lifetime of the process and is never shared across threads.
pub trait ScriptEngine {
    /// Handle to a loaded, invocable chunk or function.
    type Callable: Clone;
    /// Handle to a module produced by [`ScriptEngine::require`].
    type Module;

    /// Human-readable engine name and version, used in the greeting.
    fn describe(&self) -> String;

    /// Compile a source buffer under the given chunk name.
    fn load_string(&mut self, source: &str, name: &str) -> Result<Self::Callable, Diagnostic>;

    /// Compile a file, or standard input when `path` is `None`.
    fn load_file(&mut self, path: Option<&Path>) -> Result<Self::Callable, Diagnostic>;

    /// Invoke a callable with positional arguments, returning the rendered
    /// results. `CallArg::Absent` entries are passed as the engine's null.
    fn call(&mut self, target: &Self::Callable, args: &[CallArg]) -> Result<Vec<String>, Diagnostic>;

    /// Load a module through the engine's own module system.
    fn require(&mut self, name: &str) -> Result<Self::Module, Diagnostic>;

    /// Bind a required module to a global variable of the same name.
    fn bind_global(&mut self, name: &str, module: &Self::Module) -> Result<(), Diagnostic>;

    /// Query the registry of already-loaded control commands.
    fn lookup_control(&mut self, name: &str) -> ControlLookup<Self::Callable>;

    /// Fallback load of the control module [`CONTROL_NAMESPACE`]`name`.
    ///
    /// On success the resolved `start` entry is registered, so a later
    /// [`ScriptEngine::lookup_control`] for the same name finds it.
    fn load_control(&mut self, name: &str) -> Result<Self::Callable, ControlLoadError>;

    /// Publish the script argument table as (offset, text) pairs: negative
    /// offsets for host arguments, 0 for the script name, positive for the
    /// script's own arguments.
    fn set_script_args(&mut self, entries: &[(i64, String)]) -> Result<(), Diagnostic>;
}
