//! A command-line host for an embedded scripting engine.
//!
//! This crate decides, from environment variables, command-line flags, and
//! terminal state, which execution modes a single invocation performs:
//! running an init unit, executing inline code, requiring libraries,
//! dispatching engine-control commands, running a script file, reading a
//! batch from standard input, or entering an interactive loop. The engine
//! itself sits behind the [`engine::ScriptEngine`] trait; the production
//! backend in [`lua`] embeds Lua 5.4.
//!
//! The main entry point is [`host::run`], which performs everything except
//! the interactive loop and reports what, if anything, remains for the
//! caller to do.

pub mod console;
pub mod control;
pub mod engine;
pub mod error;
pub mod host;
pub mod loader;
pub mod logging;
pub mod lua;
pub mod options;
pub mod repl;

mod flags;
#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{CallArg, Diagnostic, ScriptEngine};
pub use error::HostError;
pub use host::{Followup, run};
