//! The execution-mode decision engine.
//!
//! One invocation walks a fixed sequence: terminal detection, the init
//! unit from the environment, flags in command-line order, an optional
//! script positional, and a final choice between doing nothing further,
//! entering the interactive loop, and running a batch from standard
//! input. Every step either succeeds or aborts the run with a
//! [`HostError`]; the binary entry point is the only place that turns an
//! abort into a process exit.

use std::path::PathBuf;

use tracing::debug;

use crate::console::Console;
use crate::control;
use crate::engine::ScriptEngine;
use crate::error::HostError;
use crate::flags::{Flag, Scanner};
use crate::loader::{self, CodeUnit};

/// Environment variable holding the init code unit: either inline source
/// or `@path` for a file.
pub const INIT_VAR: &str = "SCRIPT_PROMPT_INIT";

const HISTORY_FILE: &str = ".script_prompt_history";
const PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = ">> ";

/// Flag-accumulated state. `done` records that some flag already produced
/// a terminal outcome (version, help, inline code, a script); it moves
/// from false to true and never back.
#[derive(Debug, Default)]
struct Config {
    interactive: bool,
    done: bool,
}

/// Everything the interactive subsystem needs from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplSetup {
    pub colorize: bool,
    pub history: Option<PathBuf>,
    pub prompt: String,
    pub continuation: String,
}

/// What the caller still has to do after the decision engine returns.
#[derive(Debug, PartialEq, Eq)]
pub enum Followup {
    Done,
    Repl(ReplSetup),
}

/// Run one host invocation over `argv` (the full vector, program name
/// included) and the init-variable value, if any.
pub fn run<E: ScriptEngine>(
    engine: &mut E,
    argv: &[String],
    init: Option<&str>,
    console: &mut Console,
) -> Result<Followup, HostError> {
    let mut config = Config::default();

    console.detect_terminal();

    // The init unit runs before any explicit flag so that flags can
    // override or build on whatever it set up.
    if let Some(init) = init {
        let unit = match init.strip_prefix('@') {
            Some(path) => CodeUnit::file(path),
            None => CodeUnit::inline(init, format!("={INIT_VAR}")),
        };
        debug!(?unit, "running init unit");
        loader::execute(engine, &unit)?;
    }

    let mut scanner = Scanner::new(argv);
    while let Some(flag) = scanner.next_flag()? {
        debug!(?flag, "processing flag");
        match flag {
            Flag::Interactive => config.interactive = true,
            Flag::Version => {
                console.greet(&engine.describe());
                config.done = true;
            }
            Flag::Plain => console.colorize = false,
            Flag::Execute(statement) => {
                loader::execute(engine, &CodeUnit::inline(statement, "=(command line)"))?;
                config.done = true;
            }
            Flag::Library(name) => {
                let module = engine.require(&name).map_err(HostError::Runtime)?;
                engine
                    .bind_global(&name, &module)
                    .map_err(HostError::Runtime)?;
            }
            Flag::Control(raw) => control::dispatch(engine, &raw)?,
            Flag::Optimize(option) => control::apply_optimization(engine, Some(&option))?,
            Flag::Usage => {
                console.usage(argv.first().map(String::as_str).unwrap_or("script_prompt"));
                config.done = true;
            }
        }
    }

    let rest = scanner.rest();
    if rest < argv.len() {
        let script = &argv[rest];
        let path = if script == "-" {
            None
        } else {
            Some(PathBuf::from(script))
        };
        engine
            .set_script_args(&script_args(argv, rest))
            .map_err(HostError::Runtime)?;
        debug!(script = %script, "running script");
        loader::execute(engine, &CodeUnit::File { path })?;
        config.done = true;
    }

    if !config.done || config.interactive {
        if console.stdin_tty() {
            debug!("entering interactive mode");
            console.greet(&engine.describe());
            console.blank_line();
            return Ok(Followup::Repl(ReplSetup {
                colorize: console.colorize,
                history: dirs::home_dir().map(|home| home.join(HISTORY_FILE)),
                prompt: PROMPT.to_string(),
                continuation: CONTINUATION_PROMPT.to_string(),
            }));
        }
        // Input is piped: run it as one batch unit, no echo, no history.
        debug!("running stdin batch");
        loader::execute(engine, &CodeUnit::stdin())?;
    }

    Ok(Followup::Done)
}

/// Collect the whole argument vector into (offset, text) pairs with the
/// script name at offset 0, host arguments before it at negative offsets,
/// and the script's own arguments after it.
fn script_args(argv: &[String], script_index: usize) -> Vec<(i64, String)> {
    argv.iter()
        .enumerate()
        .map(|(index, text)| (index as i64 - script_index as i64, text.clone()))
        .collect()
}
