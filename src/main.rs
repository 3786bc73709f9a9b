//! Binary entry point: build the engine, run the decision engine, and turn
//! the outcome into a process exit status. This is the only place a failure
//! becomes an exit; library code reports nothing and never terminates the
//! process itself.

use std::env;
use std::process::ExitCode;

use script_prompt::console::Console;
use script_prompt::host::{self, Followup, INIT_VAR};
use script_prompt::logging;
use script_prompt::lua::LuaEngine;
use script_prompt::repl;

fn main() -> ExitCode {
    logging::init();

    let argv: Vec<String> = env::args().collect();
    let mut console = Console::from_process();

    let mut engine = match LuaEngine::new() {
        Ok(engine) => engine,
        Err(diag) => {
            eprintln!("could not initialize the scripting engine: {diag}");
            return ExitCode::FAILURE;
        }
    };

    let init = env::var(INIT_VAR).ok();
    match host::run(&mut engine, &argv, init.as_deref(), &mut console) {
        Ok(Followup::Done) => ExitCode::SUCCESS,
        Ok(Followup::Repl(setup)) => match repl::enter(&mut engine, &setup) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{error:#}");
                ExitCode::FAILURE
            }
        },
        Err(error) => {
            console.report(&error);
            ExitCode::FAILURE
        }
    }
}
