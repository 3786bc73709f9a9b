//! The interactive read-eval-print loop.
//!
//! Unlike every other execution path, interactive input recovers from
//! errors: a failed line is reported and the loop keeps going. Chunks that
//! merely end too early accumulate across continuation lines, and bare
//! expressions echo their values back.

use anyhow::{Context, Result};
use ansi_term::Colour;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::engine::{Diagnostic, ScriptEngine};
use crate::host::ReplSetup;

/// Hand control to the line editor until the user leaves with Ctrl-D.
pub fn enter<E: ScriptEngine>(engine: &mut E, setup: &ReplSetup) -> Result<()> {
    let mut editor = DefaultEditor::new().context("initialize line editor")?;
    if let Some(history) = &setup.history {
        // A first session has no history file yet.
        let _ = editor.load_history(history);
    }

    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() {
            &setup.prompt
        } else {
            &setup.continuation
        };
        match editor.readline(prompt) {
            Ok(line) => {
                if pending.is_empty() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    pending = line;
                } else {
                    pending.push('\n');
                    pending.push_str(&line);
                }
                if eval_chunk(engine, &pending, setup.colorize) == ChunkOutcome::Incomplete {
                    continue;
                }
                let _ = editor.add_history_entry(pending.as_str());
                pending.clear();
            }
            Err(ReadlineError::Interrupted) => {
                pending.clear();
            }
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error).context("read interactive input"),
        }
    }

    if let Some(history) = &setup.history {
        let _ = editor.save_history(history);
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum ChunkOutcome {
    Complete,
    Incomplete,
}

/// Evaluate one interactive chunk. The expression form is tried first so
/// `1 + 1` echoes `2`; statements fall back to a plain load.
fn eval_chunk<E: ScriptEngine>(engine: &mut E, chunk: &str, colorize: bool) -> ChunkOutcome {
    let loaded = engine
        .load_string(&format!("return {chunk}"), "=stdin")
        .or_else(|_| engine.load_string(chunk, "=stdin"));
    let target = match loaded {
        Ok(target) => target,
        Err(diag) if diag.incomplete => return ChunkOutcome::Incomplete,
        Err(diag) => {
            report(&diag, colorize);
            return ChunkOutcome::Complete;
        }
    };
    match engine.call(&target, &[]) {
        Ok(results) if !results.is_empty() => println!("{}", results.join("\t")),
        Ok(_) => {}
        Err(diag) => report(&diag, colorize),
    }
    ChunkOutcome::Complete
}

fn report(diag: &Diagnostic, colorize: bool) {
    if colorize {
        eprintln!("{}", Colour::Red.paint(diag.message.as_str()));
    } else {
        eprintln!("{}", diag.message);
    }
}
