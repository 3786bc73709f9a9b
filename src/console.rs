//! Process-facing output: streams, terminal state, and colorization.
//!
//! The host never writes to `stdout`/`stderr` directly; it goes through a
//! [`Console`] so the streams can be replaced with in-memory buffers and
//! the terminal attachment pinned down in tests.

use std::io::{self, IsTerminal, Write};

use ansi_term::{Colour, Style};

use crate::error::HostError;

const PROGRAM: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output streams plus the colorize switch and terminal attachment of the
/// three standard streams.
pub struct Console {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    stdin_tty: bool,
    stdout_tty: bool,
    stderr_tty: bool,
    pub colorize: bool,
}

impl Console {
    /// Console over the real process streams.
    pub fn from_process() -> Self {
        Self::new(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            io::stdin().is_terminal(),
            io::stdout().is_terminal(),
            io::stderr().is_terminal(),
        )
    }

    pub fn new(
        out: Box<dyn Write>,
        err: Box<dyn Write>,
        stdin_tty: bool,
        stdout_tty: bool,
        stderr_tty: bool,
    ) -> Self {
        Self {
            out,
            err,
            stdin_tty,
            stdout_tty,
            stderr_tty,
            colorize: true,
        }
    }

    /// Drop color escapes unless both output streams face a terminal.
    pub fn detect_terminal(&mut self) {
        if !self.stdout_tty || !self.stderr_tty {
            self.colorize = false;
        }
    }

    pub fn stdin_tty(&self) -> bool {
        self.stdin_tty
    }

    /// Version greeting, bold on a color terminal.
    pub fn greet(&mut self, engine: &str) {
        let banner = format!("{PROGRAM} {VERSION} -- {engine}");
        if self.colorize {
            let _ = writeln!(self.out, "{}", Style::new().bold().paint(banner));
        } else {
            let _ = writeln!(self.out, "{banner}");
        }
    }

    pub fn blank_line(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn usage(&mut self, program: &str) {
        let _ = write!(
            self.out,
            "Usage: {program} [OPTION...] [[SCRIPT] ARGS]\n\n\
             Options:\n\
             \x20 -h       Display this help message\n\
             \x20 -e STMT  Execute string 'STMT'\n\
             \x20 -l NAME  Require library 'NAME'\n\
             \x20 -c CMD   Perform engine control command 'CMD'\n\
             \x20 -O OPT   Apply engine optimization directive 'OPT'\n\
             \x20 -p       Force plain, uncolored output\n\
             \x20 -v       Print version information\n\
             \x20 -i       Enter interactive mode after executing SCRIPT\n"
        );
    }

    /// Uniform failure reporting: the diagnostic text on the error stream,
    /// red when colorization is on.
    pub fn report(&mut self, error: &HostError) {
        let message = error.to_string();
        if self.colorize {
            let _ = writeln!(self.err, "{}", Colour::Red.paint(message));
        } else {
            let _ = writeln!(self.err, "{message}");
        }
    }
}
