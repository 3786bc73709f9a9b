//! Test doubles: a scripted engine that records every interaction, and
//! in-memory console capture.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Result as IoResult, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::console::Console;
use crate::engine::{CallArg, ControlLoadError, ControlLookup, Diagnostic, ScriptEngine};

/// One observed engine interaction, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoadString { source: String, name: String },
    LoadFile { path: Option<PathBuf> },
    Call { target: usize, args: Vec<CallArg> },
    Require { name: String },
    BindGlobal { name: String },
    ControlLoad { name: String },
    ScriptArgs { entries: Vec<(i64, String)> },
}

/// Engine double with scripted behavior. Callables and modules are plain
/// integer handles; configured failures apply to every matching call.
#[derive(Default)]
pub struct ScriptedEngine {
    pub events: Vec<Event>,
    pub fail_load: Option<Diagnostic>,
    pub fail_call: Option<Diagnostic>,
    pub fail_require: Option<Diagnostic>,
    pub fail_control_load: Option<Diagnostic>,
    pub call_results: Vec<String>,
    controls: HashMap<String, usize>,
    loadable_controls: HashMap<String, usize>,
    next_handle: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-register a control command, as if its module were loaded.
    pub fn with_control(mut self, name: &str) -> Self {
        let handle = self.fresh_handle();
        self.controls.insert(name.to_string(), handle);
        self
    }

    /// Make a control command resolvable through the fallback load.
    pub fn with_loadable_control(mut self, name: &str) -> Self {
        let handle = self.fresh_handle();
        self.loadable_controls.insert(name.to_string(), handle);
        self
    }

    /// Handle assigned to a configured control command.
    pub fn handle_of(&self, name: &str) -> usize {
        self.controls
            .get(name)
            .or_else(|| self.loadable_controls.get(name))
            .copied()
            .unwrap_or_else(|| panic!("no configured control '{name}'"))
    }

    /// Argument lists of every call made to the given handle.
    pub fn calls_to(&self, handle: usize) -> Vec<Vec<CallArg>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Call { target, args } if *target == handle => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many fallback loads were attempted for the given command.
    pub fn control_loads(&self, name: &str) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::ControlLoad { name: n } if n == name))
            .count()
    }

    fn fresh_handle(&mut self) -> usize {
        self.next_handle += 1;
        self.next_handle
    }
}

impl ScriptEngine for ScriptedEngine {
    type Callable = usize;
    type Module = usize;

    fn describe(&self) -> String {
        "scripted engine".to_string()
    }

    fn load_string(&mut self, source: &str, name: &str) -> Result<usize, Diagnostic> {
        self.events.push(Event::LoadString {
            source: source.to_string(),
            name: name.to_string(),
        });
        match &self.fail_load {
            Some(diag) => Err(diag.clone()),
            None => Ok(self.fresh_handle()),
        }
    }

    fn load_file(&mut self, path: Option<&Path>) -> Result<usize, Diagnostic> {
        self.events.push(Event::LoadFile {
            path: path.map(Path::to_path_buf),
        });
        match &self.fail_load {
            Some(diag) => Err(diag.clone()),
            None => Ok(self.fresh_handle()),
        }
    }

    fn call(&mut self, target: &usize, args: &[CallArg]) -> Result<Vec<String>, Diagnostic> {
        self.events.push(Event::Call {
            target: *target,
            args: args.to_vec(),
        });
        match &self.fail_call {
            Some(diag) => Err(diag.clone()),
            None => Ok(self.call_results.clone()),
        }
    }

    fn require(&mut self, name: &str) -> Result<usize, Diagnostic> {
        self.events.push(Event::Require {
            name: name.to_string(),
        });
        match &self.fail_require {
            Some(diag) => Err(diag.clone()),
            None => Ok(self.fresh_handle()),
        }
    }

    fn bind_global(&mut self, name: &str, _module: &usize) -> Result<(), Diagnostic> {
        self.events.push(Event::BindGlobal {
            name: name.to_string(),
        });
        Ok(())
    }

    fn lookup_control(&mut self, name: &str) -> ControlLookup<usize> {
        match self.controls.get(name) {
            Some(&handle) => ControlLookup::Found(handle),
            None => ControlLookup::NotFound,
        }
    }

    fn load_control(&mut self, name: &str) -> Result<usize, ControlLoadError> {
        self.events.push(Event::ControlLoad {
            name: name.to_string(),
        });
        if let Some(diag) = &self.fail_control_load {
            return Err(ControlLoadError::Failed(diag.clone()));
        }
        match self.loadable_controls.get(name) {
            Some(&handle) => {
                self.controls.insert(name.to_string(), handle);
                Ok(handle)
            }
            None => Err(ControlLoadError::NotFound),
        }
    }

    fn set_script_args(&mut self, entries: &[(i64, String)]) -> Result<(), Diagnostic> {
        self.events.push(Event::ScriptArgs {
            entries: entries.to_vec(),
        });
        Ok(())
    }
}

/// Memory-backed writer with a shared handle for reading back captured
/// output after the writer has been boxed away.
pub struct CaptureWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl CaptureWriter {
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let buf = Rc::new(RefCell::new(Vec::new()));
        let handle = buf.clone();
        (Self { buf }, handle)
    }
}

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

/// A console over capture buffers with a fixed terminal attachment.
pub struct CaptureConsole {
    console: Console,
    out_buf: Rc<RefCell<Vec<u8>>>,
    err_buf: Rc<RefCell<Vec<u8>>>,
}

impl CaptureConsole {
    /// All three streams attached to a terminal.
    pub fn terminal() -> Self {
        Self::with_ttys(true, true, true)
    }

    /// Nothing attached to a terminal, as when piped through another
    /// process.
    pub fn piped() -> Self {
        Self::with_ttys(false, false, false)
    }

    pub fn with_ttys(stdin_tty: bool, stdout_tty: bool, stderr_tty: bool) -> Self {
        let (out, out_buf) = CaptureWriter::with_handle();
        let (err, err_buf) = CaptureWriter::with_handle();
        Self {
            console: Console::new(
                Box::new(out),
                Box::new(err),
                stdin_tty,
                stdout_tty,
                stderr_tty,
            ),
            out_buf,
            err_buf,
        }
    }

    pub fn console(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn out(&self) -> String {
        String::from_utf8(self.out_buf.borrow().clone()).unwrap()
    }

    pub fn err(&self) -> String {
        String::from_utf8(self.err_buf.borrow().clone()).unwrap()
    }
}
