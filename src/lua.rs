//! The production engine backend: Lua 5.4 embedded through `mlua`.
//!
//! The state is created once, owns the full standard library, and lives
//! for the whole process. Control commands resolve against an explicit
//! cache on this handle; the cache starts out with the built-in `opt`
//! directive processor and grows as `ctl.*` modules are loaded.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use mlua::{Function, Lua, MultiValue, Value};

use crate::engine::{
    CallArg, CONTROL_NAMESPACE, ControlLoadError, ControlLookup, Diagnostic, ScriptEngine,
};
use crate::control::OPTIMIZE_COMMAND;

/// The `opt` control function: collector tuning directives, one per call
/// argument. Holes in the option list are allowed and skipped.
const OPT_BOOTSTRAP: &str = r#"
return function(...)
    local n = select('#', ...)
    for i = 1, n do
        local directive = select(i, ...)
        if directive == nil then
            -- hole in the option list
        elseif directive == 'incremental' or directive == 'generational' then
            collectgarbage(directive)
        else
            local key, value = string.match(directive, '^(%a+)=(%d+)$')
            if key == 'pause' or key == 'stepmul' then
                collectgarbage('set' .. key, tonumber(value))
            else
                error("unknown optimization directive '"
                    .. tostring(directive) .. "'", 0)
            end
        end
    end
end
"#;

pub struct LuaEngine {
    lua: Lua,
    controls: HashMap<String, Function>,
}

impl LuaEngine {
    /// Fresh state with the standard library open and the built-in `opt`
    /// control registered.
    pub fn new() -> Result<Self, Diagnostic> {
        let lua = Lua::new();
        let opt: Function = lua.load(OPT_BOOTSTRAP).set_name("=opt").eval()?;
        let mut controls = HashMap::new();
        controls.insert(OPTIMIZE_COMMAND.to_string(), opt);
        Ok(Self { lua, controls })
    }

    fn lua_args(&self, args: &[CallArg]) -> Result<MultiValue, Diagnostic> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(match arg {
                CallArg::Absent => Value::Nil,
                CallArg::Text(text) => Value::String(self.lua.create_string(text)?),
            });
        }
        Ok(MultiValue::from_iter(values))
    }
}

impl From<mlua::Error> for Diagnostic {
    fn from(error: mlua::Error) -> Self {
        let incomplete = matches!(
            &error,
            mlua::Error::SyntaxError {
                incomplete_input: true,
                ..
            }
        );
        Diagnostic {
            message: error.to_string(),
            incomplete,
        }
    }
}

impl ScriptEngine for LuaEngine {
    type Callable = Function;
    type Module = Value;

    fn describe(&self) -> String {
        self.lua
            .globals()
            .get::<String>("_VERSION")
            .unwrap_or_else(|_| "Lua".to_string())
    }

    fn load_string(&mut self, source: &str, name: &str) -> Result<Function, Diagnostic> {
        Ok(self.lua.load(source).set_name(name).into_function()?)
    }

    fn load_file(&mut self, path: Option<&Path>) -> Result<Function, Diagnostic> {
        let (source, name) = match path {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|error| {
                    Diagnostic::new(format!("cannot open {}: {error}", path.display()))
                })?;
                (source, format!("@{}", path.display()))
            }
            None => {
                let mut source = String::new();
                std::io::stdin()
                    .read_to_string(&mut source)
                    .map_err(|error| Diagnostic::new(format!("cannot read stdin: {error}")))?;
                (source, "=stdin".to_string())
            }
        };
        Ok(self
            .lua
            .load(strip_shebang(&source))
            .set_name(name)
            .into_function()?)
    }

    fn call(&mut self, target: &Function, args: &[CallArg]) -> Result<Vec<String>, Diagnostic> {
        let results = target.call::<MultiValue>(self.lua_args(args)?)?;
        let tostring: Function = self.lua.globals().get("tostring")?;
        let mut rendered = Vec::with_capacity(results.len());
        for value in results {
            rendered.push(tostring.call::<String>(value)?);
        }
        Ok(rendered)
    }

    fn require(&mut self, name: &str) -> Result<Value, Diagnostic> {
        let require: Function = self.lua.globals().get("require")?;
        Ok(require.call::<Value>(name)?)
    }

    fn bind_global(&mut self, name: &str, module: &Value) -> Result<(), Diagnostic> {
        Ok(self.lua.globals().set(name, module.clone())?)
    }

    fn lookup_control(&mut self, name: &str) -> ControlLookup<Function> {
        match self.controls.get(name) {
            Some(function) => ControlLookup::Found(function.clone()),
            None => ControlLookup::NotFound,
        }
    }

    fn load_control(&mut self, name: &str) -> Result<Function, ControlLoadError> {
        let module_name = format!("{CONTROL_NAMESPACE}{name}");
        let module = match self.require(&module_name) {
            Ok(module) => module,
            Err(diag) => {
                // The engine words a missing module distinctly from a
                // module that failed while loading.
                if diag
                    .message
                    .contains(&format!("module '{module_name}' not found"))
                {
                    return Err(ControlLoadError::NotFound);
                }
                return Err(ControlLoadError::Failed(diag));
            }
        };

        let start = match &module {
            Value::Table(table) => table
                .get::<Value>("start")
                .map_err(|error| ControlLoadError::Failed(error.into()))?,
            _ => Value::Nil,
        };
        match start {
            Value::Function(function) => {
                self.controls.insert(name.to_string(), function.clone());
                Ok(function)
            }
            _ => Err(ControlLoadError::NotFound),
        }
    }

    fn set_script_args(&mut self, entries: &[(i64, String)]) -> Result<(), Diagnostic> {
        let table = self.lua.create_table()?;
        for (offset, text) in entries {
            table.raw_set(*offset, text.as_str())?;
        }
        Ok(self.lua.globals().set("arg", table)?)
    }
}

/// Drop a leading `#!` line, keeping its newline so diagnostics still
/// point at the right lines.
fn strip_shebang(source: &str) -> &str {
    match source.strip_prefix('#') {
        Some(rest) => match rest.find('\n') {
            Some(pos) => &rest[pos..],
            None => "",
        },
        None => source,
    }
}
