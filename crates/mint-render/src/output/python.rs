//! Python backend: an argparse-based package.
//!
//! Emits a `src/` layout package with a `pyproject.toml`, an argparse tree
//! in `cli.py`, and per-command handlers in `handlers.py`. Hook dispatch
//! follows the hook contract: a standard command `server start` calls
//! `hook_server_start(path, values)` from the user module `<name>_hooks`;
//! the hook's return value becomes the exit status, and a missing hook
//! prints usage and fails.
//!
//! argparse cannot express a parent's own positional arguments alongside
//! subcommands, so for commands that have both, the positionals are left to
//! the parent's handler (reachable when no subcommand is given) — a
//! documented placeholder, not an omission.

use crate::artifact::Artifact;
use crate::hooks;
use crate::output::{SourceWriter, completion_script, shell_name, usage_line, visible_children};
use crate::traits::Renderer;
use mint_ir::{CommandNode, FeatureSet, Ir, OptionNode, ValueKind};

/// Static instance of the python renderer for the registry.
pub static PYTHON_RENDERER: PythonRenderer = PythonRenderer;

/// Renders an argparse-based python package.
pub struct PythonRenderer;

impl Renderer for PythonRenderer {
    fn target(&self) -> &'static str {
        "python"
    }

    fn summary(&self) -> &'static str {
        "argparse-based python package"
    }

    fn hook_ident(&self, path: &[String]) -> String {
        hooks::snake_ident("hook", path)
    }

    fn handler_ident(&self, path: &[String]) -> String {
        hooks::snake_ident("handle", path)
    }

    fn render(&self, ir: &Ir, features: &FeatureSet) -> Vec<Artifact> {
        let hooks_needed =
            features.hooks || ir.commands().iter().any(|c| c.dispatches_to_hook());
        let name = &ir.meta.name;
        let module = shell_name(name);

        let mut artifacts = vec![
            Artifact::manifest("pyproject.toml", pyproject(ir, &module)),
            Artifact::source(format!("src/{module}/__init__.py"), init_py(ir)),
            Artifact::source(format!("src/{module}/cli.py"), cli_py(ir, features)),
            Artifact::source(
                format!("src/{module}/handlers.py"),
                handlers_py(ir, &module, hooks_needed),
            ),
        ];
        if features.interactive {
            artifacts.push(Artifact::source(
                format!("src/{module}/repl.py"),
                repl_py(ir),
            ));
        }
        if features.completion {
            artifacts.push(Artifact::script(
                format!("completions/{name}.bash"),
                completion_script(ir),
            ));
        }
        artifacts.push(Artifact::doc("README.md", readme(ir, &module, hooks_needed)));
        artifacts
    }
}

/// Escape text for a double-quoted python string.
fn py_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' | '"' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Python identifier for a possibly-dashed name.
fn py_name(name: &str) -> String {
    shell_name(name)
}

fn pyproject(ir: &Ir, module: &str) -> String {
    let name = &ir.meta.name;
    let description = ir.meta.description.as_deref().unwrap_or("");
    format!(
        "# Generated file; regenerated on every build. Do not edit.\n\
         \n\
         [build-system]\n\
         requires = [\"setuptools>=68\"]\n\
         build-backend = \"setuptools.build_meta\"\n\
         \n\
         [project]\n\
         name = \"{name}\"\n\
         version = \"{version}\"\n\
         description = \"{description}\"\n\
         requires-python = \">=3.9\"\n\
         \n\
         [project.scripts]\n\
         {name} = \"{module}.cli:main\"\n\
         \n\
         [tool.setuptools.packages.find]\n\
         where = [\"src\"]\n",
        version = ir.meta.version,
    )
}

fn init_py(ir: &Ir) -> String {
    let mut w = SourceWriter::new("    ");
    match &ir.meta.description {
        Some(desc) => w.line(0, &format!("\"\"\"{} — {desc}.\"\"\"", ir.meta.name)),
        None => w.line(0, &format!("\"\"\"{}.\"\"\"", ir.meta.name)),
    }
    w.blank();
    w.line(0, &format!("__version__ = \"{}\"", ir.meta.version));
    w.finish()
}

/// Default-value expression for an option, honoring env bindings.
fn default_expr(opt: &OptionNode) -> Option<String> {
    match opt.kind {
        ValueKind::Bool => match (&opt.env, &opt.default) {
            (Some(env), _) => Some(format!("bool(os.environ.get({}))", py_str(env))),
            (None, Some(default)) => Some(if default == "true" { "True" } else { "False" }.into()),
            (None, None) => None,
        },
        ValueKind::Int => match (&opt.env, &opt.default) {
            (Some(env), Some(default)) => {
                Some(format!("_env_int({}, {})", py_str(env), int_literal(default)))
            }
            (Some(env), None) => Some(format!("_env_int({})", py_str(env))),
            (None, Some(default)) => Some(int_literal(default)),
            (None, None) => None,
        },
        ValueKind::List => match (&opt.env, &opt.default) {
            (Some(env), Some(default)) => Some(format!(
                "_env_list({}, [{}])",
                py_str(env),
                py_str(default)
            )),
            (Some(env), None) => Some(format!("_env_list({})", py_str(env))),
            (None, Some(default)) => Some(format!("[{}]", py_str(default))),
            (None, None) => None,
        },
        _ => match (&opt.env, &opt.default) {
            (Some(env), Some(default)) => Some(format!(
                "os.environ.get({}, {})",
                py_str(env),
                py_str(default)
            )),
            (Some(env), None) => Some(format!("os.environ.get({})", py_str(env))),
            (None, Some(default)) => Some(py_str(default)),
            (None, None) => None,
        },
    }
}

/// Emit a default as an int literal when it parses, else as a string
/// (argparse will surface the mismatch; better than guessing).
fn int_literal(default: &str) -> String {
    if default.parse::<i64>().is_ok() {
        default.to_string()
    } else {
        py_str(default)
    }
}

fn emit_add_option(w: &mut SourceWriter, parser: &str, opt: &OptionNode) {
    let mut parts = Vec::new();
    if let Some(short) = opt.short {
        parts.push(py_str(&format!("-{short}")));
    }
    parts.push(py_str(&format!("--{}", opt.name)));
    match opt.kind {
        ValueKind::Bool => parts.push("action=\"store_true\"".to_string()),
        ValueKind::Int => parts.push("type=int".to_string()),
        ValueKind::List => parts.push("action=\"append\"".to_string()),
        ValueKind::Enum => {
            let choices: Vec<String> = opt.choices.iter().map(|c| py_str(c)).collect();
            parts.push(format!("choices=[{}]", choices.join(", ")));
        }
        ValueKind::String => {}
    }
    if let Some(default) = default_expr(opt) {
        parts.push(format!("default={default}"));
    }
    if opt.required {
        parts.push("required=True".to_string());
    }
    if let Some(desc) = &opt.description {
        parts.push(format!("help={}", py_str(desc)));
    }
    w.line(1, &format!("{parser}.add_argument({})", parts.join(", ")));
}

fn emit_add_arguments(w: &mut SourceWriter, parser: &str, command: &CommandNode) {
    // Positionals cannot coexist with subparsers; the parent handler covers
    // them instead (see module docs).
    if !command.children.is_empty() {
        return;
    }
    for arg in &command.arguments {
        let mut parts = vec![py_str(&py_name(&arg.name))];
        if py_name(&arg.name) != arg.name {
            parts.push(format!("metavar={}", py_str(&arg.name)));
        }
        if arg.variadic {
            parts.push(format!(
                "nargs={}",
                if arg.required { "\"+\"" } else { "\"*\"" }
            ));
        } else if !arg.required {
            parts.push("nargs=\"?\"".to_string());
        }
        if arg.kind == ValueKind::Int {
            parts.push("type=int".to_string());
        }
        if arg.kind == ValueKind::Enum {
            let choices: Vec<String> = arg.choices.iter().map(|c| py_str(c)).collect();
            parts.push(format!("choices=[{}]", choices.join(", ")));
        }
        if let Some(desc) = &arg.description {
            parts.push(format!("help={}", py_str(desc)));
        }
        w.line(1, &format!("{parser}.add_argument({})", parts.join(", ")));
    }
}

/// The `set_defaults` pair for one parser: which handler runs when parsing
/// stops at this command.
fn emit_set_defaults(w: &mut SourceWriter, parser: &str, command: &CommandNode) {
    let (handler, path) = match command.children.iter().find(|c| c.default) {
        Some(default) => (
            format!("handlers.{}", hooks::snake_ident("handle", &default.path)),
            default.path_display(),
        ),
        None if command.path.is_empty() => ("None".to_string(), String::new()),
        None if command.children.is_empty() || command.dispatches_to_hook() => (
            format!("handlers.{}", hooks::snake_ident("handle", &command.path)),
            command.path_display(),
        ),
        None => ("None".to_string(), command.path_display()),
    };
    w.line(
        1,
        &format!(
            "{parser}.set_defaults(_handler={handler}, _path={})",
            py_str(&path)
        ),
    );
}

fn parser_var(command: &CommandNode) -> String {
    if command.path.is_empty() {
        "parser".to_string()
    } else {
        hooks::snake_ident("p", &command.path)
    }
}

fn subparsers_var(command: &CommandNode) -> String {
    if command.path.is_empty() {
        "sub".to_string()
    } else {
        hooks::snake_ident("sub", &command.path)
    }
}

fn emit_parser_tree(w: &mut SourceWriter, ir: &Ir, command: &CommandNode) {
    let parser = parser_var(command);

    let options = if command.path.is_empty() {
        &ir.global_options
    } else {
        &command.options
    };
    for opt in options {
        emit_add_option(w, &parser, opt);
    }
    emit_add_arguments(w, &parser, command);

    if !command.children.is_empty() {
        let sub = subparsers_var(command);
        w.line(
            1,
            &format!("{sub} = {parser}.add_subparsers(metavar=\"<command>\")"),
        );
        for child in &command.children {
            let child_parser = parser_var(child);
            let mut parts = vec![py_str(&child.name)];
            if !child.aliases.is_empty() {
                let aliases: Vec<String> = child.aliases.iter().map(|a| py_str(a)).collect();
                parts.push(format!("aliases=[{}]", aliases.join(", ")));
            }
            // Hidden commands get no help line, which keeps them out of
            // the subcommand listing while staying dispatchable.
            if !child.hidden {
                parts.push(format!(
                    "help={}",
                    py_str(child.description.as_deref().unwrap_or(""))
                ));
            }
            w.line(
                1,
                &format!("{child_parser} = {sub}.add_parser({})", parts.join(", ")),
            );
            emit_parser_tree(w, ir, child);
        }
    }

    emit_set_defaults(w, &parser, command);
}

fn cli_py(ir: &Ir, features: &FeatureSet) -> String {
    let name = &ir.meta.name;
    let module = shell_name(name);
    let mut w = SourceWriter::new("    ");

    w.line(
        0,
        &format!("\"\"\"Command-line interface for {name} {}.", ir.meta.version),
    );
    w.blank();
    w.line(0, "Generated file; regenerated on every build. Do not edit.");
    w.line(0, "\"\"\"");
    w.blank();
    w.line(0, "import argparse");
    let uses_env = ir
        .commands()
        .iter()
        .flat_map(|c| c.options.iter())
        .chain(ir.global_options.iter())
        .any(|o| o.env.is_some());
    if features.plugins {
        w.line(0, "import importlib");
    }
    if uses_env {
        w.line(0, "import os");
    }
    w.line(0, "import sys");
    w.blank();
    w.line(0, "from . import handlers");
    w.blank();
    w.blank();

    let needs_env_int = ir
        .commands()
        .iter()
        .flat_map(|c| c.options.iter())
        .chain(ir.global_options.iter())
        .any(|o| o.env.is_some() && o.kind == ValueKind::Int);
    if needs_env_int {
        w.line(0, "def _env_int(name, fallback=None):");
        w.line(1, "value = os.environ.get(name)");
        w.line(1, "if value is None:");
        w.line(2, "return fallback");
        w.line(1, "return int(value)");
        w.blank();
        w.blank();
    }
    let needs_env_list = ir
        .commands()
        .iter()
        .flat_map(|c| c.options.iter())
        .chain(ir.global_options.iter())
        .any(|o| o.env.is_some() && o.kind == ValueKind::List);
    if needs_env_list {
        w.line(0, "def _env_list(name, fallback=None):");
        w.line(1, "value = os.environ.get(name)");
        w.line(1, "if value is None:");
        w.line(2, "return fallback if fallback is not None else []");
        w.line(1, "return [item for item in value.split(\",\") if item]");
        w.blank();
        w.blank();
    }

    w.line(0, "def build_parser():");
    let mut parts = vec![format!("prog={}", py_str(name))];
    if let Some(desc) = &ir.meta.description {
        parts.push(format!("description={}", py_str(desc)));
    }
    w.line(
        1,
        &format!("parser = argparse.ArgumentParser({})", parts.join(", ")),
    );
    w.line(
        1,
        &format!(
            "parser.add_argument(\"--version\", action=\"version\", version={})",
            py_str(&format!("{name} {}", ir.meta.version))
        ),
    );
    emit_parser_tree(&mut w, ir, &ir.root);
    w.line(1, "return parser");
    w.blank();
    w.blank();

    if features.plugins {
        w.line(0, "def _load_plugins():");
        w.line(1, "\"\"\"Import the optional plugins package for its side effects.\"\"\"");
        w.line(1, "try:");
        w.line(2, &format!("importlib.import_module(\"{module}_plugins\")"));
        w.line(1, "except ImportError:");
        w.line(2, "pass");
        w.blank();
        w.blank();
    }

    w.line(0, "def main(argv=None):");
    if features.plugins {
        w.line(1, "_load_plugins()");
    }
    w.line(1, "parser = build_parser()");
    w.line(1, "ns = parser.parse_args(argv)");
    w.line(1, "handler = getattr(ns, \"_handler\", None)");
    w.line(1, "if handler is None:");
    w.line(2, "selected = getattr(ns, \"_path\", \"\")");
    w.line(2, "if selected:");
    w.line(
        3,
        "print(f\"missing subcommand for '{selected}'\", file=sys.stderr)",
    );
    w.line(2, "parser.print_usage(sys.stderr)");
    w.line(2, "return 2");
    w.line(1, "return handler(ns)");
    w.blank();
    w.blank();
    w.line(0, "if __name__ == \"__main__\":");
    w.line(1, "sys.exit(main())");
    w.finish()
}

fn handlers_py(ir: &Ir, module: &str, hooks_needed: bool) -> String {
    let name = &ir.meta.name;
    let mut w = SourceWriter::new("    ");

    w.line(0, &format!("\"\"\"Command handlers for {name}."));
    w.blank();
    w.line(
        0,
        "Standard commands dispatch to user hooks; managed bodies are owned by",
    );
    w.line(0, "the generator. Generated file; do not edit.");
    w.line(0, "\"\"\"");
    w.blank();
    if hooks_needed {
        w.line(0, "import importlib");
    }
    w.line(0, "import sys");
    w.blank();
    w.blank();
    w.line(0, "def _values(ns):");
    w.line(
        1,
        "return {key: value for key, value in vars(ns).items() if not key.startswith(\"_\")}",
    );
    w.blank();
    w.blank();

    if hooks_needed {
        w.line(0, "def _load_hook(name):");
        w.line(1, "try:");
        w.line(2, &format!("module = importlib.import_module(\"{module}_hooks\")"));
        w.line(1, "except ImportError:");
        w.line(2, "return None");
        w.line(1, "return getattr(module, name, None)");
        w.blank();
        w.blank();
    }

    for command in ir.commands() {
        let handler = hooks::snake_ident("handle", &command.path);
        let path = command.path_display();
        w.line(0, &format!("def {handler}(ns):"));
        if command.dispatches_to_hook() {
            let hook = hooks::snake_ident("hook", &command.path);
            w.line(1, &format!("hook = _load_hook({})", py_str(&hook)));
            w.line(1, "if hook is None:");
            w.line(
                2,
                &format!(
                    "print({}, file=sys.stderr)",
                    py_str(&format!(
                        "no hook defined for '{path}' (expected {module}_hooks.{hook})"
                    ))
                ),
            );
            w.line(
                2,
                &format!("print({}, file=sys.stderr)", py_str(&usage_line(ir, command))),
            );
            w.line(2, "return 1");
            w.line(
                1,
                &format!("return hook({}, _values(ns)) or 0", py_str(&path)),
            );
        } else {
            w.line(1, "# managed body; regenerated on every build");
            w.line(1, &format!("print({})", py_str(&format!("{name} {path}"))));
            w.line(1, "for key, value in sorted(_values(ns).items()):");
            w.line(2, "print(f\"  {key}={value}\")");
            w.line(1, "return 0");
        }
        w.blank();
        w.blank();
    }

    // Trim the trailing double blank after the last handler.
    let mut out = w.finish();
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn repl_py(ir: &Ir) -> String {
    let name = &ir.meta.name;
    let mut w = SourceWriter::new("    ");
    w.line(
        0,
        &format!("\"\"\"Interactive shell for {name}: one command line per prompt.\"\"\""),
    );
    w.blank();
    w.line(0, "import shlex");
    w.blank();
    w.line(0, "from .cli import main");
    w.blank();
    w.blank();
    w.line(0, "def run():");
    w.line(1, "while True:");
    w.line(2, "try:");
    w.line(3, &format!("line = input(\"{name}> \")"));
    w.line(2, "except EOFError:");
    w.line(3, "break");
    w.line(2, "if line.strip() in (\"exit\", \"quit\"):");
    w.line(3, "break");
    w.line(2, "if not line.strip():");
    w.line(3, "continue");
    w.line(2, "try:");
    w.line(3, "main(shlex.split(line))");
    w.line(2, "except SystemExit:");
    w.line(3, "pass");
    w.blank();
    w.blank();
    w.line(0, "if __name__ == \"__main__\":");
    w.line(1, "run()");
    w.finish()
}

fn readme(ir: &Ir, module: &str, hooks_needed: bool) -> String {
    let name = &ir.meta.name;
    let mut w = SourceWriter::new("  ");
    w.line(0, &format!("# {name}"));
    w.blank();
    if let Some(desc) = &ir.meta.description {
        w.line(0, desc);
        w.blank();
    }
    w.line(
        0,
        &format!(
            "Version {}. Generated project; edit the spec and regenerate instead of editing by hand.",
            ir.meta.version
        ),
    );
    w.blank();
    w.line(0, "Install with `pip install -e .`; the entry point is");
    w.line(0, &format!("`{name} = {module}.cli:main`."));
    w.blank();
    w.line(0, "## Commands");
    w.blank();
    fn list_commands(w: &mut SourceWriter, command: &CommandNode, depth: usize) {
        for child in visible_children(command) {
            let desc = child
                .description
                .as_deref()
                .map(|d| format!(" — {d}"))
                .unwrap_or_default();
            w.line(depth, &format!("- `{}`{desc}", child.path_display()));
            list_commands(w, child, depth + 1);
        }
    }
    list_commands(&mut w, &ir.root, 0);
    if hooks_needed {
        w.blank();
        w.line(0, "## Hooks");
        w.blank();
        w.line(
            0,
            &format!(
                "Standard commands dispatch to functions in an importable `{module}_hooks`"
            ),
        );
        w.line(
            0,
            "module. A hook receives the command path and a dict of parsed values;",
        );
        w.line(
            0,
            "its return value becomes the exit status. When a hook is missing, the",
        );
        w.line(0, "command prints its usage and fails.");
    }
    w.finish()
}
