//! Node backend: a commander-based package.
//!
//! Emits a `package.json` depending on commander, a `bin/` entry building
//! the command tree, and per-command handlers in `lib/handlers.js`. Hook
//! dispatch follows the hook contract with camelCase identifiers: a
//! standard command `server start` calls `hookServerStart(path, payload)`
//! exported from the user file `hooks.js`; a missing hook prints usage and
//! fails.
//!
//! Commander dispatches subcommands before positionals, so for commands
//! that have both children and their own arguments, the positionals are
//! left to the command's handler — same documented placeholder as the
//! python backend.

use crate::artifact::Artifact;
use crate::hooks;
use crate::output::{
    SourceWriter, argument_placeholder, completion_script, usage_line, visible_children,
};
use crate::traits::Renderer;
use mint_ir::{CommandNode, FeatureSet, Ir, OptionNode, ValueKind};

/// Static instance of the node renderer for the registry.
pub static NODE_RENDERER: NodeRenderer = NodeRenderer;

/// Renders a commander-based node package.
pub struct NodeRenderer;

impl Renderer for NodeRenderer {
    fn target(&self) -> &'static str {
        "node"
    }

    fn summary(&self) -> &'static str {
        "commander-based node package"
    }

    fn hook_ident(&self, path: &[String]) -> String {
        hooks::camel_ident("hook", path)
    }

    fn handler_ident(&self, path: &[String]) -> String {
        hooks::camel_ident("run", path)
    }

    fn render(&self, ir: &Ir, features: &FeatureSet) -> Vec<Artifact> {
        let hooks_needed =
            features.hooks || ir.commands().iter().any(|c| c.dispatches_to_hook());
        let name = &ir.meta.name;

        let mut artifacts = vec![
            Artifact::manifest("package.json", package_json(ir)),
            Artifact::source(format!("bin/{name}.js"), entry_js(ir, features)).executable(),
            Artifact::source("lib/handlers.js", handlers_js(ir, hooks_needed)),
        ];
        if features.interactive {
            artifacts.push(Artifact::source("lib/repl.js", repl_js(ir)));
        }
        if features.completion {
            artifacts.push(Artifact::script(
                format!("completions/{name}.bash"),
                completion_script(ir),
            ));
        }
        artifacts.push(Artifact::doc("README.md", readme(ir, hooks_needed)));
        artifacts
    }
}

/// Escape text for a single-quoted javascript string.
fn js_str(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' | '\'' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Escape text for a JSON string value.
fn json_str(text: &str) -> String {
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

fn package_json(ir: &Ir) -> String {
    let name = &ir.meta.name;
    let description = ir.meta.description.as_deref().unwrap_or("");
    format!(
        "{{\n  \"name\": {name_json},\n  \"version\": {version},\n  \"description\": {description},\n  \"bin\": {{\n    {name_json}: {bin}\n  }},\n  \"dependencies\": {{\n    \"commander\": \"^12.1.0\"\n  }}\n}}\n",
        name_json = json_str(name),
        version = json_str(&ir.meta.version),
        description = json_str(description),
        bin = json_str(&format!("bin/{name}.js")),
    )
}

/// Commander flag spec for one option, e.g. `-p, --port <value>`.
fn option_spec(opt: &OptionNode) -> String {
    let mut spec = match opt.short {
        Some(short) => format!("-{short}, --{}", opt.name),
        None => format!("--{}", opt.name),
    };
    match opt.kind {
        ValueKind::Bool => {}
        ValueKind::List => spec.push_str(" <value...>"),
        _ => spec.push_str(" <value>"),
    }
    spec
}

fn emit_option(w: &mut SourceWriter, owner: &str, opt: &OptionNode) {
    let mut chain = format!(
        "new Option({}, {})",
        js_str(&option_spec(opt)),
        js_str(opt.description.as_deref().unwrap_or(""))
    );
    if opt.kind == ValueKind::Enum {
        let choices: Vec<String> = opt.choices.iter().map(|c| js_str(c)).collect();
        chain.push_str(&format!(".choices([{}])", choices.join(", ")));
    }
    if opt.kind == ValueKind::Int {
        chain.push_str(".argParser((value) => parseInt(value, 10))");
    }
    if let Some(env) = &opt.env {
        chain.push_str(&format!(".env({})", js_str(env)));
    }
    if let Some(default) = &opt.default {
        let literal = match opt.kind {
            ValueKind::Bool => (default == "true").to_string(),
            ValueKind::Int if default.parse::<i64>().is_ok() => default.clone(),
            ValueKind::List => format!("[{}]", js_str(default)),
            _ => js_str(default),
        };
        chain.push_str(&format!(".default({literal})"));
    }
    if opt.required {
        chain.push_str(".makeOptionMandatory()");
    }
    w.line(0, &format!("{owner}.addOption({chain});"));
}

fn command_var(command: &CommandNode) -> String {
    if command.path.is_empty() {
        "program".to_string()
    } else {
        hooks::camel_ident("cmd", &command.path)
    }
}

/// Whether this command gets an `.action()` call of its own.
fn has_action(command: &CommandNode) -> bool {
    if command.children.is_empty() {
        return true;
    }
    // Parent: a default child handles bare invocation via isDefault;
    // otherwise a standard parent dispatches to its own hook, and a managed
    // parent falls back to commander's help output.
    !command.children.iter().any(|c| c.default) && command.dispatches_to_hook()
}

fn emit_command_tree(w: &mut SourceWriter, ir: &Ir, command: &CommandNode) {
    let var = command_var(command);

    let options = if command.path.is_empty() {
        &ir.global_options
    } else {
        &command.options
    };
    for opt in options {
        emit_option(w, &var, opt);
    }

    if command.children.is_empty() {
        for arg in &command.arguments {
            // Commander's own bracket syntax matches the shared placeholder,
            // variadic `...` included.
            let placeholder = argument_placeholder(arg);
            if arg.kind == ValueKind::Int {
                w.line(
                    0,
                    &format!(
                        "{var}.argument({}, {}, (value) => parseInt(value, 10));",
                        js_str(&placeholder),
                        js_str(arg.description.as_deref().unwrap_or(""))
                    ),
                );
            } else if let Some(desc) = &arg.description {
                w.line(
                    0,
                    &format!("{var}.argument({}, {});", js_str(&placeholder), js_str(desc)),
                );
            } else {
                w.line(0, &format!("{var}.argument({});", js_str(&placeholder)));
            }
        }
    }

    if has_action(command) && !command.path.is_empty() {
        let handler = hooks::camel_ident("run", &command.path);
        w.line(0, &format!("{var}.action((...invocation) => {{"));
        w.line(1, "invocation.pop();");
        w.line(
            1,
            "const options = Object.assign({}, program.opts(), invocation.pop());",
        );
        w.line(
            1,
            &format!(
                "process.exitCode = handlers.{handler}({}, invocation, options);",
                js_str(&command.path_display())
            ),
        );
        w.line(0, "});");
    }

    for child in &command.children {
        w.blank();
        let child_var = command_var(child);
        let mut opts = Vec::new();
        if child.default {
            opts.push("isDefault: true");
        }
        if child.hidden {
            opts.push("hidden: true");
        }
        let opts_arg = if opts.is_empty() {
            String::new()
        } else {
            format!(", {{ {} }}", opts.join(", "))
        };
        w.line(
            0,
            &format!(
                "const {child_var} = {}.command({}{opts_arg});",
                var,
                js_str(&child.name)
            ),
        );
        for alias in &child.aliases {
            w.line(0, &format!("{child_var}.alias({});", js_str(alias)));
        }
        if let Some(desc) = &child.description {
            w.line(0, &format!("{child_var}.description({});", js_str(desc)));
        }
        emit_command_tree(w, ir, child);
    }
}

fn entry_js(ir: &Ir, features: &FeatureSet) -> String {
    let name = &ir.meta.name;
    let mut w = SourceWriter::new("  ");

    w.line(0, "#!/usr/bin/env node");
    w.line(
        0,
        &format!("// Command-line interface for {name} {}.", ir.meta.version),
    );
    w.line(0, "// Generated file; regenerated on every build. Do not edit.");
    w.line(0, "'use strict';");
    w.blank();
    w.line(0, "const { program, Option } = require('commander');");
    if features.plugins {
        w.line(0, "const fs = require('fs');");
        w.line(0, "const path = require('path');");
    }
    w.blank();
    w.line(0, "const handlers = require('../lib/handlers');");
    w.blank();
    w.line(0, "program");
    w.line(1, &format!(".name({})", js_str(name)));
    w.line(1, &format!(".version({});", js_str(&ir.meta.version)));
    if let Some(desc) = &ir.meta.description {
        w.line(0, &format!("program.description({});", js_str(desc)));
    }
    w.blank();
    emit_command_tree(&mut w, ir, &ir.root);
    w.blank();

    if features.plugins {
        w.line(0, "// Plugins may register additional commands before dispatch.");
        w.line(
            0,
            "const pluginsDir = path.join(__dirname, '..', 'plugins');",
        );
        w.line(0, "if (fs.existsSync(pluginsDir)) {");
        w.line(1, "for (const file of fs.readdirSync(pluginsDir).sort()) {");
        w.line(2, "if (file.endsWith('.js')) {");
        w.line(3, "require(path.join(pluginsDir, file))(program);");
        w.line(2, "}");
        w.line(1, "}");
        w.line(0, "}");
        w.blank();
    }

    w.line(0, "program.parse();");
    w.finish()
}

fn handlers_js(ir: &Ir, hooks_needed: bool) -> String {
    let name = &ir.meta.name;
    let mut w = SourceWriter::new("  ");

    w.line(0, &format!("// Command handlers for {name}."));
    w.line(
        0,
        "// Standard commands dispatch to user hooks; managed bodies are",
    );
    w.line(0, "// regenerated on every build. Do not edit.");
    w.line(0, "'use strict';");
    w.blank();
    if hooks_needed {
        w.line(0, "const fs = require('fs');");
        w.line(0, "const path = require('path');");
        w.blank();
        w.line(0, "function loadHook(name) {");
        w.line(1, "const file = path.join(__dirname, '..', 'hooks.js');");
        w.line(1, "if (!fs.existsSync(file)) {");
        w.line(2, "return null;");
        w.line(1, "}");
        w.line(1, "const hooks = require(file);");
        w.line(
            1,
            "return typeof hooks[name] === 'function' ? hooks[name] : null;",
        );
        w.line(0, "}");
        w.blank();
    }

    let mut exports = Vec::new();
    for command in ir.commands() {
        let handler = hooks::camel_ident("run", &command.path);
        let path = command.path_display();
        exports.push(handler.clone());

        w.line(
            0,
            &format!("function {handler}(commandPath, positional, options) {{"),
        );
        if command.dispatches_to_hook() {
            let hook = hooks::camel_ident("hook", &command.path);
            w.line(1, &format!("const hook = loadHook({});", js_str(&hook)));
            w.line(1, "if (hook === null) {");
            w.line(
                2,
                &format!(
                    "console.error({});",
                    js_str(&format!(
                        "no hook defined for '{path}' (expected {hook} in hooks.js)"
                    ))
                ),
            );
            w.line(
                2,
                &format!("console.error({});", js_str(&usage_line(ir, command))),
            );
            w.line(2, "return 1;");
            w.line(1, "}");
            w.line(
                1,
                "return hook(commandPath, { positional, options }) || 0;",
            );
        } else {
            w.line(1, "// managed body; regenerated on every build");
            w.line(1, &format!("console.log({});", js_str(&format!("{name} {path}"))));
            w.line(1, "for (const key of Object.keys(options).sort()) {");
            w.line(2, "console.log(`  ${key}=${options[key]}`);");
            w.line(1, "}");
            w.line(1, "return 0;");
        }
        w.line(0, "}");
        w.blank();
    }

    w.line(0, &format!("module.exports = {{ {} }};", exports.join(", ")));
    w.finish()
}

fn repl_js(ir: &Ir) -> String {
    let name = &ir.meta.name;
    let mut w = SourceWriter::new("  ");
    w.line(
        0,
        &format!("// Interactive shell for {name}: one command line per prompt."),
    );
    w.line(0, "'use strict';");
    w.blank();
    w.line(0, "const path = require('path');");
    w.line(0, "const readline = require('readline');");
    w.line(0, "const { spawnSync } = require('child_process');");
    w.blank();
    w.line(
        0,
        &format!("const bin = path.join(__dirname, '..', 'bin', '{name}.js');"),
    );
    w.line(0, "const rl = readline.createInterface({");
    w.line(1, "input: process.stdin,");
    w.line(1, "output: process.stdout,");
    w.line(1, &format!("prompt: '{name}> ',"));
    w.line(0, "});");
    w.blank();
    w.line(0, "rl.prompt();");
    w.line(0, "rl.on('line', (line) => {");
    w.line(1, "const trimmed = line.trim();");
    w.line(1, "if (trimmed === 'exit' || trimmed === 'quit') {");
    w.line(2, "rl.close();");
    w.line(2, "return;");
    w.line(1, "}");
    w.line(1, "if (trimmed !== '') {");
    w.line(
        2,
        "spawnSync(process.execPath, [bin, ...trimmed.split(/\\s+/)], { stdio: 'inherit' });",
    );
    w.line(1, "}");
    w.line(1, "rl.prompt();");
    w.line(0, "});");
    w.finish()
}

fn readme(ir: &Ir, hooks_needed: bool) -> String {
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
    w.line(0, "Install dependencies with `npm install`; the executable is");
    w.line(0, &format!("`bin/{name}.js`."));
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
            "Standard commands dispatch to functions exported from `hooks.js` at the",
        );
        w.line(
            0,
            "project root. A hook receives the command path and a payload with the",
        );
        w.line(
            0,
            "positional and option values; its return value becomes the exit",
        );
        w.line(
            0,
            "status. When a hook is missing, the command prints its usage and fails.",
        );
    }
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint_ir::{AutoDetectPolicy, IrBuilder};

    fn render(yaml: &str) -> Vec<Artifact> {
        let ir = IrBuilder::build(&mint_config::parse_yaml(yaml).unwrap()).unwrap();
        let features = FeatureSet::analyze(&ir, &AutoDetectPolicy::default());
        NODE_RENDERER.render(&ir, &features)
    }

    fn by_path<'a>(artifacts: &'a [Artifact], path: &str) -> &'a Artifact {
        artifacts
            .iter()
            .find(|a| a.path == path)
            .unwrap_or_else(|| panic!("missing artifact {path}"))
    }

    #[test]
    fn package_json_declares_commander_and_bin() {
        let artifacts = render("metadata: {name: app, version: 1.0.0}");
        let manifest = &by_path(&artifacts, "package.json").content;
        assert!(manifest.contains("\"commander\": \"^12.1.0\""));
        assert!(manifest.contains("\"app\": \"bin/app.js\""));
    }

    #[test]
    fn command_tree_uses_camel_case_handlers() {
        let artifacts = render(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: server
    commands:
      - {name: start, aliases: [up]}
"#,
        );
        let entry = &by_path(&artifacts, "bin/app.js").content;
        assert!(entry.contains("const cmdServer = program.command('server');"));
        assert!(entry.contains("const cmdServerStart = cmdServer.command('start');"));
        assert!(entry.contains("cmdServerStart.alias('up');"));
        assert!(entry.contains("handlers.runServerStart('server start', invocation, options);"));

        let handlers = &by_path(&artifacts, "lib/handlers.js").content;
        assert!(handlers.contains("function runServerStart(commandPath, positional, options) {"));
        assert!(handlers.contains("loadHook('hookServerStart')"));
    }

    #[test]
    fn enum_and_env_options_use_commander_option_api() {
        let artifacts = render(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: deploy
    options:
      - {name: env, short: e, kind: enum, choices: [dev, prod], default: dev, env: APP_ENV, required: true}
"#,
        );
        let entry = &by_path(&artifacts, "bin/app.js").content;
        assert!(entry.contains("new Option('-e, --env <value>', '')"));
        assert!(entry.contains(".choices(['dev', 'prod'])"));
        assert!(entry.contains(".env('APP_ENV')"));
        assert!(entry.contains(".default('dev')"));
        assert!(entry.contains(".makeOptionMandatory()"));
    }

    #[test]
    fn default_and_hidden_children_map_to_commander_opts() {
        let artifacts = render(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: server
    kind: managed
    commands:
      - {name: start, default: true}
      - {name: debug, hidden: true}
"#,
        );
        let entry = &by_path(&artifacts, "bin/app.js").content;
        assert!(entry.contains("cmdServer.command('start', { isDefault: true });"));
        assert!(entry.contains("cmdServer.command('debug', { hidden: true });"));
        // Managed parent with a default child delegates to it, no own action.
        assert!(!entry.contains("handlers.runServer('server'"));
    }

    #[test]
    fn managed_handlers_skip_hook_loading() {
        let artifacts = render(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - {name: version, kind: managed}
"#,
        );
        let handlers = &by_path(&artifacts, "lib/handlers.js").content;
        assert!(handlers.contains("// managed body; regenerated on every build"));
        assert!(!handlers.contains("loadHook"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let yaml = r#"
metadata: {name: app, version: 1.0.0, description: A tool}
features: {completion: true, interactive: true, plugins: true}
commands:
  - name: server
    commands:
      - name: start
  - name: status
"#;
        assert_eq!(render(yaml), render(yaml));
    }
}
