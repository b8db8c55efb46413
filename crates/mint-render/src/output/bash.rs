//! Bash backend: a standalone script project.
//!
//! Emits one self-contained entry script under `bin/` containing usage
//! functions, per-command handlers, and the dispatcher, plus a Makefile,
//! README, and the optional feature artifacts. Hook dispatch follows the
//! hook contract: a standard command `server start` calls the user function
//! `hook_server_start` with the command path as `$1` and the parsed values
//! in the global `args` associative array; a missing hook prints usage and
//! fails, never a silent no-op.
//!
//! Commands that have both subcommands and their own positional arguments
//! are dispatched first; positionals that match no child fall through to
//! the command's own invocation, so no IR shape is dropped.

use crate::artifact::Artifact;
use crate::hooks;
use crate::output::{
    SourceWriter, argument_placeholder, columns, completion_script, env_prefix, usage_line,
    value_placeholder, visible_children,
};
use crate::traits::Renderer;
use mint_ir::{ArgNode, CommandNode, FeatureSet, Ir, OptionNode, ValueKind};

/// Static instance of the bash renderer for the registry.
pub static BASH_RENDERER: BashRenderer = BashRenderer;

/// Renders a bash script project.
pub struct BashRenderer;

impl Renderer for BashRenderer {
    fn target(&self) -> &'static str {
        "bash"
    }

    fn summary(&self) -> &'static str {
        "standalone bash script project"
    }

    fn hook_ident(&self, path: &[String]) -> String {
        hooks::snake_ident("hook", path)
    }

    fn handler_ident(&self, path: &[String]) -> String {
        hooks::snake_ident("cmd", path)
    }

    fn render(&self, ir: &Ir, features: &FeatureSet) -> Vec<Artifact> {
        // Standard commands need hook plumbing to be runnable even when the
        // explicit toggle is off.
        let hooks_needed =
            features.hooks || ir.commands().iter().any(|c| c.dispatches_to_hook());

        let name = &ir.meta.name;
        let mut artifacts = vec![
            Artifact::source(
                format!("bin/{name}"),
                entry_script(ir, features, hooks_needed),
            )
            .executable(),
        ];

        if features.interactive {
            artifacts
                .push(Artifact::source(format!("bin/{name}-repl"), repl_script(ir)).executable());
        }
        if features.completion {
            artifacts.push(Artifact::script(
                format!("completions/{name}.bash"),
                completion_script(ir),
            ));
        }
        artifacts.push(Artifact::manifest("Makefile", makefile(ir, features)));
        artifacts.push(Artifact::doc("README.md", readme(ir, features, hooks_needed)));
        artifacts
    }
}

/// Escape text for a double-quoted bash string.
fn sh_dq(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '"' | '$' | '`' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn usage_fn_name(path: &[String]) -> String {
    if path.is_empty() {
        "usage".to_string()
    } else {
        hooks::snake_ident("usage", path)
    }
}

fn option_rows(options: &[OptionNode]) -> Vec<(String, String)> {
    let mut rows: Vec<(String, String)> = options
        .iter()
        .map(|opt| {
            let mut label = match opt.short {
                Some(short) => format!("-{short}, --{}", opt.name),
                None => format!("    --{}", opt.name),
            };
            if let Some(placeholder) = value_placeholder(opt) {
                label.push(' ');
                label.push_str(&placeholder);
            }
            let mut desc = opt.description.clone().unwrap_or_default();
            if let Some(default) = &opt.default {
                desc.push_str(&format!(" [default: {default}]"));
            }
            if let Some(env) = &opt.env {
                desc.push_str(&format!(" [env: {env}]"));
            }
            (label, desc.trim().to_string())
        })
        .collect();
    rows.push(("-h, --help".to_string(), "Print help".to_string()));
    rows
}

fn command_rows(command: &CommandNode) -> Vec<(String, String)> {
    visible_children(command)
        .iter()
        .map(|child| {
            let label = if child.aliases.is_empty() {
                child.name.clone()
            } else {
                format!("{} ({})", child.name, child.aliases.join(", "))
            };
            (label, child.description.clone().unwrap_or_default())
        })
        .collect()
}

/// Emit one `usage_*` function.
fn emit_usage_fn(w: &mut SourceWriter, ir: &Ir, command: &CommandNode) {
    w.line(0, &format!("{}() {{", usage_fn_name(&command.path)));
    if command.path.is_empty() {
        w.line(
            1,
            &format!("echo \"{} {}\"", sh_dq(&ir.meta.name), sh_dq(&ir.meta.version)),
        );
        if let Some(desc) = &ir.meta.description {
            w.line(1, &format!("echo \"{}\"", sh_dq(desc)));
        }
        w.line(1, "echo \"\"");
    } else if let Some(desc) = &command.description {
        w.line(1, &format!("echo \"{}\"", sh_dq(desc)));
        w.line(1, "echo \"\"");
    }
    w.line(1, &format!("echo \"{}\"", sh_dq(&usage_line(ir, command))));

    let children = command_rows(command);
    if !children.is_empty() {
        w.line(1, "echo \"\"");
        w.line(1, "echo \"Commands:\"");
        for row in columns(&children) {
            w.line(1, &format!("echo \"  {}\"", sh_dq(&row)));
        }
    }

    let options = if command.path.is_empty() {
        &ir.global_options
    } else {
        &command.options
    };
    w.line(1, "echo \"\"");
    w.line(1, "echo \"Options:\"");
    for row in columns(&option_rows(options)) {
        w.line(1, &format!("echo \"  {}\"", sh_dq(&row)));
    }
    w.line(0, "}");
    w.blank();
}

/// Emit option default/env initialization lines.
fn emit_option_inits(w: &mut SourceWriter, options: &[OptionNode]) {
    for opt in options {
        let target = format!("args[{}]", opt.name);
        match (&opt.env, &opt.default) {
            (Some(env), Some(default)) => {
                w.line(1, &format!("{target}=\"${{{env}:-{}}}\"", sh_dq(default)));
            }
            (Some(env), None) => {
                w.line(1, &format!("{target}=\"${{{env}:-}}\""));
            }
            (None, Some(default)) => {
                w.line(1, &format!("{target}=\"{}\"", sh_dq(default)));
            }
            (None, None) => {}
        }
    }
}

/// Emit the option-parsing `case` arms for one option list.
fn emit_option_arms(w: &mut SourceWriter, options: &[OptionNode], usage_fn: &str) {
    for opt in options {
        let pattern = match opt.short {
            Some(short) => format!("-{short}|--{}", opt.name),
            None => format!("--{}", opt.name),
        };
        w.line(3, &format!("{pattern})"));
        match opt.kind {
            ValueKind::Bool => {
                w.line(4, &format!("args[{}]=1", opt.name));
                w.line(4, "shift");
            }
            ValueKind::List => {
                w.line(
                    4,
                    &format!(
                        "args[{name}]=\"${{args[{name}]:+${{args[{name}]}} }}${{2:?missing value for --{name}}}\"",
                        name = opt.name
                    ),
                );
                w.line(4, "shift 2");
            }
            _ => {
                w.line(
                    4,
                    &format!(
                        "args[{name}]=\"${{2:?missing value for --{name}}}\"",
                        name = opt.name
                    ),
                );
                w.line(4, "shift 2");
            }
        }
        w.line(4, ";;");
    }
    w.line(3, "-h|--help)");
    w.line(4, usage_fn);
    w.line(4, "return 0");
    w.line(4, ";;");
}

/// Emit post-parse option validations: required, enum choices, integers.
fn emit_option_checks(w: &mut SourceWriter, options: &[OptionNode], usage_fn: &str) {
    for opt in options {
        let name = &opt.name;
        if opt.required {
            w.line(1, &format!("if [[ -z \"${{args[{name}]:-}}\" ]]; then"));
            w.line(2, &format!("echo \"missing required option: --{name}\" >&2"));
            w.line(2, &format!("{usage_fn} >&2"));
            w.line(2, "return 1");
            w.line(1, "fi");
        }
        if opt.kind == ValueKind::Enum {
            let choices = opt.choices.join("|");
            w.line(
                1,
                &format!("case \"${{args[{name}]:-}}\" in {choices}|\"\") ;; *)"),
            );
            w.line(
                2,
                &format!(
                    "echo \"invalid value for --{name}: '${{args[{name}]}}' (choices: {})\" >&2",
                    sh_dq(&opt.choices.join(", "))
                ),
            );
            w.line(2, "return 1");
            w.line(2, ";;");
            w.line(1, "esac");
        }
        if opt.kind == ValueKind::Int {
            w.line(
                1,
                &format!(
                    "if [[ -n \"${{args[{name}]:-}}\" && ! \"${{args[{name}]}}\" =~ ^-?[0-9]+$ ]]; then"
                ),
            );
            w.line(
                2,
                &format!("echo \"invalid integer for --{name}: '${{args[{name}]}}'\" >&2"),
            );
            w.line(2, "return 1");
            w.line(1, "fi");
        }
    }
}

/// Emit positional validation, binding, and the final invocation for a
/// command invoked in its own right (indented by `level`).
fn emit_invocation_tail(w: &mut SourceWriter, ir: &Ir, command: &CommandNode, level: usize) {
    let usage_fn = usage_fn_name(&command.path);
    let required: Vec<&ArgNode> = command.arguments.iter().filter(|a| a.required).collect();
    let has_variadic = command.arguments.last().is_some_and(|a| a.variadic);

    if !required.is_empty() {
        let placeholders: Vec<String> =
            required.iter().map(|a| argument_placeholder(a)).collect();
        w.line(
            level,
            &format!("if ((${{#_positional[@]}} < {})); then", required.len()),
        );
        w.line(
            level + 1,
            &format!(
                "echo \"missing required argument(s): {}\" >&2",
                sh_dq(&placeholders.join(" "))
            ),
        );
        w.line(level + 1, &format!("{usage_fn} >&2"));
        w.line(level + 1, "return 1");
        w.line(level, "fi");
    }
    if !has_variadic {
        let max = command.arguments.len();
        w.line(
            level,
            &format!("if ((${{#_positional[@]}} > {max})); then"),
        );
        w.line(
            level + 1,
            &format!("echo \"unexpected argument: ${{_positional[{max}]}}\" >&2"),
        );
        w.line(level + 1, &format!("{usage_fn} >&2"));
        w.line(level + 1, "return 1");
        w.line(level, "fi");
    }

    for (i, arg) in command.arguments.iter().enumerate() {
        let name = &arg.name;
        if arg.variadic {
            w.line(level, &format!("args[{name}]=\"${{_positional[*]:{i}}}\""));
        } else {
            w.line(level, &format!("args[{name}]=\"${{_positional[{i}]:-}}\""));
        }
        if arg.kind == ValueKind::Enum {
            let choices = arg.choices.join("|");
            w.line(
                level,
                &format!("case \"${{args[{name}]:-}}\" in {choices}|\"\") ;; *)"),
            );
            w.line(
                level + 1,
                &format!(
                    "echo \"invalid value for {name}: '${{args[{name}]}}' (choices: {})\" >&2",
                    sh_dq(&arg.choices.join(", "))
                ),
            );
            w.line(level + 1, "return 1");
            w.line(level + 1, ";;");
            w.line(level, "esac");
        }
        if arg.kind == ValueKind::Int {
            w.line(
                level,
                &format!(
                    "if [[ -n \"${{args[{name}]:-}}\" && ! \"${{args[{name}]}}\" =~ ^-?[0-9]+$ ]]; then"
                ),
            );
            w.line(
                level + 1,
                &format!("echo \"invalid integer for {name}: '${{args[{name}]}}'\" >&2"),
            );
            w.line(level + 1, "return 1");
            w.line(level, "fi");
        }
    }

    if command.dispatches_to_hook() {
        w.line(
            level,
            &format!(
                "invoke_hook {} \"{}\"",
                hooks::snake_ident("hook", &command.path),
                sh_dq(&command.path_display())
            ),
        );
    } else {
        let display = if command.path.is_empty() {
            ir.meta.name.clone()
        } else {
            format!("{} {}", ir.meta.name, command.path_display())
        };
        w.line(level, "# managed body; regenerated on every build");
        w.line(level, &format!("echo \"{}\"", sh_dq(&display)));
        w.line(
            level,
            "for _key in $(printf '%s\\n' \"${!args[@]}\" | LC_ALL=C sort); do",
        );
        w.line(level + 1, "echo \"  ${_key}=${args[$_key]}\"");
        w.line(level, "done");
    }
}

/// Emit one command function (or `main` for the synthesized root).
fn emit_command_fn(w: &mut SourceWriter, ir: &Ir, command: &CommandNode) {
    let is_root = command.path.is_empty();
    let fn_name = if is_root {
        "main".to_string()
    } else {
        hooks::snake_ident("cmd", &command.path)
    };
    let usage_fn = usage_fn_name(&command.path);
    let options = if is_root {
        &ir.global_options
    } else {
        &command.options
    };
    let has_children = !command.children.is_empty();
    let own_arguments = !command.arguments.is_empty();

    w.line(0, &format!("{fn_name}() {{"));
    w.line(1, "local _positional=()");
    emit_option_inits(w, options);

    w.line(1, "while (($#)); do");
    w.line(2, "case \"$1\" in");
    emit_option_arms(w, options, &usage_fn);
    if is_root {
        w.line(3, "--version)");
        w.line(
            4,
            &format!("echo \"{} {}\"", sh_dq(&ir.meta.name), sh_dq(&ir.meta.version)),
        );
        w.line(4, "return 0");
        w.line(4, ";;");
    }
    if !has_children {
        w.line(3, "--)");
        w.line(4, "shift");
        w.line(4, "_positional+=(\"$@\")");
        w.line(4, "set --");
        w.line(4, ";;");
    }
    w.line(3, "-*)");
    w.line(4, "echo \"unknown option: $1\" >&2");
    w.line(4, &format!("{usage_fn} >&2"));
    w.line(4, "return 1");
    w.line(4, ";;");
    w.line(3, "*)");
    if has_children {
        w.line(4, "break");
    } else {
        w.line(4, "_positional+=(\"$1\")");
        w.line(4, "shift");
    }
    w.line(4, ";;");
    w.line(2, "esac");
    w.line(1, "done");

    emit_option_checks(w, options, &usage_fn);

    if has_children {
        w.line(1, "case \"${1:-}\" in");
        for child in &command.children {
            let mut patterns = vec![child.name.clone()];
            patterns.extend(child.aliases.iter().cloned());
            w.line(2, &format!("{})", patterns.join("|")));
            w.line(3, "shift");
            w.line(
                3,
                &format!("{} \"$@\"", hooks::snake_ident("cmd", &child.path)),
            );
            w.line(3, ";;");
        }
        w.line(2, "\"\")");
        if let Some(default) = command.children.iter().find(|c| c.default) {
            w.line(3, &hooks::snake_ident("cmd", &default.path));
        } else if own_arguments || (!is_root && command.dispatches_to_hook()) {
            emit_invocation_tail(w, ir, command, 3);
        } else {
            w.line(3, &format!("{usage_fn} >&2"));
            w.line(3, "return 1");
        }
        w.line(3, ";;");
        w.line(2, "*)");
        if own_arguments {
            w.line(3, "_positional=(\"$@\")");
            emit_invocation_tail(w, ir, command, 3);
        } else {
            let prefix = if is_root {
                String::new()
            } else {
                format!("{} ", command.path_display())
            };
            w.line(
                3,
                &format!("echo \"unknown command: {}$1\" >&2", sh_dq(&prefix)),
            );
            w.line(3, &format!("{usage_fn} >&2"));
            w.line(3, "return 1");
        }
        w.line(3, ";;");
        w.line(1, "esac");
    } else {
        emit_invocation_tail(w, ir, command, 1);
    }

    w.line(0, "}");
    w.blank();
}

fn entry_script(ir: &Ir, features: &FeatureSet, hooks_needed: bool) -> String {
    let name = &ir.meta.name;
    let prefix = env_prefix(name);
    let mut w = SourceWriter::new("  ");

    w.line(0, "#!/usr/bin/env bash");
    match &ir.meta.description {
        Some(desc) => w.line(0, &format!("# {name} {} — {desc}", ir.meta.version)),
        None => w.line(0, &format!("# {name} {}", ir.meta.version)),
    }
    w.line(
        0,
        "# Generated file; regenerated on every build. Do not edit.",
    );
    w.line(0, "set -euo pipefail");
    w.blank();

    if hooks_needed || features.plugins {
        w.line(
            0,
            &format!("{prefix}_ROOT=\"$(cd \"$(dirname \"${{BASH_SOURCE[0]}}\")/..\" && pwd)\""),
        );
        w.blank();
    }

    if hooks_needed {
        w.line(
            0,
            "# Standard commands dispatch to user hooks. A hook receives the",
        );
        w.line(
            0,
            "# command path as $1 and reads parsed values from the `args` array.",
        );
        w.line(
            0,
            &format!("{prefix}_HOOKS_DIR=\"${{{prefix}_HOOKS_DIR:-${prefix}_ROOT/hooks}}\""),
        );
        w.line(0, &format!("if [[ -d \"${prefix}_HOOKS_DIR\" ]]; then"));
        w.line(1, &format!("for _hook_file in \"${prefix}_HOOKS_DIR\"/*.sh; do"));
        w.line(2, "if [[ -e \"$_hook_file\" ]]; then");
        w.line(3, "source \"$_hook_file\"");
        w.line(2, "fi");
        w.line(1, "done");
        w.line(0, "fi");
        w.blank();
        w.line(0, "invoke_hook() {");
        w.line(1, "local hook=\"$1\" command_path=\"$2\"");
        w.line(1, "if declare -F \"$hook\" >/dev/null 2>&1; then");
        w.line(2, "\"$hook\" \"$command_path\"");
        w.line(1, "else");
        w.line(
            2,
            &format!(
                "echo \"no hook defined for '$command_path' (expected function '$hook' in ${prefix}_HOOKS_DIR)\" >&2"
            ),
        );
        w.line(2, "\"usage_${hook#hook_}\" >&2");
        w.line(2, "return 1");
        w.line(1, "fi");
        w.line(0, "}");
        w.blank();
    }

    if features.plugins {
        w.line(0, "# Plugins are sourced before dispatch.");
        w.line(
            0,
            &format!("{prefix}_PLUGINS_DIR=\"${{{prefix}_PLUGINS_DIR:-${prefix}_ROOT/plugins}}\""),
        );
        w.line(0, &format!("if [[ -d \"${prefix}_PLUGINS_DIR\" ]]; then"));
        w.line(
            1,
            &format!("for _plugin_file in \"${prefix}_PLUGINS_DIR\"/*.sh; do"),
        );
        w.line(2, "if [[ -e \"$_plugin_file\" ]]; then");
        w.line(3, "source \"$_plugin_file\"");
        w.line(2, "fi");
        w.line(1, "done");
        w.line(0, "fi");
        w.blank();
    }

    w.line(0, "declare -A args=()");
    w.blank();

    emit_usage_fn(&mut w, ir, &ir.root);
    for command in ir.commands() {
        emit_usage_fn(&mut w, ir, command);
    }

    for command in ir.commands() {
        emit_command_fn(&mut w, ir, command);
    }
    emit_command_fn(&mut w, ir, &ir.root);

    w.line(0, "main \"$@\"");
    w.finish()
}

fn repl_script(ir: &Ir) -> String {
    let name = &ir.meta.name;
    let mut w = SourceWriter::new("  ");
    w.line(0, "#!/usr/bin/env bash");
    w.line(
        0,
        &format!("# Interactive shell for {name}: one command line per prompt."),
    );
    w.line(
        0,
        "# Generated file; regenerated on every build. Do not edit.",
    );
    w.line(0, "set -euo pipefail");
    w.blank();
    w.line(
        0,
        &format!("BIN=\"$(cd \"$(dirname \"${{BASH_SOURCE[0]}}\")\" && pwd)/{name}\""),
    );
    w.blank();
    w.line(0, &format!("while IFS= read -r -e -p \"{name}> \" line; do"));
    w.line(1, "case \"$line\" in");
    w.line(2, "exit|quit)");
    w.line(3, "break");
    w.line(3, ";;");
    w.line(2, "\"\")");
    w.line(3, "continue");
    w.line(3, ";;");
    w.line(2, "*)");
    w.line(3, "# shellcheck disable=SC2086");
    w.line(3, "\"$BIN\" $line || true");
    w.line(3, ";;");
    w.line(1, "esac");
    w.line(0, "done");
    w.finish()
}

fn makefile(ir: &Ir, features: &FeatureSet) -> String {
    let name = &ir.meta.name;
    let mut scripts = format!("bin/{name}");
    if features.interactive {
        scripts.push_str(&format!(" bin/{name}-repl"));
    }
    format!(
        "# Build configuration for {name} {version}.\n\
         # Generated file; regenerated on every build. Do not edit.\n\
         \n\
         PREFIX ?= /usr/local\n\
         \n\
         .PHONY: check install\n\
         \n\
         check:\n\
         \tbash -n {scripts}\n\
         \n\
         install: check\n\
         \tinstall -d $(PREFIX)/bin\n\
         \tinstall -m 0755 bin/{name} $(PREFIX)/bin/{name}\n",
        version = ir.meta.version,
    )
}

fn readme(ir: &Ir, features: &FeatureSet, hooks_needed: bool) -> String {
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
            "Standard commands dispatch to functions defined in `hooks/*.sh`:",
        );
        w.blank();
        for command in ir.commands() {
            if command.dispatches_to_hook() {
                w.line(
                    0,
                    &format!(
                        "- `{}` calls `{}`",
                        command.path_display(),
                        hooks::snake_ident("hook", &command.path)
                    ),
                );
            }
        }
        w.blank();
        w.line(
            0,
            "A hook receives the command path as `$1` and reads parsed option and",
        );
        w.line(
            0,
            "argument values from the global `args` associative array. Its return",
        );
        w.line(
            0,
            "value becomes the exit status. When a hook is missing, the command",
        );
        w.line(0, "prints its usage and fails.");
    }
    if features.completion {
        w.blank();
        w.line(0, "## Completion");
        w.blank();
        w.line(
            0,
            &format!("Source `completions/{name}.bash` from your shell profile."),
        );
    }
    if features.interactive {
        w.blank();
        w.line(0, "## Interactive mode");
        w.blank();
        w.line(
            0,
            &format!("Run `bin/{name}-repl` for a prompt that feeds lines to the CLI."),
        );
    }
    w.finish()
}
