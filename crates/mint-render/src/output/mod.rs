//! Built-in target backends.
//!
//! Each backend turns an IR into a complete project for one ecosystem. All
//! of them share the bash completion script (completion is a bash concern
//! regardless of the implementation language) and the identifier transforms
//! from [`hooks`](crate::hooks).

#[cfg(feature = "target-bash")]
pub mod bash;

#[cfg(feature = "target-node")]
pub mod node;

#[cfg(feature = "target-python")]
pub mod python;

use mint_ir::{ArgNode, CommandNode, Ir, OptionNode, ValueKind};

/// Line-oriented source accumulator with a per-target indent unit.
pub(crate) struct SourceWriter {
    unit: &'static str,
    out: String,
}

impl SourceWriter {
    pub fn new(unit: &'static str) -> Self {
        Self {
            unit,
            out: String::new(),
        }
    }

    pub fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str(self.unit);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Children that appear in help and completion listings.
pub(crate) fn visible_children(command: &CommandNode) -> Vec<&CommandNode> {
    command.children.iter().filter(|c| !c.hidden).collect()
}

/// `--flag` and `-f` spellings for an option list.
pub(crate) fn option_flags(options: &[OptionNode]) -> Vec<String> {
    let mut out = Vec::new();
    for opt in options {
        out.push(format!("--{}", opt.name));
        if let Some(short) = opt.short {
            out.push(format!("-{short}"));
        }
    }
    out
}

/// Value placeholder for help text, by kind.
pub(crate) fn value_placeholder(opt: &OptionNode) -> Option<String> {
    match opt.kind {
        ValueKind::Bool => None,
        ValueKind::Enum => Some(format!("<{}>", opt.choices.join("|"))),
        ValueKind::Int => Some("<int>".to_string()),
        ValueKind::List => Some("<value>...".to_string()),
        ValueKind::String => Some("<value>".to_string()),
    }
}

/// Left-pad a two-column listing so descriptions line up.
pub(crate) fn columns(rows: &[(String, String)]) -> Vec<String> {
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(left, right)| {
            if right.is_empty() {
                left.clone()
            } else {
                format!("{left:width$}  {right}")
            }
        })
        .collect()
}

/// Sanitized shell identifier fragment for a project name.
pub(crate) fn shell_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() { c } else { '_' }
        })
        .collect()
}

/// Environment-variable prefix for a project name (`my-app` → `MY_APP`).
pub(crate) fn env_prefix(name: &str) -> String {
    shell_name(name).to_ascii_uppercase()
}

/// `<name>` / `[name]` / `[name...]` placeholder for one argument.
pub(crate) fn argument_placeholder(arg: &ArgNode) -> String {
    let inner = if arg.variadic {
        format!("{}...", arg.name)
    } else {
        arg.name.clone()
    };
    if arg.required {
        format!("<{inner}>")
    } else {
        format!("[{inner}]")
    }
}

/// `Usage:` line for one command (the root included).
pub(crate) fn usage_line(ir: &Ir, command: &CommandNode) -> String {
    let mut parts = vec![format!("Usage: {}", ir.meta.name)];
    if !command.path.is_empty() {
        parts.push(command.path_display());
    }
    let has_options = if command.path.is_empty() {
        !ir.global_options.is_empty()
    } else {
        !command.options.is_empty()
    };
    if has_options {
        parts.push("[OPTIONS]".to_string());
    }
    if !command.children.is_empty() {
        parts.push("<command>".to_string());
    }
    for arg in &command.arguments {
        parts.push(argument_placeholder(arg));
    }
    parts.join(" ")
}

/// Bash completion script shared by every backend.
///
/// Candidates are keyed by the canonical command path typed so far; hidden
/// commands never appear. This is deliberately static word completion, not
/// the fuzzy-matching layer, which is out of scope for generated projects.
pub(crate) fn completion_script(ir: &Ir) -> String {
    let name = &ir.meta.name;
    let fn_name = shell_name(name);
    let mut w = SourceWriter::new("  ");

    w.line(0, &format!("# Bash completion for {name}."));
    w.line(
        0,
        "# Generated file; regenerated on every build. Do not edit.",
    );
    w.blank();
    w.line(0, &format!("_{fn_name}_candidates() {{"));
    w.line(1, "case \"$1\" in");

    // Root scope: top-level commands plus global flags.
    let mut root_words: Vec<String> = Vec::new();
    for child in visible_children(&ir.root) {
        root_words.push(child.name.clone());
        root_words.extend(child.aliases.iter().cloned());
    }
    root_words.extend(option_flags(&ir.global_options));
    w.line(1, &format!("\"\") echo \"{}\" ;;", root_words.join(" ")));

    // One arm per visible command path.
    for command in ir.commands() {
        if command.hidden {
            continue;
        }
        let mut words: Vec<String> = Vec::new();
        for child in visible_children(command) {
            words.push(child.name.clone());
            words.extend(child.aliases.iter().cloned());
        }
        words.extend(option_flags(&command.options));
        w.line(
            1,
            &format!("\"{}\") echo \"{}\" ;;", command.path_display(), words.join(" ")),
        );
    }

    w.line(1, "*) echo \"\" ;;");
    w.line(1, "esac");
    w.line(0, "}");
    w.blank();
    w.line(0, &format!("_{fn_name}_complete() {{"));
    w.line(1, "local cur=\"${COMP_WORDS[COMP_CWORD]}\"");
    w.line(1, "local path=\"${COMP_WORDS[*]:1:COMP_CWORD-1}\"");
    w.line(
        1,
        &format!("COMPREPLY=($(compgen -W \"$(_{fn_name}_candidates \"$path\")\" -- \"$cur\"))"),
    );
    w.line(0, "}");
    w.blank();
    w.line(0, &format!("complete -F _{fn_name}_complete {name}"));
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint_ir::IrBuilder;

    fn ir(yaml: &str) -> Ir {
        IrBuilder::build(&mint_config::parse_yaml(yaml).unwrap()).unwrap()
    }

    #[test]
    fn completion_lists_visible_commands_only() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: server
    commands:
      - {name: start, aliases: [up]}
  - {name: secret, hidden: true}
"#,
        );
        let script = completion_script(&ir);
        assert!(script.contains("\"\") echo \"server\" ;;"));
        assert!(script.contains("\"server\") echo \"start up\" ;;"));
        assert!(!script.contains("secret"));
        assert!(script.contains("complete -F _app_complete app"));
    }

    #[test]
    fn columns_align_descriptions() {
        let rows = vec![
            ("start".to_string(), "Start it".to_string()),
            ("st".to_string(), "Short".to_string()),
        ];
        assert_eq!(columns(&rows), vec!["start  Start it", "st     Short"]);
    }

    #[test]
    fn env_prefix_sanitizes() {
        assert_eq!(env_prefix("my-app"), "MY_APP");
        assert_eq!(env_prefix("app2"), "APP2");
    }
}
