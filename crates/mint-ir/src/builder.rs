//! Spec-to-IR transform with aggregate validation.
//!
//! Validation is not fail-fast: the whole tree is walked once and every
//! violation found is collected into a single [`IrValidationError`], so a
//! caller sees all problems at once. The walk is linear in the number of
//! nodes; nesting depth is structurally unbounded.

use crate::model::{ArgNode, BuildMeta, CommandNode, FeatureToggles, Ir, OptionNode};
use mint_config::{ArgumentSpec, CommandKind, CommandSpec, OptionSpec, Spec, ValueKind};
use std::collections::{HashMap, HashSet};

/// Builds the immutable IR from a normalized spec.
pub struct IrBuilder;

/// One structural violation, qualified by the path where it was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("{scope}: duplicate command name {name:?}")]
    DuplicateCommandName { scope: String, name: String },

    #[error("{scope}: short flag -{flag} used by both --{first} and --{second}")]
    DuplicateShortFlag {
        scope: String,
        flag: char,
        first: String,
        second: String,
    },

    #[error("{scope}: multiple default commands: {}", .names.join(", "))]
    MultipleDefaults { scope: String, names: Vec<String> },

    #[error("{scope}: required argument {argument:?} follows an optional argument")]
    RequiredAfterOptional { scope: String, argument: String },

    #[error("{scope}: variadic argument {argument:?} must be last")]
    VariadicNotLast { scope: String, argument: String },

    #[error("{scope}: {item} is enum-kind but declares no choices")]
    MissingChoices { scope: String, item: String },
}

/// Aggregate report of every structural violation found in one pass.
#[derive(Debug, thiserror::Error)]
#[error("{}", render_report(.violations))]
pub struct IrValidationError {
    pub violations: Vec<Violation>,
}

fn render_report(violations: &[Violation]) -> String {
    let mut out = format!(
        "command specification has {} violation{}:",
        violations.len(),
        if violations.len() == 1 { "" } else { "s" }
    );
    for v in violations {
        out.push_str("\n  - ");
        out.push_str(&v.to_string());
    }
    out
}

/// Scope label for violation messages. The top level renders as `(root)`.
fn scope_label(path: &[String]) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.join(" ")
    }
}

impl IrBuilder {
    /// Transform a spec into a validated IR, or report every violation found.
    ///
    /// Deterministic: identical specs yield structurally equal IRs, and
    /// violations are reported in declaration order.
    pub fn build(spec: &Spec) -> Result<Ir, IrValidationError> {
        let mut violations = Vec::new();

        check_options("(global options)", &spec.global_options, &mut violations);
        let children = build_scope(&[], &spec.commands, &mut violations);

        if !violations.is_empty() {
            return Err(IrValidationError { violations });
        }

        // The root is generator-owned: its dispatcher body is regenerated
        // every build and never consults user hooks.
        let root = CommandNode {
            name: spec.metadata.name.clone(),
            path: Vec::new(),
            description: spec.metadata.description.clone(),
            aliases: Vec::new(),
            hidden: false,
            kind: CommandKind::Managed,
            default: false,
            options: Vec::new(),
            arguments: Vec::new(),
            children,
        };

        Ok(Ir {
            root,
            global_options: spec.global_options.iter().map(option_node).collect(),
            meta: BuildMeta {
                name: spec.metadata.name.clone(),
                version: spec.metadata.version.clone(),
                description: spec.metadata.description.clone(),
                output_root: spec
                    .metadata
                    .output_root
                    .clone()
                    .unwrap_or_else(|| spec.metadata.name.clone()),
            },
            toggles: FeatureToggles {
                completion: spec.features.completion,
                interactive: spec.features.interactive,
                plugins: spec.features.plugins,
                hooks: spec.features.hooks,
            },
        })
    }
}

/// Validate one sibling scope and build its nodes.
fn build_scope(
    parent_path: &[String],
    specs: &[CommandSpec],
    violations: &mut Vec<Violation>,
) -> Vec<CommandNode> {
    let scope = scope_label(parent_path);

    // Names and aliases share one namespace per scope: an alias shadowing a
    // sibling would make dispatch ambiguous in every target.
    let mut seen: HashSet<&str> = HashSet::new();
    for spec in specs {
        for name in std::iter::once(spec.name.as_str()).chain(spec.aliases.iter().map(String::as_str))
        {
            if !seen.insert(name) {
                violations.push(Violation::DuplicateCommandName {
                    scope: scope.clone(),
                    name: name.to_string(),
                });
            }
        }
    }

    let defaults: Vec<String> = specs
        .iter()
        .filter(|c| c.default)
        .map(|c| c.name.clone())
        .collect();
    if defaults.len() > 1 {
        violations.push(Violation::MultipleDefaults {
            scope: scope.clone(),
            names: defaults,
        });
    }

    specs
        .iter()
        .map(|spec| build_command(parent_path, spec, violations))
        .collect()
}

fn build_command(
    parent_path: &[String],
    spec: &CommandSpec,
    violations: &mut Vec<Violation>,
) -> CommandNode {
    let mut path = parent_path.to_vec();
    path.push(spec.name.clone());
    let scope = scope_label(&path);

    check_options(&scope, &spec.options, violations);
    check_arguments(&scope, &spec.arguments, violations);

    let children = build_scope(&path, &spec.commands, violations);

    CommandNode {
        name: spec.name.clone(),
        path,
        description: spec.description.clone(),
        aliases: spec.aliases.clone(),
        hidden: spec.hidden,
        kind: spec.kind,
        default: spec.default,
        options: spec.options.iter().map(option_node).collect(),
        arguments: spec.arguments.iter().map(arg_node).collect(),
        children,
    }
}

/// Short-flag uniqueness and enum-choice presence for one option list.
fn check_options(scope: &str, options: &[OptionSpec], violations: &mut Vec<Violation>) {
    let mut shorts: HashMap<char, &str> = HashMap::new();
    for opt in options {
        if let Some(flag) = opt.short {
            if let Some(first) = shorts.get(&flag) {
                violations.push(Violation::DuplicateShortFlag {
                    scope: scope.to_string(),
                    flag,
                    first: first.to_string(),
                    second: opt.name.clone(),
                });
            } else {
                shorts.insert(flag, &opt.name);
            }
        }
        if opt.kind == ValueKind::Enum && opt.choices.is_empty() {
            violations.push(Violation::MissingChoices {
                scope: scope.to_string(),
                item: format!("option --{}", opt.name),
            });
        }
    }
}

/// Ordering rules: required before optional, variadic last, enum choices.
fn check_arguments(scope: &str, arguments: &[ArgumentSpec], violations: &mut Vec<Violation>) {
    let mut seen_optional = false;
    for (i, arg) in arguments.iter().enumerate() {
        if arg.required && seen_optional {
            violations.push(Violation::RequiredAfterOptional {
                scope: scope.to_string(),
                argument: arg.name.clone(),
            });
        }
        if !arg.required {
            seen_optional = true;
        }
        if arg.variadic && i + 1 != arguments.len() {
            violations.push(Violation::VariadicNotLast {
                scope: scope.to_string(),
                argument: arg.name.clone(),
            });
        }
        if arg.kind == ValueKind::Enum && arg.choices.is_empty() {
            violations.push(Violation::MissingChoices {
                scope: scope.to_string(),
                item: format!("argument {:?}", arg.name),
            });
        }
    }
}

fn option_node(spec: &OptionSpec) -> OptionNode {
    OptionNode {
        name: spec.name.clone(),
        short: spec.short,
        description: spec.description.clone(),
        kind: spec.kind,
        default: spec.default.clone(),
        required: spec.required,
        choices: spec.choices.clone(),
        env: spec.env.clone(),
    }
}

fn arg_node(spec: &ArgumentSpec) -> ArgNode {
    ArgNode {
        name: spec.name.clone(),
        description: spec.description.clone(),
        kind: spec.kind,
        required: spec.required,
        choices: spec.choices.clone(),
        variadic: spec.variadic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(yaml: &str) -> Spec {
        mint_config::parse_yaml(yaml).unwrap()
    }

    #[test]
    fn minimal_spec_builds() {
        let ir = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: status
"#,
        ))
        .unwrap();

        assert_eq!(ir.root.name, "app");
        assert_eq!(ir.root.kind, CommandKind::Managed);
        assert_eq!(ir.command_count(), 1);
        assert_eq!(ir.meta.output_root, "app");
        assert!(ir.root.children[0].options.is_empty());
        assert!(ir.root.children[0].arguments.is_empty());
    }

    #[test]
    fn zero_command_spec_is_valid() {
        let ir = IrBuilder::build(&spec("metadata: {name: app, version: 1.0.0}")).unwrap();
        assert_eq!(ir.command_count(), 0);
    }

    #[test]
    fn build_is_deterministic() {
        let s = spec(
            r#"
metadata: {name: app, version: 1.0.0}
global_options:
  - {name: verbose, short: v, kind: bool}
commands:
  - name: server
    commands:
      - {name: start, default: true}
      - name: stop
"#,
        );
        assert_eq!(IrBuilder::build(&s).unwrap(), IrBuilder::build(&s).unwrap());
    }

    #[test]
    fn sibling_defaults_fail_naming_both() {
        let err = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - {name: up, default: true}
  - {name: down, default: true}
"#,
        ))
        .unwrap_err();

        assert_eq!(err.violations.len(), 1);
        let msg = err.to_string();
        assert!(msg.contains("up"));
        assert!(msg.contains("down"));
        assert!(msg.contains("(root)"));
    }

    #[test]
    fn conflicting_short_flags_fail() {
        let err = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: build
    options:
      - {name: env, short: e}
      - {name: edit, short: e}
"#,
        ))
        .unwrap_err();

        assert_eq!(err.violations.len(), 1);
        let msg = err.violations[0].to_string();
        assert!(msg.contains("-e"));
        assert!(msg.contains("--env"));
        assert!(msg.contains("--edit"));
        assert!(msg.starts_with("build:"));
    }

    #[test]
    fn duplicate_names_rejected_at_depth() {
        let err = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: server
    commands:
      - name: start
      - name: start
"#,
        ))
        .unwrap_err();

        assert_eq!(
            err.violations,
            vec![Violation::DuplicateCommandName {
                scope: "server".into(),
                name: "start".into(),
            }]
        );
    }

    #[test]
    fn alias_shadowing_a_sibling_is_a_duplicate() {
        let err = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: status
  - name: state
    aliases: [status]
"#,
        ))
        .unwrap_err();

        assert!(matches!(
            err.violations[0],
            Violation::DuplicateCommandName { ref name, .. } if name == "status"
        ));
    }

    #[test]
    fn argument_ordering_rules() {
        let err = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: copy
    arguments:
      - {name: src, required: false}
      - {name: dst, required: true}
  - name: run
    arguments:
      - {name: files, variadic: true}
      - {name: mode}
"#,
        ))
        .unwrap_err();

        assert_eq!(err.violations.len(), 2);
        assert!(matches!(
            err.violations[0],
            Violation::RequiredAfterOptional { ref argument, .. } if argument == "dst"
        ));
        assert!(matches!(
            err.violations[1],
            Violation::VariadicNotLast { ref argument, .. } if argument == "files"
        ));
    }

    #[test]
    fn enum_without_choices_rejected_everywhere() {
        let err = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
global_options:
  - {name: color, kind: enum}
commands:
  - name: build
    options:
      - {name: env, kind: enum}
    arguments:
      - {name: level, kind: enum}
"#,
        ))
        .unwrap_err();

        assert_eq!(err.violations.len(), 3);
        assert!(err.violations[0].to_string().contains("(global options)"));
    }

    #[test]
    fn all_violations_arrive_in_one_report() {
        let err = IrBuilder::build(&spec(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - {name: up, default: true}
  - {name: up, default: true}
  - name: build
    options:
      - {name: env, short: e}
      - {name: edit, short: e}
"#,
        ))
        .unwrap_err();

        // duplicate name, multiple defaults, short collision — all at once
        assert_eq!(err.violations.len(), 3);
        let report = err.to_string();
        assert!(report.contains("3 violations"));
    }

    #[test]
    fn output_root_override() {
        let ir = IrBuilder::build(&spec(
            "metadata: {name: app, version: 1.0.0, output_root: out/app}",
        ))
        .unwrap();
        assert_eq!(ir.meta.output_root, "out/app");
    }
}
