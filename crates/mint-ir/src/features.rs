//! Feature analysis: IR → derived capability flags.

use crate::model::Ir;
use serde::Serialize;

/// Derived capability flags controlling optional artifact emission.
///
/// Renderers treat this as read-only input. Analysis is pure and idempotent:
/// the same IR and policy always yield the same set, so it is safe to call
/// speculatively (e.g. for dry-run estimation) before committing to a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    /// Emit shell-completion scripts.
    pub completion: bool,
    /// Emit interactive-mode scaffolding.
    pub interactive: bool,
    /// Emit plugin-loading scaffolding.
    pub plugins: bool,
    /// Emit hook-loading scaffolding.
    pub hooks: bool,
}

/// Caller-supplied thresholds for heuristic detection.
///
/// Every heuristic is off unless its threshold is set — there are no
/// built-in numeric cutoffs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoDetectPolicy {
    /// Enable completion when the tree has at least this many commands.
    pub completion_command_threshold: Option<usize>,
}

impl From<&mint_config::AutoSpec> for AutoDetectPolicy {
    fn from(auto: &mint_config::AutoSpec) -> Self {
        Self {
            completion_command_threshold: auto.completion_command_threshold,
        }
    }
}

impl FeatureSet {
    /// Derive the feature set for one build.
    ///
    /// Explicit opt-ins always win; the completion heuristic can only turn
    /// the flag on, never off. `hooks` is additionally set whenever any
    /// standard command exists, since those dispatch to user hooks at
    /// runtime.
    pub fn analyze(ir: &Ir, policy: &AutoDetectPolicy) -> Self {
        let completion = ir.toggles.completion
            || policy
                .completion_command_threshold
                .is_some_and(|threshold| ir.command_count() >= threshold);

        let hooks = ir.toggles.hooks || ir.commands().iter().any(|c| c.dispatches_to_hook());

        Self {
            completion,
            interactive: ir.toggles.interactive,
            plugins: ir.toggles.plugins,
            hooks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IrBuilder;

    fn ir(yaml: &str) -> Ir {
        IrBuilder::build(&mint_config::parse_yaml(yaml).unwrap()).unwrap()
    }

    #[test]
    fn explicit_opt_ins_win() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
features: {completion: true, interactive: true, plugins: true}
"#,
        );
        let features = FeatureSet::analyze(&ir, &AutoDetectPolicy::default());
        assert!(features.completion);
        assert!(features.interactive);
        assert!(features.plugins);
    }

    #[test]
    fn no_threshold_means_no_heuristic() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: a
  - name: b
  - name: c
"#,
        );
        let features = FeatureSet::analyze(&ir, &AutoDetectPolicy::default());
        assert!(!features.completion);
    }

    #[test]
    fn completion_threshold_is_caller_configurable() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: a
  - name: b
  - name: c
"#,
        );
        let at_three = AutoDetectPolicy {
            completion_command_threshold: Some(3),
        };
        let at_four = AutoDetectPolicy {
            completion_command_threshold: Some(4),
        };
        assert!(FeatureSet::analyze(&ir, &at_three).completion);
        assert!(!FeatureSet::analyze(&ir, &at_four).completion);
    }

    #[test]
    fn standard_commands_imply_hooks() {
        let with_standard = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: status
"#,
        );
        assert!(FeatureSet::analyze(&with_standard, &AutoDetectPolicy::default()).hooks);

        let all_managed = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - {name: status, kind: managed}
"#,
        );
        assert!(!FeatureSet::analyze(&all_managed, &AutoDetectPolicy::default()).hooks);
    }

    #[test]
    fn analysis_is_idempotent() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
features: {hooks: true}
commands:
  - name: status
"#,
        );
        let policy = AutoDetectPolicy {
            completion_command_threshold: Some(1),
        };
        assert_eq!(
            FeatureSet::analyze(&ir, &policy),
            FeatureSet::analyze(&ir, &policy)
        );
    }
}
