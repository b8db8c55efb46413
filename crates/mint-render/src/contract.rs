//! Post-render contract checks.
//!
//! Renderers are trusted to be total, but the orchestrator verifies rather
//! than assumes: after every render the artifact set is checked for path
//! collisions and for commands that no source artifact references. A
//! violation is surfaced as-is — never silently corrected.

use crate::artifact::{Artifact, ArtifactCategory};
use crate::traits::Renderer;
use mint_ir::Ir;
use std::collections::HashSet;

/// A renderer returned artifacts violating a structural postcondition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderContractViolation {
    #[error("target {target:?} emitted no artifacts")]
    EmptyArtifactSet { target: String },

    #[error("target {target:?} emitted duplicate artifact path {path:?}")]
    DuplicateArtifactPath { target: String, path: String },

    #[error(
        "target {target:?} skipped command {command:?}: no source artifact mentions {handler:?}"
    )]
    SkippedCommand {
        target: String,
        command: String,
        handler: String,
    },
}

/// Check one render invocation's output against the renderer contract.
pub fn verify_artifacts(
    ir: &Ir,
    renderer: &dyn Renderer,
    artifacts: &[Artifact],
) -> Result<(), RenderContractViolation> {
    let target = renderer.target();

    if artifacts.is_empty() {
        return Err(RenderContractViolation::EmptyArtifactSet {
            target: target.to_string(),
        });
    }

    let mut paths = HashSet::new();
    for artifact in artifacts {
        if !paths.insert(artifact.path.as_str()) {
            return Err(RenderContractViolation::DuplicateArtifactPath {
                target: target.to_string(),
                path: artifact.path.clone(),
            });
        }
    }

    let sources: Vec<&Artifact> = artifacts
        .iter()
        .filter(|a| a.category == ArtifactCategory::Source)
        .collect();

    for command in ir.commands() {
        let handler = renderer.handler_ident(&command.path);
        let referenced = sources.iter().any(|a| a.content.contains(&handler));
        if !referenced {
            return Err(RenderContractViolation::SkippedCommand {
                target: target.to_string(),
                command: command.path_display(),
                handler,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks;
    use mint_ir::{FeatureSet, IrBuilder};

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn target(&self) -> &'static str {
            "null"
        }
        fn summary(&self) -> &'static str {
            "emits nothing useful"
        }
        fn hook_ident(&self, path: &[String]) -> String {
            hooks::snake_ident("hook", path)
        }
        fn handler_ident(&self, path: &[String]) -> String {
            hooks::snake_ident("cmd", path)
        }
        fn render(&self, _ir: &Ir, _features: &FeatureSet) -> Vec<Artifact> {
            Vec::new()
        }
    }

    fn ir(yaml: &str) -> Ir {
        IrBuilder::build(&mint_config::parse_yaml(yaml).unwrap()).unwrap()
    }

    #[test]
    fn empty_set_is_a_violation() {
        let ir = ir("metadata: {name: app, version: 1.0.0}");
        let err = verify_artifacts(&ir, &NullRenderer, &[]).unwrap_err();
        assert!(matches!(
            err,
            RenderContractViolation::EmptyArtifactSet { .. }
        ));
    }

    #[test]
    fn duplicate_paths_are_a_violation() {
        let ir = ir("metadata: {name: app, version: 1.0.0}");
        let artifacts = vec![
            Artifact::source("bin/app", "main"),
            Artifact::doc("bin/app", "shadowed"),
        ];
        let err = verify_artifacts(&ir, &NullRenderer, &artifacts).unwrap_err();
        assert_eq!(
            err,
            RenderContractViolation::DuplicateArtifactPath {
                target: "null".into(),
                path: "bin/app".into(),
            }
        );
    }

    #[test]
    fn skipped_command_is_detected() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: status
"#,
        );
        let artifacts = vec![Artifact::source("bin/app", "nothing relevant")];
        let err = verify_artifacts(&ir, &NullRenderer, &artifacts).unwrap_err();
        assert_eq!(
            err,
            RenderContractViolation::SkippedCommand {
                target: "null".into(),
                command: "status".into(),
                handler: "cmd_status".into(),
            }
        );
    }

    #[test]
    fn referenced_commands_pass() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: status
"#,
        );
        let artifacts = vec![Artifact::source("bin/app", "cmd_status() { :; }")];
        assert!(verify_artifacts(&ir, &NullRenderer, &artifacts).is_ok());
    }

    #[test]
    fn doc_artifacts_do_not_satisfy_the_completeness_check() {
        let ir = ir(
            r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: status
"#,
        );
        let artifacts = vec![
            Artifact::source("bin/app", "placeholder"),
            Artifact::doc("README.md", "cmd_status"),
        ];
        assert!(verify_artifacts(&ir, &NullRenderer, &artifacts).is_err());
    }
}
