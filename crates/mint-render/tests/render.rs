//! Cross-backend integration tests for the renderer contract.

use mint_ir::{AutoDetectPolicy, FeatureSet, Ir, IrBuilder};
use mint_render::{renderer_for_target, renderers, targets, verify_artifacts};

fn ir(yaml: &str) -> Ir {
    IrBuilder::build(&mint_config::parse_yaml(yaml).unwrap()).unwrap()
}

fn features(ir: &Ir) -> FeatureSet {
    FeatureSet::analyze(ir, &AutoDetectPolicy::default())
}

const KITCHEN_SINK: &str = r#"
metadata:
  name: forge
  version: 2.1.0
  description: Build and ship things
features:
  completion: true
  interactive: true
  plugins: true
global_options:
  - {name: verbose, short: v, kind: bool, description: Verbose output}
commands:
  - name: server
    description: Manage the server
    aliases: [srv]
    commands:
      - name: start
        default: true
        description: Start the server
        options:
          - {name: host, env: FORGE_HOST, default: localhost}
          - {name: port, short: p, kind: int, default: "8080"}
      - name: stop
        kind: managed
  - name: deploy
    options:
      - {name: env, short: e, kind: enum, choices: [dev, staging, prod], required: true}
      - {name: tag, kind: list}
    arguments:
      - {name: service, required: true}
      - {name: extras, variadic: true}
  - {name: debug, hidden: true}
"#;

#[test]
fn every_backend_satisfies_the_contract_on_the_kitchen_sink() {
    let ir = ir(KITCHEN_SINK);
    let features = features(&ir);
    for renderer in renderers() {
        let artifacts = renderer.render(&ir, &features);
        verify_artifacts(&ir, renderer, &artifacts)
            .unwrap_or_else(|e| panic!("{}: {e}", renderer.target()));
    }
}

#[test]
fn every_backend_is_deterministic() {
    let ir = ir(KITCHEN_SINK);
    let features = features(&ir);
    for renderer in renderers() {
        assert_eq!(
            renderer.render(&ir, &features),
            renderer.render(&ir, &features),
            "{} not byte-identical across runs",
            renderer.target()
        );
    }
}

#[test]
fn single_command_entry_references_exactly_one_handler() {
    let ir = ir(
        r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: status
"#,
    );
    let renderer = renderer_for_target("bash").unwrap();
    let artifacts = renderer.render(&ir, &features(&ir));
    let entry = artifacts
        .iter()
        .find(|a| a.path == "bin/app")
        .expect("entry-point artifact");

    let handler_defs: Vec<&str> = entry
        .content
        .lines()
        .filter(|line| line.starts_with("cmd_") && line.ends_with("() {"))
        .collect();
    assert_eq!(handler_defs, vec!["cmd_status() {"]);
}

#[test]
fn unknown_target_reports_the_registered_keys() {
    let err = renderer_for_target("cobol").unwrap_err();
    assert_eq!(err.target, "cobol");
    for key in ["bash", "python", "node"] {
        assert!(err.known.iter().any(|k| k == key), "missing {key}");
    }
}

#[test]
fn hook_identifiers_are_stable_under_sibling_additions() {
    let before = ir(
        r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: server
    commands:
      - name: start
"#,
    );
    let after = ir(
        r#"
metadata: {name: app, version: 1.0.0}
commands:
  - name: server
    commands:
      - name: start
      - name: stop
  - name: unrelated
"#,
    );

    let path = |ir: &Ir| {
        ir.commands()
            .iter()
            .find(|c| c.path_display() == "server start")
            .unwrap()
            .path
            .clone()
    };

    for renderer in renderers() {
        assert_eq!(
            renderer.hook_ident(&path(&before)),
            renderer.hook_ident(&path(&after)),
            "{} hook ident drifted",
            renderer.target()
        );
    }
}

#[test]
fn hidden_commands_are_rendered_by_every_backend() {
    let ir = ir(KITCHEN_SINK);
    let features = features(&ir);
    let debug_path = vec!["debug".to_string()];
    for renderer in renderers() {
        let artifacts = renderer.render(&ir, &features);
        let handler = renderer.handler_ident(&debug_path);
        assert!(
            artifacts.iter().any(|a| a.content.contains(&handler)),
            "{} dropped the hidden command",
            renderer.target()
        );
        // ...but completion never advertises it.
        let completion = artifacts
            .iter()
            .find(|a| a.path.starts_with("completions/"))
            .expect("completion artifact");
        assert!(!completion.content.contains("debug"));
    }
}

#[test]
fn all_four_artifact_categories_appear() {
    use mint_render::ArtifactCategory;

    let ir = ir(KITCHEN_SINK);
    let features = features(&ir);
    for renderer in renderers() {
        let artifacts = renderer.render(&ir, &features);
        for category in [
            ArtifactCategory::Source,
            ArtifactCategory::Manifest,
            ArtifactCategory::Doc,
            ArtifactCategory::Script,
        ] {
            assert!(
                artifacts.iter().any(|a| a.category == category),
                "{} missing {:?} artifact",
                renderer.target(),
                category
            );
        }
    }
}

#[test]
fn targets_listing_is_stable() {
    assert_eq!(targets(), renderers().iter().map(|r| r.target()).collect::<Vec<_>>());
}
