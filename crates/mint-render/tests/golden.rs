//! Golden-file tests for manifest artifacts.
//!
//! Determinism (checked separately) is what makes these meaningful: the
//! manifests below must never drift without the snapshot changing too.

use mint_ir::{AutoDetectPolicy, FeatureSet, Ir, IrBuilder};
use mint_render::renderer_for_target;

const SPEC: &str = r#"
metadata:
  name: sum
  version: 0.3.0
  description: Sum numbers
features:
  completion: true
commands:
  - name: add
    description: Add numbers
    arguments:
      - {name: values, variadic: true}
"#;

fn ir() -> Ir {
    IrBuilder::build(&mint_config::parse_yaml(SPEC).unwrap()).unwrap()
}

fn manifest(target: &str) -> String {
    let ir = ir();
    let features = FeatureSet::analyze(&ir, &AutoDetectPolicy::default());
    let renderer = renderer_for_target(target).unwrap();
    renderer
        .render(&ir, &features)
        .into_iter()
        .find(|a| a.category == mint_render::ArtifactCategory::Manifest)
        .expect("manifest artifact")
        .content
}

#[test]
fn bash_makefile() {
    insta::assert_snapshot!("bash_makefile", manifest("bash"));
}

#[test]
fn python_pyproject() {
    insta::assert_snapshot!("python_pyproject", manifest("python"));
}

#[test]
fn node_package_json() {
    insta::assert_snapshot!("node_package_json", manifest("node"));
}
