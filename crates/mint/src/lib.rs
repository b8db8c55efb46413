//! Generate ready-to-build CLI projects from a command spec.
//!
//! `mint` is the orchestration layer over the generation pipeline:
//!
//! ```text
//! spec file ──> mint-config ──> mint-ir ──────> mint-render ──> writer
//!               (parse)         (validate,      (render one     (commit one
//!                                analyze)        target)         target's tree)
//! ```
//!
//! One [`pipeline::Orchestrator`] drives exactly one build invocation
//! through the linear state machine `Parsing → BuildingIr →
//! AnalyzingFeatures → Rendering → Writing → Done`, failing fast to
//! `Failed` on the first stage error. The stages themselves are pure
//! in-memory transforms; all file I/O lives in [`writer`]. Because the IR
//! is immutable and the renderer registry is read-only, callers may fan out
//! builds for several targets concurrently, each with its own orchestrator.
//!
//! # Example
//!
//! ```
//! let spec = mint_config::parse_yaml(r#"
//! metadata:
//!   name: greet
//!   version: 0.1.0
//! commands:
//!   - name: hello
//! "#).unwrap();
//!
//! let output = mint::pipeline::build(&spec, "bash").unwrap();
//! assert!(output.artifacts.iter().any(|a| a.path == "bin/greet"));
//! ```

pub mod cli;
pub mod pipeline;
pub mod writer;

pub use pipeline::{BuildError, BuildErrorKind, BuildOutput, Orchestrator, PipelineState};
pub use writer::WriteError;
