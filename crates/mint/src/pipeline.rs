//! The build pipeline: a single-use, linear state machine.

use crate::writer;
use mint_config::{LoadError, Spec, SpecFormat};
use mint_ir::{AutoDetectPolicy, FeatureSet, IrBuilder, IrValidationError};
use mint_render::{
    Artifact, RenderContractViolation, UnsupportedTargetError, renderer_for_target,
    verify_artifacts,
};
use std::fmt;
use std::path::Path;

/// Pipeline stage. Transitions are strictly linear; `Failed` is reachable
/// from any stage on the first unrecoverable error, and there is no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineState {
    Parsing,
    BuildingIr,
    AnalyzingFeatures,
    Rendering,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PipelineState::Parsing => "parsing",
            PipelineState::BuildingIr => "building-ir",
            PipelineState::AnalyzingFeatures => "analyzing-features",
            PipelineState::Rendering => "rendering",
            PipelineState::Writing => "writing",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// A pipeline failure: the furthest stage reached plus that stage's full
/// error detail (aggregate reports included, never truncated).
#[derive(Debug, thiserror::Error)]
#[error("build failed during {state}: {kind}")]
pub struct BuildError {
    pub state: PipelineState,
    pub kind: BuildErrorKind,
}

/// Stage-specific error detail.
#[derive(Debug, thiserror::Error)]
pub enum BuildErrorKind {
    #[error(transparent)]
    Parse(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] IrValidationError),

    #[error(transparent)]
    UnsupportedTarget(#[from] UnsupportedTargetError),

    #[error(transparent)]
    Contract(#[from] RenderContractViolation),

    #[error(transparent)]
    Write(#[from] writer::WriteError),
}

/// Everything a successful build produces.
#[derive(Debug)]
pub struct BuildOutput {
    /// Ordered artifact set for the requested target.
    pub artifacts: Vec<Artifact>,
    /// The derived feature set (useful for dry-run reporting).
    pub features: FeatureSet,
    /// Root directory the artifacts expect, from the spec metadata.
    pub output_root: String,
}

/// Drives one build invocation through the pipeline.
///
/// Single-use: the entry points consume `self`, so an orchestrator can
/// never be reused across builds. The only state shared between concurrent
/// invocations is the read-only renderer registry.
pub struct Orchestrator {
    state: PipelineState,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Parsing,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Record a stage failure, preserving the stage it happened in.
    fn fail(&mut self, kind: impl Into<BuildErrorKind>) -> BuildError {
        let state = self.state;
        self.state = PipelineState::Failed;
        BuildError {
            state,
            kind: kind.into(),
        }
    }

    /// Parse source text, then run the in-memory stages.
    pub fn build_source(
        mut self,
        text: &str,
        format: SpecFormat,
        target: &str,
    ) -> Result<BuildOutput, BuildError> {
        let spec = self.parse(text, format)?;
        let output = self.stages(&spec, target)?;
        self.state = PipelineState::Done;
        Ok(output)
    }

    /// Run the in-memory stages on an already-parsed spec.
    pub fn build_spec(mut self, spec: &Spec, target: &str) -> Result<BuildOutput, BuildError> {
        let output = self.stages(spec, target)?;
        self.state = PipelineState::Done;
        Ok(output)
    }

    /// Run the full pipeline including the Writing stage.
    ///
    /// Artifacts are staged fully in memory first; nothing touches disk
    /// until the renderer has finished and passed the contract check, so a
    /// failed render leaves no partial tree behind.
    pub fn build_and_write(
        mut self,
        spec: &Spec,
        target: &str,
        out_dir: &Path,
    ) -> Result<BuildOutput, BuildError> {
        let output = self.stages(spec, target)?;
        self.state = PipelineState::Writing;
        match writer::write_artifacts(out_dir, &output.artifacts) {
            Ok(written) => {
                tracing::info!(files = written.len(), out = %out_dir.display(), "artifacts written");
            }
            Err(e) => return Err(self.fail(e)),
        }
        self.state = PipelineState::Done;
        Ok(output)
    }

    fn parse(&mut self, text: &str, format: SpecFormat) -> Result<Spec, BuildError> {
        self.state = PipelineState::Parsing;
        let parsed = match format {
            SpecFormat::Yaml => mint_config::parse_yaml(text),
            SpecFormat::Json => mint_config::parse_json(text),
        };
        parsed.map_err(|e| self.fail(e))
    }

    /// The pure in-memory stages: BuildingIr → AnalyzingFeatures →
    /// Rendering (with the post-render contract check).
    fn stages(&mut self, spec: &Spec, target: &str) -> Result<BuildOutput, BuildError> {
        self.state = PipelineState::BuildingIr;
        let ir = match IrBuilder::build(spec) {
            Ok(ir) => ir,
            // Fail fast here: FeatureAnalyzer and renderers never see an
            // invalid tree, even though the builder aggregated its report.
            Err(e) => return Err(self.fail(e)),
        };
        tracing::debug!(commands = ir.command_count(), "ir built");

        self.state = PipelineState::AnalyzingFeatures;
        let policy = AutoDetectPolicy::from(&spec.features.auto);
        let features = FeatureSet::analyze(&ir, &policy);

        self.state = PipelineState::Rendering;
        let renderer = match renderer_for_target(target) {
            Ok(renderer) => renderer,
            Err(e) => return Err(self.fail(e)),
        };
        let artifacts = renderer.render(&ir, &features);
        if let Err(e) = verify_artifacts(&ir, renderer, &artifacts) {
            return Err(self.fail(e));
        }
        tracing::debug!(target, artifacts = artifacts.len(), "rendered");

        Ok(BuildOutput {
            artifacts,
            features,
            output_root: ir.meta.output_root.clone(),
        })
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary entry point: artifacts for one (spec, target) pair.
pub fn build(spec: &Spec, target: &str) -> Result<BuildOutput, BuildError> {
    Orchestrator::new().build_spec(spec, target)
}
