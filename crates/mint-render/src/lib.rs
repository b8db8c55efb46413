//! Renderer backends: IR → per-target artifact sets.
//!
//! `mint-render` is the backend half of the generation pipeline. One
//! validated [`Ir`](mint_ir::Ir) goes in; a complete, ready-to-build project
//! for one target-language ecosystem comes out as an ordered list of
//! [`Artifact`]s.
//!
//! ```text
//!                           Renderers
//!                      ─────────────────────
//! Ir + FeatureSet ──┬─> bash    (script project)
//!                   ├─> python  (argparse package)
//!                   └─> node    (commander package)
//! ```
//!
//! Every renderer obeys the same contract (see [`Renderer`]):
//!
//! - **Totality** — every IR node that passed validation is rendered;
//!   hidden commands are dispatchable but absent from help and completion.
//! - **Purity** — renderers receive `&Ir` and cannot mutate it.
//! - **Determinism** — identical input yields byte-identical artifacts,
//!   which is what makes golden-file testing possible.
//!
//! [`verify_artifacts`] re-checks the first two after the fact; the
//! orchestrator runs it on every render before artifacts leave the
//! pipeline.
//!
//! # Registering a custom target
//!
//! ```ignore
//! use mint_render::{Renderer, register_renderer};
//!
//! struct FishRenderer;
//!
//! impl Renderer for FishRenderer {
//!     fn target(&self) -> &'static str { "fish" }
//!     // ...
//! }
//!
//! // Before first use; no other component changes.
//! register_renderer(&FishRenderer);
//! ```

mod artifact;
mod contract;
pub mod hooks;
mod registry;
mod traits;

pub mod output;

pub use artifact::{Artifact, ArtifactCategory};
pub use contract::{RenderContractViolation, verify_artifacts};
pub use registry::{
    RendererRegistry, UnsupportedTargetError, register_renderer, renderer_for_target, renderers,
    targets,
};
pub use traits::Renderer;

#[cfg(feature = "target-bash")]
pub use output::bash::BashRenderer;
#[cfg(feature = "target-node")]
pub use output::node::NodeRenderer;
#[cfg(feature = "target-python")]
pub use output::python::PythonRenderer;
