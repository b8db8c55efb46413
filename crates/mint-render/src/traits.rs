//! The renderer contract.

use crate::artifact::Artifact;
use mint_ir::{FeatureSet, Ir};

/// A backend producing a ready-to-build project for one target ecosystem.
///
/// Implementations must be **total** (every command that passed validation
/// is rendered — hidden ones too, just absent from help and completion),
/// **pure** (the IR is borrowed immutably and never copied into mutable
/// state), and **deterministic** (identical input yields byte-identical
/// artifacts). [`verify_artifacts`](crate::verify_artifacts) re-checks
/// totality and path uniqueness after every render.
pub trait Renderer: Send + Sync {
    /// Registry key (e.g. "bash", "python", "node").
    fn target(&self) -> &'static str;

    /// One-line description of what gets generated.
    fn summary(&self) -> &'static str;

    /// Hook identifier for a command path.
    ///
    /// This is the name generated call sites use and the name a user's hook
    /// file must export. The transform depends only on the path, so adding
    /// unrelated sibling commands never changes it.
    fn hook_ident(&self, path: &[String]) -> String;

    /// Generated handler name for a command path.
    ///
    /// Used by the post-render completeness check: every command's handler
    /// identifier must appear in at least one source artifact.
    fn handler_ident(&self, path: &[String]) -> String;

    /// Render the full artifact set for one build.
    fn render(&self, ir: &Ir, features: &FeatureSet) -> Vec<Artifact>;
}
