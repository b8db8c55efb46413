//! Registry of renderer backends.

use crate::traits::Renderer;
use std::sync::{OnceLock, RwLock};

/// Global registry of renderers.
static RENDERERS: RwLock<Vec<&'static dyn Renderer>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Unknown target key; lists every registered key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported target {target:?} (registered targets: {})", .known.join(", "))]
pub struct UnsupportedTargetError {
    pub target: String,
    pub known: Vec<String>,
}

/// Register a custom renderer.
///
/// Call this before any generation operations to add custom targets.
/// Built-in renderers are registered automatically on first use.
pub fn register_renderer(renderer: &'static dyn Renderer) {
    RENDERERS.write().unwrap().push(renderer);
}

/// Initialize built-in renderers (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let mut renderers = RENDERERS.write().unwrap();

        #[cfg(feature = "target-bash")]
        {
            renderers.push(&crate::output::bash::BASH_RENDERER);
        }

        #[cfg(feature = "target-python")]
        {
            renderers.push(&crate::output::python::PYTHON_RENDERER);
        }

        #[cfg(feature = "target-node")]
        {
            renderers.push(&crate::output::node::NODE_RENDERER);
        }
    });
}

/// Resolve a renderer by target key from the global registry.
pub fn renderer_for_target(target: &str) -> Result<&'static dyn Renderer, UnsupportedTargetError> {
    init_builtin();
    let guard = RENDERERS.read().unwrap();
    match guard.iter().find(|r| r.target() == target).copied() {
        Some(renderer) => Ok(renderer),
        None => Err(UnsupportedTargetError {
            target: target.to_string(),
            known: guard.iter().map(|r| r.target().to_string()).collect(),
        }),
    }
}

/// All registered renderers.
pub fn renderers() -> Vec<&'static dyn Renderer> {
    init_builtin();
    RENDERERS.read().unwrap().clone()
}

/// All registered target keys.
pub fn targets() -> Vec<&'static str> {
    init_builtin();
    RENDERERS.read().unwrap().iter().map(|r| r.target()).collect()
}

/// An isolated renderer registry.
///
/// For most use cases, prefer the global registry via
/// [`register_renderer()`], [`renderer_for_target()`], and [`targets()`].
/// Use `RendererRegistry` when you need an isolated set (e.g. testing, or
/// embedding with a restricted target list).
pub struct RendererRegistry {
    renderers: Vec<Box<dyn Renderer>>,
}

impl RendererRegistry {
    /// A registry holding all built-in renderers.
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut renderers: Vec<Box<dyn Renderer>> = Vec::new();
        #[cfg(feature = "target-bash")]
        renderers.push(Box::new(crate::output::bash::BashRenderer));
        #[cfg(feature = "target-python")]
        renderers.push(Box::new(crate::output::python::PythonRenderer));
        #[cfg(feature = "target-node")]
        renderers.push(Box::new(crate::output::node::NodeRenderer));
        Self { renderers }
    }

    /// An empty registry (no built-in renderers).
    pub fn empty() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Register a custom renderer.
    pub fn register(&mut self, renderer: Box<dyn Renderer>) {
        self.renderers.push(renderer);
    }

    /// Resolve a renderer by target key.
    pub fn resolve(&self, target: &str) -> Result<&dyn Renderer, UnsupportedTargetError> {
        self.renderers
            .iter()
            .find(|r| r.target() == target)
            .map(|r| r.as_ref())
            .ok_or_else(|| UnsupportedTargetError {
                target: target.to_string(),
                known: self.targets().iter().map(|t| t.to_string()).collect(),
            })
    }

    /// All target keys in this registry.
    pub fn targets(&self) -> Vec<&'static str> {
        self.renderers.iter().map(|r| r.target()).collect()
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_registry_lists_builtins() {
        let keys = targets();
        #[cfg(feature = "target-bash")]
        assert!(keys.contains(&"bash"));
        #[cfg(feature = "target-python")]
        assert!(keys.contains(&"python"));
        #[cfg(feature = "target-node")]
        assert!(keys.contains(&"node"));
    }

    #[test]
    fn unknown_target_lists_registered_keys() {
        let err = renderer_for_target("cobol").unwrap_err();
        assert_eq!(err.target, "cobol");
        assert_eq!(err.known, targets());
        let msg = err.to_string();
        assert!(msg.contains("cobol"));
        #[cfg(feature = "target-bash")]
        assert!(msg.contains("bash"));
    }

    #[test]
    fn isolated_registry_is_independent() {
        let registry = RendererRegistry::empty();
        assert!(registry.targets().is_empty());
        let err = registry.resolve("bash").unwrap_err();
        assert!(err.known.is_empty());
    }
}
