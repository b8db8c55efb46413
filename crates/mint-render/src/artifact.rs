//! The artifact model: one emitted file per artifact.

use serde::{Deserialize, Serialize};

/// Category of an emitted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactCategory {
    /// Generated program source.
    Source,
    /// Dependency manifest or build configuration.
    Manifest,
    /// Human-facing documentation.
    Doc,
    /// Auxiliary script (e.g. shell completion).
    Script,
}

/// One emitted file: path, content, and metadata.
///
/// Paths are relative to the generated project's root and always use `/`
/// separators; the writer stage owns the mapping to a real filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub content: String,
    pub executable: bool,
    pub category: ArtifactCategory,
}

impl Artifact {
    pub fn source(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            executable: false,
            category: ArtifactCategory::Source,
        }
    }

    pub fn manifest(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            executable: false,
            category: ArtifactCategory::Manifest,
        }
    }

    pub fn doc(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            executable: false,
            category: ArtifactCategory::Doc,
        }
    }

    pub fn script(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            executable: false,
            category: ArtifactCategory::Script,
        }
    }

    /// Mark the artifact executable (entry points, wrapper scripts).
    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}
