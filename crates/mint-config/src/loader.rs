//! Spec loaders for YAML and JSON documents.

use crate::Spec;
use std::path::Path;

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// Pick a format from a file extension. Anything that isn't `.json`
    /// is treated as YAML (YAML is a JSON superset anyway).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => SpecFormat::Json,
            _ => SpecFormat::Yaml,
        }
    }
}

/// Error loading or parsing a spec document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML spec: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON spec: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a YAML spec document.
pub fn parse_yaml(text: &str) -> Result<Spec, LoadError> {
    Ok(serde_yaml::from_str(text)?)
}

/// Parse a JSON spec document.
pub fn parse_json(text: &str) -> Result<Spec, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Load a spec from disk, picking the format from the file extension.
pub fn load_spec(path: &Path) -> Result<Spec, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    match SpecFormat::from_path(path) {
        SpecFormat::Yaml => parse_yaml(&text),
        SpecFormat::Json => parse_json(&text),
    }
}
