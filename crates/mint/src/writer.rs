//! The Writing stage: commit one target's artifact set to disk.
//!
//! The renderer stages are pure, so by the time this module runs the full
//! artifact set is staged in memory. Writes abort on the first failure —
//! retrying transient conditions is the caller's decision, never ours —
//! and other targets' output directories are untouched either way.

use mint_render::Artifact;
use std::path::{Component, Path, PathBuf};

/// Persistence failure for one target's artifact set.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("refusing artifact path {path:?}: absolute or escaping the output root")]
    UnsafePath { path: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write every artifact under `root`, creating directories as needed.
///
/// Returns the paths written, in artifact order. Artifact paths must be
/// relative and must not traverse out of the root.
pub fn write_artifacts(root: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, WriteError> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let relative = Path::new(&artifact.path);
        if !is_safe_relative(relative) {
            return Err(WriteError::UnsafePath {
                path: artifact.path.clone(),
            });
        }
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WriteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, &artifact.content).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;
        if artifact.executable {
            set_executable(&path)?;
        }
        written.push(path);
    }
    Ok(written)
}

/// Relative, and never reaching above the output root.
fn is_safe_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), WriteError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        WriteError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), WriteError> {
    Ok(())
}
