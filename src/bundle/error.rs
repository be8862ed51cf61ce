//! Error types for bundle loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a project bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The bundle file could not be read.
    #[error("failed to read bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid JSON for the bundle shape.
    #[error("failed to parse bundle: {0}")]
    Json(#[source] serde_json::Error),

    /// The content parsed but violates a model invariant.
    #[error("invalid bundle: {reason}")]
    Invalid { reason: String },
}

impl BundleError {
    /// Create an IO error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = BundleError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("/tmp/missing.json"));
        assert!(err.to_string().contains("failed to read bundle"));
    }

    #[test]
    fn test_invalid_display() {
        let err = BundleError::invalid("project name must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid bundle: project name must not be empty"
        );
    }
}
