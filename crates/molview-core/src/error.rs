//! Error types for molview.

use thiserror::Error;

/// The main error type for molview operations.
#[derive(Error, Debug)]
pub enum MolviewError {
    /// No named view with the given name exists.
    #[error("no view named '{0}'")]
    ViewNotFound(String),

    /// No model with the given id exists.
    #[error("model #{0} not found")]
    ModelNotFound(u32),

    /// A model with the given id is already registered.
    #[error("model #{0} already exists")]
    ModelExists(u32),

    /// An object selection was empty.
    #[error("no objects specified")]
    NoObjectsSpecified,

    /// None of the selected objects are displayed.
    #[error("no displayed objects specified")]
    NoDisplayedObjects,

    /// Two model lists that must correspond have different lengths.
    #[error("must specify equal numbers of models to align, got {expected} and {actual}")]
    ModelCountMismatch { expected: usize, actual: usize },

    /// Text that should describe a placement could not be parsed.
    #[error("invalid position: {0}")]
    InvalidPlace(String),

    /// A persisted record was written by an incompatible version.
    #[error("{kind} version {found} is not supported (expected {expected})")]
    VersionMismatch {
        kind: &'static str,
        expected: u32,
        found: u32,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for molview operations.
pub type Result<T> = std::result::Result<T, MolviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            MolviewError::ViewNotFound("front".into()).to_string(),
            "no view named 'front'"
        );
        assert_eq!(
            MolviewError::ModelCountMismatch {
                expected: 2,
                actual: 3
            }
            .to_string(),
            "must specify equal numbers of models to align, got 2 and 3"
        );
        assert_eq!(
            MolviewError::VersionMismatch {
                kind: "named view",
                expected: 1,
                found: 7
            }
            .to_string(),
            "named view version 7 is not supported (expected 1)"
        );
    }
}
