//! Error types for the generation domain

use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Unmappable type {id}: {reason}")]
    UnmappableType { id: String, reason: String },

    #[error("No backend found for target: {0}")]
    BackendNotFound(String),

    #[error("Recursive type {0} cannot be declared with value semantics")]
    RecursiveValueType(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Model error: {0}")]
    Model(#[from] crate::ir::ModelError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GenerationError {
    pub fn unmappable<S: Into<String>>(id: impl std::fmt::Display, reason: S) -> Self {
        GenerationError::UnmappableType {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ModelError, TypeId};

    #[test]
    fn test_error_messages() {
        let err = GenerationError::unmappable(TypeId(42), "dangling handle");
        assert_eq!(err.to_string(), "Unmappable type #42: dangling handle");

        let err = GenerationError::BackendNotFound("cobol".into());
        assert_eq!(err.to_string(), "No backend found for target: cobol");

        let err: GenerationError = ModelError::DuplicateMethod("me".into()).into();
        assert!(matches!(err, GenerationError::Model(_)));
    }
}
