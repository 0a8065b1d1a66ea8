//! Application layer - orchestrates use cases and coordinates between domains

pub mod commands;
pub mod config;
pub mod errors;
pub mod generate_sdk;
pub mod traits;

pub use commands::*;
pub use config::*;
pub use errors::*;
pub use generate_sdk::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationError;

    #[test]
    fn test_application_error_conversions() {
        let err: ApplicationError = GenerationError::BackendNotFound("cobol".into()).into();
        assert_eq!(
            err.to_string(),
            "Generation error: No backend found for target: cobol"
        );

        let err: ApplicationError = ValidationError::NoTargets.into();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err: ApplicationError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ApplicationError::IoError(_)));
    }
}
