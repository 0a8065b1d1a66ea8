//! Business rules for generator options

use crate::generation::GenerationError;

/// Package base names become identifiers in every target language
pub fn validate_package_base(name: &str) -> Result<(), GenerationError> {
    if name.is_empty() {
        return Err(GenerationError::InvalidOption(
            "Package base cannot be empty".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(GenerationError::InvalidOption(format!(
            "Package base must be alphanumeric: {name}"
        )));
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(GenerationError::InvalidOption(format!(
            "Package base cannot start with a digit: {name}"
        )));
    }

    Ok(())
}

/// API versions are dot-separated digit groups, e.g. `4.0` or `3`
pub fn validate_api_version(version: &str) -> Result<(), GenerationError> {
    let valid = !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(GenerationError::InvalidOption(format!(
            "API version must look like 4.0: {version}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_package_base() {
        assert!(validate_package_base("Looker").is_ok());
        assert!(validate_package_base("Api2").is_ok());
        assert!(validate_package_base("").is_err());
        assert!(validate_package_base("my-sdk").is_err());
        assert!(validate_package_base("4Api").is_err());
    }

    #[test]
    fn test_validate_api_version() {
        assert!(validate_api_version("4.0").is_ok());
        assert!(validate_api_version("3").is_ok());
        assert!(validate_api_version("3.1.2").is_ok());
        assert!(validate_api_version("").is_err());
        assert!(validate_api_version("4.").is_err());
        assert!(validate_api_version("v4").is_err());
    }
}
