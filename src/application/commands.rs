//! Request and response types for the application layer

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::application::ValidationError;
use crate::generation::{GeneratorOptions, Language};

/// Request to generate SDK sources for one or more targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSdkRequest {
    pub model_path: String,
    pub targets: Vec<String>,
    pub options: GeneratorOptions,
    pub output_dir: PathBuf,
}

impl GenerateSdkRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model_path.trim().is_empty() {
            return Err(ValidationError::MissingField("model path".to_string()));
        }
        if self.targets.is_empty() {
            return Err(ValidationError::NoTargets);
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.trim().to_lowercase()) {
                return Err(ValidationError::DuplicateTarget(target.clone()));
            }
        }

        self.options
            .validate()
            .map_err(|e| ValidationError::InvalidConfiguration(e.to_string()))
    }
}

/// What was generated for one target
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutput {
    pub language: Language,
    pub files: Vec<PathBuf>,
}

/// Response from SDK generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSdkResponse {
    pub targets: Vec<TargetOutput>,
    pub written: usize,
    pub unchanged: usize,
    pub output_path: PathBuf,
}

impl GenerateSdkResponse {
    pub fn artifacts_count(&self) -> usize {
        self.targets.iter().map(|t| t.files.len()).sum()
    }
}
