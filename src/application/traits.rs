//! Port interfaces for the application layer

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ApplicationError;
use crate::generation::Artifact;
use crate::ir::ApiModel;

/// Files touched by one write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl WriteSummary {
    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }
}

/// Service for writing generated artifacts to the output destination
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Write all artifacts to the output destination
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<WriteSummary, ApplicationError>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError>;
}

/// Source of API models
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Load and build the model named by `source`
    async fn load(&self, source: &str) -> Result<ApiModel, ApplicationError>;
}
