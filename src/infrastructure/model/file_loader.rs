//! File-based model document loader
//!
//! Reads a model document from disk and builds the API model from it.

use async_trait::async_trait;
use tokio::fs;

use crate::application::{ApplicationError, ModelLoader};
use crate::ir::{ApiModel, ModelDocument};

/// Loads model documents from local files
pub struct FileModelLoader;

impl FileModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse document text, choosing the format from the source name
    pub fn parse(source: &str, content: &str) -> Result<ModelDocument, ApplicationError> {
        if source.ends_with(".json") {
            ModelDocument::from_json(content)
                .map_err(|e| ApplicationError::LoadError(format!("{source}: {e}")))
        } else if source.ends_with(".yaml") || source.ends_with(".yml") {
            ModelDocument::from_yaml(content)
                .map_err(|e| ApplicationError::LoadError(format!("{source}: {e}")))
        } else {
            // Try JSON first, then YAML
            ModelDocument::from_json(content)
                .or_else(|_| ModelDocument::from_yaml(content))
                .map_err(|e| {
                    ApplicationError::LoadError(format!("Failed to parse model {source}: {e}"))
                })
        }
    }
}

#[async_trait]
impl ModelLoader for FileModelLoader {
    async fn load(&self, source: &str) -> Result<ApiModel, ApplicationError> {
        let content = fs::read_to_string(source)
            .await
            .map_err(|e| ApplicationError::LoadError(format!("{source}: {e}")))?;

        let model = Self::parse(source, &content)?.into_model()?;
        tracing::debug!(
            "Loaded {} named types and {} methods from {}",
            model.named_types().count(),
            model.methods().count(),
            source
        );
        Ok(model)
    }
}

impl Default for FileModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
