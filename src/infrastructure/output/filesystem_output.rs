//! Filesystem-based output service implementation

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::{ApplicationError, OutputService, WriteSummary};
use crate::generation::Artifact;

/// Output service that writes SDK files under a root directory
pub struct FileSystemOutputService {
    root: PathBuf,
}

impl FileSystemOutputService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target_path(&self, artifact: &Artifact) -> PathBuf {
        if artifact.path.is_absolute() {
            artifact.path.clone()
        } else {
            self.root.join(&artifact.path)
        }
    }
}

fn output_error(action: &str, path: &Path, err: std::io::Error) -> ApplicationError {
    ApplicationError::OutputError(format!("Failed to {action} {}: {err}", path.display()))
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<WriteSummary, ApplicationError> {
        let mut summary = WriteSummary::default();

        for artifact in artifacts {
            let path = self.target_path(artifact);

            // Regenerating an unchanged SDK leaves file timestamps alone
            if let Ok(existing) = fs::read_to_string(&path).await {
                if existing == artifact.content {
                    tracing::debug!("Unchanged {}", path.display());
                    summary.unchanged.push(path);
                    continue;
                }
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| output_error("create directory", parent, e))?;
            }

            let mut file = fs::File::create(&path)
                .await
                .map_err(|e| output_error("create file", &path, e))?;
            file.write_all(artifact.content.as_bytes())
                .await
                .map_err(|e| output_error("write file", &path, e))?;
            file.flush()
                .await
                .map_err(|e| output_error("flush file", &path, e))?;

            tracing::info!("Wrote {}", path.display());
            summary.written.push(path);
        }

        Ok(summary)
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), ApplicationError> {
        let path = self.root.join(path);
        fs::create_dir_all(&path)
            .await
            .map_err(|e| output_error("create directory", &path, e))
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new(".")
    }
}
