//! Output service implementations

pub mod filesystem_output;

pub use filesystem_output::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::OutputService;
    use crate::generation::Artifact;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn artifact(path: &str, content: &str) -> Artifact {
        Artifact {
            path: PathBuf::from(path),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_filesystem_output_write_artifacts() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_service = FileSystemOutputService::new(temp_dir.path());

        let artifacts = vec![
            artifact("python/client/sdk/api40/methods.py", "class Api40SDK:\n    pass\n"),
            artifact("python/client/sdk/api40/models.py", "import attr\n"),
        ];

        let summary = output_service
            .write_artifacts(&artifacts)
            .await
            .expect("write succeeds");
        assert_eq!(summary.written.len(), 2);
        assert!(summary.unchanged.is_empty());

        let methods = std::fs::read_to_string(
            temp_dir.path().join("python/client/sdk/api40/methods.py"),
        )
        .expect("Failed to read methods.py");
        assert_eq!(methods, "class Api40SDK:\n    pass\n");
    }

    #[tokio::test]
    async fn test_unchanged_files_are_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_service = FileSystemOutputService::new(temp_dir.path());
        let artifacts = vec![artifact("swift/client/sdk/models.swift", "import Foundation\n")];

        output_service.write_artifacts(&artifacts).await.unwrap();
        let second = output_service.write_artifacts(&artifacts).await.unwrap();
        assert!(second.written.is_empty());
        assert_eq!(second.unchanged.len(), 1);

        let changed = vec![artifact("swift/client/sdk/models.swift", "import Foundation\n\n")];
        let third = output_service.write_artifacts(&changed).await.unwrap();
        assert_eq!(third.written.len(), 1);
    }

    #[tokio::test]
    async fn test_filesystem_output_ensure_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_service = FileSystemOutputService::new(temp_dir.path());

        let result = output_service
            .ensure_directory(std::path::Path::new("deeply/nested/directory"))
            .await;
        assert!(result.is_ok());

        let nested_path = temp_dir.path().join("deeply/nested/directory");
        assert!(nested_path.is_dir());
    }

    #[tokio::test]
    async fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(temp_dir.path().join("blocker"), "x").unwrap();
        let output_service = FileSystemOutputService::new(temp_dir.path());

        let err = output_service
            .write_artifacts(&[artifact("blocker/methods.ts", "")])
            .await
            .unwrap_err();
        assert!(matches!(err, crate::application::ApplicationError::OutputError(_)));
    }
}
