//! Generate-and-write through the use case with real file services

use std::path::PathBuf;
use std::sync::Arc;

use sdkgen::application::{ApplicationError, GenerateSdkRequest, GenerateSdkUseCase};
use sdkgen::generation::GeneratorOptions;
use sdkgen::infrastructure::{FileModelLoader, FileSystemOutputService, GeneratorRegistry};
use tempfile::TempDir;

fn fixture_path() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/query_api.yaml")
        .to_string_lossy()
        .into_owned()
}

fn use_case(root: &std::path::Path) -> GenerateSdkUseCase {
    GenerateSdkUseCase::new(
        Arc::new(GeneratorRegistry::new()),
        Arc::new(FileModelLoader::new()),
        Arc::new(FileSystemOutputService::new(root)),
    )
}

fn request(targets: &[&str]) -> GenerateSdkRequest {
    GenerateSdkRequest {
        model_path: fixture_path(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
        options: GeneratorOptions {
            package_base: "Looker".to_string(),
            ..GeneratorOptions::new("4.0")
        },
        output_dir: PathBuf::from("out"),
    }
}

#[tokio::test]
async fn test_writes_sdk_files_for_each_target() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let response = use_case(temp_dir.path())
        .execute(request(&["python", "swift"]))
        .await
        .expect("generation succeeds");

    assert_eq!(response.written, 5);
    assert_eq!(response.unchanged, 0);

    let methods = std::fs::read_to_string(
        temp_dir.path().join("out/python/client/sdk/api40/methods.py"),
    )
    .expect("methods.py written");
    assert!(methods.contains("class Looker40SDK(api_methods.APIMethods):"));

    let swift = temp_dir.path().join("out/swift/client/sdk/models.swift");
    assert!(swift.is_file());
}

#[tokio::test]
async fn test_regeneration_leaves_files_unchanged() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let use_case = use_case(temp_dir.path());

    use_case.execute(request(&["ts"])).await.unwrap();
    let again = use_case.execute(request(&["ts"])).await.unwrap();
    assert_eq!(again.written, 0);
    assert_eq!(again.unchanged, 3);
}

#[tokio::test]
async fn test_unknown_target_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = use_case(temp_dir.path())
        .execute(request(&["swift", "kotlin"]))
        .await;

    assert!(matches!(result, Err(ApplicationError::GenerationError(_))));
    assert!(!temp_dir.path().join("out").exists());
}
