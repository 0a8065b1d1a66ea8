//! Use case for generating SDK sources

use std::collections::HashSet;
use std::sync::Arc;

use crate::application::{
    ApplicationError, GenerateSdkRequest, GenerateSdkResponse, ModelLoader, OutputService,
    TargetOutput, ValidationError,
};
use crate::generation::{Artifact, Language, SdkGenerator};
use crate::infrastructure::generation::GeneratorRegistry;

/// Use case for generating SDK sources for one or more targets
pub struct GenerateSdkUseCase {
    registry: Arc<GeneratorRegistry>,
    model_loader: Arc<dyn ModelLoader>,
    output_service: Arc<dyn OutputService>,
}

impl GenerateSdkUseCase {
    pub fn new(
        registry: Arc<GeneratorRegistry>,
        model_loader: Arc<dyn ModelLoader>,
        output_service: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            registry,
            model_loader,
            output_service,
        }
    }

    pub async fn execute(
        &self,
        request: GenerateSdkRequest,
    ) -> Result<GenerateSdkResponse, ApplicationError> {
        // 1. Validate request
        request.validate()?;

        // 2. Resolve every target before touching the filesystem
        let languages = self.resolve_targets(&request.targets)?;

        // 3. Load the model
        let model = self.model_loader.load(&request.model_path).await?;
        if model.version() != request.options.api_version {
            tracing::warn!(
                "Model version {} differs from requested API version {}",
                model.version(),
                request.options.api_version
            );
        }

        // 4. Generate each target with its own backend and session
        let mut artifacts: Vec<Artifact> = Vec::new();
        let mut targets = Vec::new();
        for (target, language) in request.targets.iter().zip(languages) {
            let backend = self.registry.create(target, request.options.clone())?;
            let mut generator = SdkGenerator::new(backend, &model);
            let generated = generator.generate()?;
            tracing::info!("Generated {} files for {}", generated.len(), language);

            let files = generated
                .into_iter()
                .map(|mut artifact| {
                    artifact.path = request.output_dir.join(&artifact.path);
                    artifact
                })
                .collect::<Vec<_>>();
            targets.push(TargetOutput {
                language,
                files: files.iter().map(|a| a.path.clone()).collect(),
            });
            artifacts.extend(files);
        }

        // 5. Write everything
        self.output_service
            .ensure_directory(&request.output_dir)
            .await?;
        let summary = self.output_service.write_artifacts(&artifacts).await?;

        Ok(GenerateSdkResponse {
            targets,
            written: summary.written.len(),
            unchanged: summary.unchanged.len(),
            output_path: request.output_dir,
        })
    }

    fn resolve_targets(&self, targets: &[String]) -> Result<Vec<Language>, ApplicationError> {
        let mut seen = HashSet::new();
        let mut languages = Vec::with_capacity(targets.len());
        for target in targets {
            let language = self.registry.resolve(target)?;
            if !seen.insert(language) {
                return Err(ValidationError::DuplicateTarget(target.clone()).into());
            }
            languages.push(language);
        }
        Ok(languages)
    }
}
