//! Registry for language-specific backends

use std::collections::HashMap;

use crate::generation::{Backend, GenerationError, GeneratorOptions, Language};

use super::{PythonBackend, SwiftBackend, TypeScriptBackend};

/// Constructs a fresh backend for one generation run
pub type BackendFactory = fn(GeneratorOptions) -> Box<dyn Backend>;

fn python(options: GeneratorOptions) -> Box<dyn Backend> {
    Box::new(PythonBackend::new(options))
}

fn typescript(options: GeneratorOptions) -> Box<dyn Backend> {
    Box::new(TypeScriptBackend::new(options))
}

fn swift(options: GeneratorOptions) -> Box<dyn Backend> {
    Box::new(SwiftBackend::new(options))
}

/// Registry that resolves target names to backends
pub struct GeneratorRegistry {
    factories: HashMap<Language, BackendFactory>,
}

impl GeneratorRegistry {
    /// Create a new registry with the default backends
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(Language::Python, python);
        registry.register(Language::TypeScript, typescript);
        registry.register(Language::Swift, swift);
        registry
    }

    /// Register a backend for a language, replacing any existing one
    pub fn register(&mut self, language: Language, factory: BackendFactory) {
        self.factories.insert(language, factory);
    }

    /// Resolve a language name, alias or file extension, ignoring case.
    ///
    /// Names are tried first, then aliases, then extensions with or without
    /// their leading dot.
    pub fn resolve(&self, target: &str) -> Result<Language, GenerationError> {
        let wanted = target.trim().to_lowercase();
        let languages = self.supported_languages();

        let by_name = languages
            .iter()
            .find(|lang| lang.to_string() == wanted || lang.display_name().to_lowercase() == wanted);
        let by_alias = || {
            languages
                .iter()
                .find(|lang| lang.aliases().contains(&wanted.as_str()))
        };
        let by_extension = || {
            let dotted = format!(".{wanted}");
            languages.iter().find(|lang| {
                lang.file_extensions().iter().any(|ext| {
                    let ext = format!(".{ext}");
                    ext == wanted || ext == dotted
                })
            })
        };

        let found = by_name.or_else(by_alias).or_else(by_extension).copied();
        match found {
            Some(language) => {
                tracing::debug!("Resolved target '{}' to {}", target, language);
                Ok(language)
            }
            None => Err(GenerationError::BackendNotFound(target.to_string())),
        }
    }

    /// Construct the backend for a target
    pub fn create(
        &self,
        target: &str,
        options: GeneratorOptions,
    ) -> Result<Box<dyn Backend>, GenerationError> {
        let language = self.resolve(target)?;
        let factory = self
            .factories
            .get(&language)
            .ok_or_else(|| GenerationError::BackendNotFound(target.to_string()))?;
        Ok(factory(options))
    }

    /// Check if a language has a registered backend
    pub fn has_backend(&self, language: Language) -> bool {
        self.factories.contains_key(&language)
    }

    /// Registered languages, in a stable order
    pub fn supported_languages(&self) -> Vec<Language> {
        Language::all()
            .into_iter()
            .filter(|lang| self.has_backend(*lang))
            .collect()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
