//! Generation orchestration - turns a model into SDK files for one backend

use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

use crate::generation::mapper::{MappedType, Usage};
use crate::generation::{Artifact, Backend, BackendExt, GenerationSession, Result};
use crate::ir::{ApiModel, Method, TypeId};

/// Kind of emitted file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Methods,
    Streams,
    Models,
}

impl UnitKind {
    pub fn base_name(&self) -> &'static str {
        match self {
            UnitKind::Methods => "methods",
            UnitKind::Streams => "streams",
            UnitKind::Models => "models",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

/// Text of one emitted file, before it is joined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionUnit {
    pub kind: UnitKind,
    pub header: String,
    pub prologue: String,
    pub body: String,
    pub epilogue: String,
}

impl EmissionUnit {
    pub fn render(&self) -> String {
        let parts: Vec<&str> = [&self.header, &self.prologue, &self.body, &self.epilogue]
            .into_iter()
            .map(String::as_str)
            .filter(|part| !part.is_empty())
            .collect();
        let mut text = parts.join("\n");
        text.push('\n');
        text
    }
}

/// Runs one backend over one model.
///
/// Owns the backend and a fresh session; generating again resets the session
/// first, so repeated runs produce identical text.
pub struct SdkGenerator<'m> {
    backend: Box<dyn Backend>,
    session: GenerationSession<'m>,
}

impl<'m> SdkGenerator<'m> {
    pub fn new(backend: Box<dyn Backend>, model: &'m ApiModel) -> Self {
        Self {
            backend,
            session: GenerationSession::new(model),
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn session(&self) -> &GenerationSession<'m> {
        &self.session
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn map_type(&mut self, id: TypeId, usage: Usage) -> Result<MappedType> {
        self.backend.map_type(&mut self.session, id, usage)
    }

    pub fn declare_method(&mut self, indent: &str, method: &Method) -> Result<String> {
        self.backend.declare_method(&mut self.session, indent, method)
    }

    pub fn declare_streamer(&mut self, indent: &str, method: &Method) -> Result<String> {
        self.backend.declare_streamer(&mut self.session, indent, method)
    }

    pub fn declare_type(&mut self, indent: &str, id: TypeId) -> Result<String> {
        self.backend.declare_type(&mut self.session, indent, id)
    }

    pub fn make_the_call(&mut self, method: &Method, inputs: &Map<String, Value>) -> Result<String> {
        self.backend.make_the_call(&mut self.session, method, inputs)
    }

    fn header(&self, tally: &str) -> String {
        let backend = self.backend.as_ref();
        format!(
            "{}\n{}",
            backend.comment("", tally),
            backend.comment("", &backend.warn_editing())
        )
    }

    /// Every method, declared in model order
    pub fn methods(&mut self) -> Result<EmissionUnit> {
        let model = self.session.model();
        let indent = self.backend.syntax().indent_str;
        let mut items = Vec::new();
        for method in model.methods() {
            let item = self.declare_method(indent, method)?;
            if !item.is_empty() {
                items.push(item);
            }
        }
        let body = items.join("\n\n");
        // prologues list live types, so they come after the body
        let prologue = self.backend.methods_prologue(&self.session, indent);
        tracing::debug!("Declared {} methods", items.len());
        Ok(EmissionUnit {
            kind: UnitKind::Methods,
            header: self.header(&format!("{} API methods", items.len())),
            prologue,
            body,
            epilogue: self.backend.methods_epilogue(indent),
        })
    }

    /// Streaming variants, for backends that stream
    pub fn streams(&mut self) -> Result<Option<EmissionUnit>> {
        if !self.backend.capabilities().streams {
            return Ok(None);
        }
        let model = self.session.model();
        let indent = self.backend.syntax().indent_str;
        let mut items = Vec::new();
        for method in model.methods() {
            let item = self.declare_streamer(indent, method)?;
            if !item.is_empty() {
                items.push(item);
            }
        }
        let body = items.join("\n\n");
        let prologue = self.backend.streams_prologue(&self.session, indent);
        Ok(Some(EmissionUnit {
            kind: UnitKind::Streams,
            header: self.header(&format!("{} API streaming methods", items.len())),
            prologue,
            body,
            epilogue: self.backend.streams_epilogue(indent),
        }))
    }

    /// Declared types, then the synthesized types that are live
    pub fn models(&mut self) -> Result<EmissionUnit> {
        let model = self.session.model();
        let mut items = Vec::new();
        let mut declared = 0;
        for (id, _) in model.named_types() {
            let item = self.declare_type("", id)?;
            if !item.is_empty() {
                declared += 1;
                items.push(item);
            }
        }
        let live = self.session.live_derived_types();
        let (requests, writes) = self.session.derived_tally();
        for (id, _) in self.session.derived_types().collect::<Vec<_>>() {
            if !live.contains(&id) {
                tracing::debug!("Skipping unused {}", self.session.type_name(id));
            }
        }
        for id in live {
            let item = self.declare_type("", id)?;
            if !item.is_empty() {
                items.push(item);
            }
        }
        let body = items.join("\n\n");
        let prologue = self.backend.models_prologue(&self.session, "");
        Ok(EmissionUnit {
            kind: UnitKind::Models,
            header: self.header(&format!(
                "{} API models: {declared} Spec, {requests} Request, {writes} Write",
                items.len()
            )),
            prologue,
            body,
            epilogue: self.backend.models_epilogue(&self.session, ""),
        })
    }

    /// All units of a fresh run, as artifacts
    pub fn generate(&mut self) -> Result<Vec<Artifact>> {
        self.reset();
        let mut units = vec![self.methods()?];
        if let Some(streams) = self.streams()? {
            units.push(streams);
        }
        units.push(self.models()?);

        let artifacts: Vec<Artifact> = units
            .iter()
            .map(|unit| Artifact {
                path: PathBuf::from(self.backend.sdk_file_name(unit.kind.base_name())),
                content: unit.render(),
            })
            .collect();
        for artifact in &artifacts {
            tracing::info!(
                "Generated {} for {}",
                artifact.path.display(),
                self.backend.language()
            );
        }
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GeneratorOptions;
    use crate::infrastructure::generation::fixtures::query_model;
    use crate::infrastructure::generation::{PythonBackend, TypeScriptBackend};

    #[test]
    fn test_render_skips_empty_parts() {
        let unit = EmissionUnit {
            kind: UnitKind::Methods,
            header: "# 0 API methods".to_string(),
            prologue: String::new(),
            body: String::new(),
            epilogue: "}".to_string(),
        };
        assert_eq!(unit.render(), "# 0 API methods\n}\n");
    }

    #[test]
    fn test_models_tally_counts_live_derived_types() {
        let model = query_model();

        let backend = Box::new(PythonBackend::new(GeneratorOptions::default()));
        let mut generator = SdkGenerator::new(backend, &model);
        let artifacts = generator.generate().unwrap();
        assert!(artifacts[0].content.starts_with("# 5 API methods\n"));
        assert!(artifacts[1].content.starts_with("# 7 API models: 6 Spec, 0 Request, 1 Write\n"));

        let backend = Box::new(TypeScriptBackend::new(GeneratorOptions::default()));
        let mut generator = SdkGenerator::new(backend, &model);
        let models = generator.generate().unwrap().pop().unwrap();
        assert!(models.content.starts_with("// 8 API models: 6 Spec, 1 Request, 1 Write\n"));
    }

    #[test]
    fn test_reset_discards_derived_types() {
        let model = query_model();
        let backend = Box::new(TypeScriptBackend::new(GeneratorOptions::default()));
        let mut generator = SdkGenerator::new(backend, &model);

        generator.methods().unwrap();
        assert!(generator.session().derived_types().count() > 0);
        generator.reset();
        assert_eq!(generator.session().derived_types().count(), 0);
        assert_eq!(generator.session().counted().count(), 0);
    }

    #[test]
    fn test_models_skip_uncounted_derived_types() {
        let model = query_model();
        let backend = Box::new(PythonBackend::new(GeneratorOptions::default()));
        let mut generator = SdkGenerator::new(backend, &model);
        let search = model.method("search_queries").unwrap();

        let request = generator.session.request_type_of(search).unwrap();
        let models = generator.models().unwrap();
        assert!(models.header.contains(" 0 Request"));
        assert!(!models.body.contains("RequestSearchQueries"));

        generator.map_type(request, Usage::Method).unwrap();
        let models = generator.models().unwrap();
        assert!(models.header.contains(" 1 Request"));
        assert!(models.body.contains("RequestSearchQueries"));
    }
}
