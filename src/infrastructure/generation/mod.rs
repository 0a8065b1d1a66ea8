//! Generation infrastructure implementations

pub mod python;
pub mod registry;
pub mod swift;
pub mod typescript;

pub use python::PythonBackend;
pub use registry::{BackendFactory, GeneratorRegistry};
pub use swift::SwiftBackend;
pub use typescript::TypeScriptBackend;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::ir::{ApiModel, ModelDocument};

    /// Model shared by the backend tests
    pub fn query_model() -> ApiModel {
        ModelDocument::from_yaml(include_str!("../../../tests/fixtures/query_api.yaml"))
            .expect("fixture parses")
            .into_model()
            .expect("fixture builds")
    }

    /// Dashed parameter names and a declared default
    pub fn traced_model() -> ApiModel {
        ModelDocument::from_yaml(include_str!("../../../tests/fixtures/traced_api.yaml"))
            .expect("fixture parses")
            .into_model()
            .expect("fixture builds")
    }
}
