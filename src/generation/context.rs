//! Generator options shared by every backend

use serde::{Deserialize, Serialize};

use crate::generation::{GenerationError, rules};

/// Run-level settings a backend is constructed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// API version the SDK targets, e.g. `4.0`
    pub api_version: String,
    /// Version stamped into generated headers
    pub sdk_version: String,
    /// Base of the generated package name, e.g. `Looker`
    pub package_base: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            api_version: "4.0".to_string(),
            sdk_version: "0.1.0".to_string(),
            package_base: "Api".to_string(),
        }
    }
}

impl GeneratorOptions {
    pub fn new(api_version: &str) -> Self {
        Self {
            api_version: api_version.to_string(),
            ..Default::default()
        }
    }

    /// API version without separators, e.g. `40` for `4.0`
    pub fn api_ref(&self) -> String {
        self.api_version.replace('.', "")
    }

    /// Package name, qualified by API version for multi-version backends
    pub fn package_name(&self, multi_api: bool) -> String {
        if multi_api {
            format!("{}{}SDK", self.package_base, self.api_ref())
        } else {
            format!("{}SDK", self.package_base)
        }
    }

    /// Validate the options before any backend is constructed
    pub fn validate(&self) -> Result<(), GenerationError> {
        rules::validate_package_base(&self.package_base)?;
        rules::validate_api_version(&self.api_version)?;
        Ok(())
    }
}
