//! TOML configuration for SDK generation
//!
//! ```toml
//! targets = ["python", "typescript"]
//!
//! [sdk]
//! package_base = "Looker"
//! api_version = "4.0"
//!
//! [output]
//! dir = "sdk-out"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::application::ApplicationError;
use crate::generation::GeneratorOptions;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "sdkgen.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkgenConfig {
    pub targets: Vec<String>,
    pub sdk: SdkSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSection {
    pub package_base: Option<String>,
    pub api_version: Option<String>,
    pub sdk_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
}

impl SdkgenConfig {
    pub fn from_toml(content: &str) -> Result<Self, ApplicationError> {
        toml::from_str(content)
            .map_err(|e| ApplicationError::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Read a config file
    pub async fn load(path: &Path) -> Result<Self, ApplicationError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ApplicationError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    /// Read `path` when given, else the default file when it exists
    pub async fn discover(path: Option<&Path>) -> Result<Self, ApplicationError> {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if tokio::fs::try_exists(default).await.unwrap_or(false) {
                    Self::load(default).await
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Generator options with unset values left at their defaults
    pub fn generator_options(&self) -> GeneratorOptions {
        let defaults = GeneratorOptions::default();
        GeneratorOptions {
            api_version: self.sdk.api_version.clone().unwrap_or(defaults.api_version),
            sdk_version: self.sdk.sdk_version.clone().unwrap_or(defaults.sdk_version),
            package_base: self.sdk.package_base.clone().unwrap_or(defaults.package_base),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
