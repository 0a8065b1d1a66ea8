//! Core types for the generation domain

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    TypeScript,
    Swift,
}

impl Language {
    /// Get the display name for this language
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::TypeScript => "TypeScript",
            Language::Swift => "Swift",
        }
    }

    /// Other names the language is known by
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "python3"],
            Language::TypeScript => &["ts", "javascript", "js", "node"],
            Language::Swift => &["ios", "apple"],
        }
    }

    /// File extensions, without the leading dot
    pub fn file_extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Swift => &["swift"],
        }
    }

    /// Get all supported languages
    pub fn all() -> Vec<Language> {
        vec![Language::Python, Language::TypeScript, Language::Swift]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::TypeScript => write!(f, "typescript"),
            Language::Swift => write!(f, "swift"),
        }
    }
}

impl FromStr for Language {
    type Err = crate::generation::GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Language::all()
            .into_iter()
            .find(|lang| lang.to_string() == wanted || lang.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| crate::generation::GenerationError::BackendNotFound(s.to_string()))
    }
}

/// Generated artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::from_str("python").unwrap(), Language::Python);
        assert_eq!(Language::from_str("PYTHON").unwrap(), Language::Python);
        assert_eq!(Language::from_str("ts").unwrap(), Language::TypeScript);
        assert_eq!(Language::from_str("Swift").unwrap(), Language::Swift);
        assert!(Language::from_str("cobol").is_err());
    }

    #[test]
    fn test_language_properties() {
        assert_eq!(Language::Python.display_name(), "Python");
        assert_eq!(Language::TypeScript.file_extensions(), &["ts", "tsx"]);
        assert_eq!(Language::all().len(), 3);
        assert_eq!(Language::Swift.to_string(), "swift");
    }
}
