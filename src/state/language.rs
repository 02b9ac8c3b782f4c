//! Per-language artifact metadata
//!
//! On disk every language has its own optional table under `[language]` so a
//! document round-trips untouched even when read by a repository configured for
//! another language. In code the meaningful block is a [`LanguageMetadata`]
//! value, chosen by the repository's target language.

use crate::core::config::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSection {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub go: Option<GoMetadata>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub python: Option<PackageMetadata>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rust: Option<PackageMetadata>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dart: Option<PackageMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoMetadata {
  /// Module import path, e.g. `cloud.google.com/go/storage`
  pub module: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
  /// Published package name
  pub package: String,
}

/// The one language block that matters for a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageMetadata {
  Go { module: String },
  Python { package: String },
  Rust { package: String },
  Dart { package: String },
}

impl LanguageMetadata {
  /// Parse `LANG:KEY=VALUE` as accepted by `edit --language`
  pub fn parse(input: &str) -> Result<Self, String> {
    let (lang, assignment) = input
      .split_once(':')
      .ok_or_else(|| "missing ':' between language and key".to_string())?;
    let (key, value) = assignment
      .split_once('=')
      .ok_or_else(|| "missing '=' between key and value".to_string())?;
    let value = value.to_string();

    let language: Language = lang.trim().parse()?;
    match (language, key.trim()) {
      (Language::Go, "module") => Ok(LanguageMetadata::Go { module: value }),
      (Language::Python, "package") => Ok(LanguageMetadata::Python { package: value }),
      (Language::Rust, "package") => Ok(LanguageMetadata::Rust { package: value }),
      (Language::Dart, "package") => Ok(LanguageMetadata::Dart { package: value }),
      (Language::None, _) => Err("language 'none' has no metadata".to_string()),
      (language, key) => Err(format!(
        "unknown key '{}' for {} (expected '{}')",
        key,
        language,
        metadata_key(language)
      )),
    }
  }

  pub fn language(&self) -> Language {
    match self {
      LanguageMetadata::Go { .. } => Language::Go,
      LanguageMetadata::Python { .. } => Language::Python,
      LanguageMetadata::Rust { .. } => Language::Rust,
      LanguageMetadata::Dart { .. } => Language::Dart,
    }
  }

  /// Module path or package name
  pub fn value(&self) -> &str {
    match self {
      LanguageMetadata::Go { module } => module,
      LanguageMetadata::Python { package } | LanguageMetadata::Rust { package } | LanguageMetadata::Dart { package } => {
        package
      }
    }
  }
}

impl fmt::Display for LanguageMetadata {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LanguageMetadata::Go { module } => write!(f, "go:module={}", module),
      LanguageMetadata::Python { package } => write!(f, "python:package={}", package),
      LanguageMetadata::Rust { package } => write!(f, "rust:package={}", package),
      LanguageMetadata::Dart { package } => write!(f, "dart:package={}", package),
    }
  }
}

fn metadata_key(language: Language) -> &'static str {
  match language {
    Language::Go => "module",
    _ => "package",
  }
}

impl LanguageSection {
  pub fn is_empty(&self) -> bool {
    self.go.is_none() && self.python.is_none() && self.rust.is_none() && self.dart.is_none()
  }

  /// The block for `language`, if it has been populated
  pub fn get(&self, language: Language) -> Option<LanguageMetadata> {
    match language {
      Language::Go => self.go.as_ref().map(|m| LanguageMetadata::Go {
        module: m.module.clone(),
      }),
      Language::Python => self.python.as_ref().map(|m| LanguageMetadata::Python {
        package: m.package.clone(),
      }),
      Language::Rust => self.rust.as_ref().map(|m| LanguageMetadata::Rust {
        package: m.package.clone(),
      }),
      Language::Dart => self.dart.as_ref().map(|m| LanguageMetadata::Dart {
        package: m.package.clone(),
      }),
      Language::None => None,
    }
  }

  /// Store `metadata`, refusing a block that belongs to another language
  ///
  /// Blocks for other languages already in the document are left as they are.
  pub fn set(&mut self, repository: Language, metadata: LanguageMetadata) -> Result<(), String> {
    if metadata.language() != repository {
      return Err(format!(
        "repository language is {}, cannot set {} metadata",
        repository,
        metadata.language()
      ));
    }

    match metadata {
      LanguageMetadata::Go { module } => self.go = Some(GoMetadata { module }),
      LanguageMetadata::Python { package } => self.python = Some(PackageMetadata { package }),
      LanguageMetadata::Rust { package } => self.rust = Some(PackageMetadata { package }),
      LanguageMetadata::Dart { package } => self.dart = Some(PackageMetadata { package }),
    }
    Ok(())
  }
}
