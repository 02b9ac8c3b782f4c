//! Per-artifact state document model
//!
//! # Example `.librarian.toml`
//!
//! ```toml
//! [generate]
//! librarian = "0.1.0"
//!
//! [generate.container]
//! image = "us-docker.pkg.dev/example/librarian-go"
//! tag = "latest"
//!
//! [generate.googleapis]
//! repo = "googleapis/googleapis"
//! ref = "9fcfbea0aa5b50fa22e190faceb073d74504172b"
//!
//! [[generate.apis]]
//! path = "google/cloud/secretmanager/v1"
//! transport = "grpc+rest"
//! service_config = "secretmanager_v1.yaml"
//!
//! [release]
//! version = "v1.2.0"
//!
//! [[release.history]]
//! tag = "v1.2.0"
//! commit = "4be0c1d2..."
//!
//! [language.go]
//! module = "cloud.google.com/go/secretmanager"
//! ```

use crate::core::config::{ContainerImage, SourceRef};
use crate::state::language::LanguageSection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Version sentinel for artifacts that have never shipped
pub const UNRELEASED: &str = "unreleased";

/// One managed library, keyed by its directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  /// Absent for handwritten, release-only artifacts
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub generate: Option<GenerateState>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub release: Option<ReleaseState>,

  #[serde(rename = "config", default, skip_serializing_if = "Option::is_none")]
  pub files: Option<FileConfig>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language: Option<LanguageSection>,
}

/// What the artifact was last generated from
///
/// Everything but `apis` mirrors the repository config at the last sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateState {
  #[serde(rename = "librarian", default, skip_serializing_if = "String::is_empty")]
  pub toolchain_version: String,

  /// Generated code location, fixed when the artifact is added
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub output: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub container: Option<ContainerImage>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub googleapis: Option<SourceRef>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discovery: Option<SourceRef>,

  /// Generation order; preserved exactly
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub apis: Vec<ApiConfig>,
}

/// Generator parameters for one API path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
  pub path: String,

  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub transport: String,

  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub service_config: String,

  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub grpc_service_config: String,

  #[serde(default, skip_serializing_if = "is_false")]
  pub numeric_enums: bool,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub options: Vec<String>,
}

fn is_false(value: &bool) -> bool {
  !*value
}

impl ApiConfig {
  /// An API entry with nothing but its path
  pub fn bare(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseState {
  /// Last tagged version, or [`UNRELEASED`]
  #[serde(default = "unreleased")]
  pub version: String,

  /// Mirror of `release.tag_format` from the repository config
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tag_format: Option<String>,

  /// Set by prepare, cleared by tag
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pending: Option<PendingRelease>,

  /// Append-only, oldest first
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub history: Vec<HistoryEntry>,
}

fn unreleased() -> String {
  UNRELEASED.to_string()
}

impl Default for ReleaseState {
  fn default() -> Self {
    Self {
      version: unreleased(),
      tag_format: None,
      pending: None,
      history: Vec::new(),
    }
  }
}

impl ReleaseState {
  pub fn is_unreleased(&self) -> bool {
    self.version == UNRELEASED
  }

  pub fn last_tag(&self) -> Option<&str> {
    self.history.last().map(|h| h.tag.as_str())
  }

  pub fn has_released(&self, tag: &str) -> bool {
    self.history.iter().any(|h| h.tag == tag)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRelease {
  pub version: String,
  pub tag: String,
  pub commit: String,
  pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub tag: String,
  pub commit: String,

  /// RFC 3339 time the tag was created
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,
}

/// File handling rules for regeneration and release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
  /// Kept across regeneration
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub keep: BTreeSet<String>,

  /// Deleted after regeneration
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub remove: BTreeSet<String>,

  /// Changes here never trigger a release
  #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
  pub exclude: BTreeSet<String>,
}

impl FileConfig {
  pub fn is_empty(&self) -> bool {
    self.keep.is_empty() && self.remove.is_empty() && self.exclude.is_empty()
  }
}

/// Where an artifact sits in the prepare -> tag cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleasePhase {
  /// No `[release]` section
  NotConfigured,
  Unreleased,
  Pending,
  Released,
}

impl Artifact {
  /// Handwritten artifacts have no generation state
  pub fn is_generated(&self) -> bool {
    self.generate.is_some()
  }

  pub fn release_phase(&self) -> ReleasePhase {
    match &self.release {
      None => ReleasePhase::NotConfigured,
      Some(r) if r.pending.is_some() => ReleasePhase::Pending,
      Some(r) if r.is_unreleased() && r.history.is_empty() => ReleasePhase::Unreleased,
      Some(_) => ReleasePhase::Released,
    }
  }

  /// Drop optional sections that carry no data
  ///
  /// The store saves the normalized form, so an empty `[config]` or
  /// `[language]` table never reaches disk and loads back as absent.
  pub fn normalized(mut self) -> Self {
    if self.files.as_ref().is_some_and(FileConfig::is_empty) {
      self.files = None;
    }
    if self.language.as_ref().is_some_and(LanguageSection::is_empty) {
      self.language = None;
    }
    if let Some(generate) = self.generate.as_mut() {
      if generate.container.as_ref().is_some_and(|c| c.image.is_empty() && c.tag.is_empty()) {
        generate.container = None;
      }
      for source in [&mut generate.googleapis, &mut generate.discovery] {
        if source.as_ref().is_some_and(|s| s.repo.is_empty() && s.reference.is_empty()) {
          *source = None;
        }
      }
    }
    self
  }
}
