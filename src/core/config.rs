use crate::core::error::{ConfigError, LibrarianError, LibrarianResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory holding the repository-level configuration
pub const CONFIG_DIR: &str = ".librarian";

/// Repository configuration file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Default tag template: `{name}` is the artifact path, `{version}` the released version
pub const DEFAULT_TAG_FORMAT: &str = "{name}/{version}";

/// Language the repository generates client libraries for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  Go,
  Python,
  Rust,
  Dart,
  /// Release-only repository (nothing is generated)
  #[default]
  None,
}

impl Language {
  pub const ALL: [Language; 5] = [
    Language::Go,
    Language::Python,
    Language::Rust,
    Language::Dart,
    Language::None,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Language::Go => "go",
      Language::Python => "python",
      Language::Rust => "rust",
      Language::Dart => "dart",
      Language::None => "none",
    }
  }

  /// Whether repositories in this language generate code at all
  pub fn generates(self) -> bool {
    self != Language::None
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Language {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Language::ALL
      .into_iter()
      .find(|l| l.as_str() == s)
      .ok_or_else(|| {
        format!(
          "unknown language '{}' (expected one of: {})",
          s,
          Language::ALL.map(Language::as_str).join(", ")
        )
      })
  }
}

/// Repository configuration (`.librarian/config.toml`)
///
/// # Example
///
/// ```toml
/// [librarian]
/// version = "0.1.0"
/// language = "go"
///
/// [generate.container]
/// image = "us-docker.pkg.dev/example/librarian-go"
/// tag = "latest"
///
/// [generate.googleapis]
/// repo = "googleapis/googleapis"
/// ref = "9fcfbea0aa5b50fa22e190faceb073d74504172b"
///
/// [release]
/// tag_format = "{name}/{version}"
///
/// [[release.branches]]
/// pattern = "preview/*"
/// prerelease = "rc"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
  pub librarian: ToolConfig,

  /// Absent for release-only repositories
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub generate: Option<GenerateConfig>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub release: Option<ReleaseConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
  /// Version of librarian that manages this repository
  #[serde(default)]
  pub version: String,

  #[serde(default)]
  pub language: Language,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
  /// Where generated code lands, relative to each artifact
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output_dir: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub container: Option<ContainerImage>,

  /// API definitions (protos and BUILD.bazel rules)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub googleapis: Option<SourceRef>,

  /// Discovery documents
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discovery: Option<SourceRef>,
}

/// Toolchain container used for regeneration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerImage {
  #[serde(default)]
  pub image: String,
  #[serde(default)]
  pub tag: String,
}

/// An external source repository pinned to a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
  /// `owner/name` on GitHub, or a local path / URL understood by git
  #[serde(default)]
  pub repo: String,
  #[serde(rename = "ref", default)]
  pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfig {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tag_format: Option<String>,

  /// Remote that release tags are meant for (informational)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub remote: Option<String>,

  /// Ordered branch glob -> prerelease label rules; first match wins
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub branches: Vec<BranchPrerelease>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPrerelease {
  pub pattern: String,
  pub prerelease: String,
}

impl RepositoryConfig {
  /// Fresh configuration as written by `init`
  pub fn new(language: Language) -> Self {
    let generate = language.generates().then(|| GenerateConfig {
      googleapis: Some(SourceRef {
        repo: "googleapis/googleapis".to_string(),
        reference: String::new(),
      }),
      ..Default::default()
    });

    Self {
      librarian: ToolConfig {
        version: env!("CARGO_PKG_VERSION").to_string(),
        language,
      },
      generate,
      release: Some(ReleaseConfig {
        tag_format: Some(DEFAULT_TAG_FORMAT.to_string()),
        ..Default::default()
      }),
    }
  }

  pub fn language(&self) -> Language {
    self.librarian.language
  }

  pub fn tag_format(&self) -> Option<&str> {
    self.release.as_ref().and_then(|r| r.tag_format.as_deref())
  }

  pub fn branch_rules(&self) -> &[BranchPrerelease] {
    self.release.as_ref().map(|r| r.branches.as_slice()).unwrap_or(&[])
  }

  /// Check RepositoryConfig invariants
  pub fn validate(&self) -> LibrarianResult<()> {
    if !self.librarian.language.generates() && self.generate.is_some() {
      return Err(LibrarianError::Config(ConfigError::Invalid {
        reason: "language 'none' is release-only and must not have a [generate] section".to_string(),
      }));
    }

    if !self.librarian.version.is_empty() && semver::Version::parse(&self.librarian.version).is_err() {
      return Err(LibrarianError::Config(ConfigError::Invalid {
        reason: format!(
          "librarian.version '{}' must be valid semver (e.g., '0.1.0')",
          self.librarian.version
        ),
      }));
    }

    for rule in self.branch_rules() {
      if glob::Pattern::new(&rule.pattern).is_err() {
        return Err(LibrarianError::Config(ConfigError::Invalid {
          reason: format!("release branch pattern '{}' is not a valid glob", rule.pattern),
        }));
      }
    }

    Ok(())
  }
}

/// Loads and saves the repository configuration document
#[derive(Debug, Clone)]
pub struct ConfigStore {
  root: PathBuf,
}

impl ConfigStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Path of the configuration document
  pub fn path(&self) -> PathBuf {
    self.root.join(CONFIG_DIR).join(CONFIG_FILE)
  }

  /// Check if the repository has been initialized
  pub fn exists(&self) -> bool {
    self.path().is_file()
  }

  /// Load the configuration; never-initialized and malformed are distinct errors
  pub fn load(&self) -> LibrarianResult<RepositoryConfig> {
    let config_path = self.path();
    if !config_path.is_file() {
      return Err(LibrarianError::Config(ConfigError::NotFound {
        root: self.root.clone(),
      }));
    }

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: RepositoryConfig = toml_edit::de::from_str(&content).map_err(|e| {
      LibrarianError::Config(ConfigError::Parse {
        path: config_path.clone(),
        message: e.to_string(),
      })
    })?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Overwrite the configuration, creating `.librarian/` if needed
  ///
  /// This is a full replacement, not a merge: callers load, mutate and save.
  pub fn save(&self, config: &RepositoryConfig) -> LibrarianResult<PathBuf> {
    config.validate()?;

    let config_path = self.path();
    if let Some(dir) = config_path.parent() {
      fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let content = toml_edit::ser::to_string_pretty(config).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }
}

/// Find the repository root by walking up from `start` looking for `.librarian/`
pub fn find_repository_root(start: &Path) -> Option<PathBuf> {
  start
    .ancestors()
    .find(|dir| dir.join(CONFIG_DIR).is_dir())
    .map(Path::to_path_buf)
}
