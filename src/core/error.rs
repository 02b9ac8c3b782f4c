//! Error types for librarian with contextual messages and exit codes
//!
//! Every failure a command can hit is one of the categories below. Each carries
//! enough context (artifact path, key name, external command) to be actionable
//! without re-running under a debugger, and most carry a help line.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for librarian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
  /// Release state machine refused a transition
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for librarian
#[derive(Debug)]
pub enum LibrarianError {
  /// Repository configuration errors
  Config(ConfigError),

  /// Artifact state document errors
  State(StateError),

  /// Version algebra errors
  Version(VersionError),

  /// Release state machine errors
  Release(ReleaseError),

  /// Source control, network and formatter failures
  External(ExternalError),

  /// I/O errors
  Io(io::Error),

  /// A typed error wrapped with the operation that hit it
  Contextual {
    context: String,
    source: Box<LibrarianError>,
  },

  /// Generic error with optional help
  Message { message: String, help: Option<String> },
}

impl LibrarianError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    LibrarianError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    LibrarianError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// The wrapped error keeps its variant so callers can still match on
  /// [`LibrarianError::root`].
  pub fn context(self, ctx: impl Into<String>) -> Self {
    LibrarianError::Contextual {
      context: ctx.into(),
      source: Box::new(self),
    }
  }

  /// The innermost error, with all context layers peeled off
  pub fn root(&self) -> &LibrarianError {
    match self {
      LibrarianError::Contextual { source, .. } => source.root(),
      other => other,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      LibrarianError::Config(_) => ExitCode::User,
      LibrarianError::State(StateError::Scan { .. }) => ExitCode::System,
      LibrarianError::State(_) => ExitCode::User,
      LibrarianError::Version(_) => ExitCode::User,
      LibrarianError::Release(_) => ExitCode::Validation,
      LibrarianError::External(_) => ExitCode::System,
      LibrarianError::Io(_) => ExitCode::System,
      LibrarianError::Contextual { source, .. } => source.exit_code(),
      LibrarianError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      LibrarianError::Config(e) => e.help_message(),
      LibrarianError::State(e) => e.help_message(),
      LibrarianError::Release(e) => e.help_message(),
      LibrarianError::External(e) => e.help_message(),
      LibrarianError::Contextual { source, .. } => source.help_message(),
      LibrarianError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for LibrarianError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LibrarianError::Config(e) => write!(f, "{}", e),
      LibrarianError::State(e) => write!(f, "{}", e),
      LibrarianError::Version(e) => write!(f, "{}", e),
      LibrarianError::Release(e) => write!(f, "{}", e),
      LibrarianError::External(e) => write!(f, "{}", e),
      LibrarianError::Io(e) => write!(f, "I/O error: {}", e),
      LibrarianError::Contextual { context, source } => write!(f, "{}: {}", context, source),
      LibrarianError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for LibrarianError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      LibrarianError::Io(e) => Some(e),
      LibrarianError::Contextual { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for LibrarianError {
  fn from(err: io::Error) -> Self {
    LibrarianError::Io(err)
  }
}

impl From<toml_edit::ser::Error> for LibrarianError {
  fn from(err: toml_edit::ser::Error) -> Self {
    LibrarianError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for LibrarianError {
  fn from(err: serde_json::Error) -> Self {
    LibrarianError::message(format!("JSON error: {}", err))
  }
}

impl From<ConfigError> for LibrarianError {
  fn from(err: ConfigError) -> Self {
    LibrarianError::Config(err)
  }
}

impl From<StateError> for LibrarianError {
  fn from(err: StateError) -> Self {
    LibrarianError::State(err)
  }
}

impl From<VersionError> for LibrarianError {
  fn from(err: VersionError) -> Self {
    LibrarianError::Version(err)
  }
}

impl From<ReleaseError> for LibrarianError {
  fn from(err: ReleaseError) -> Self {
    LibrarianError::Release(err)
  }
}

impl From<ExternalError> for LibrarianError {
  fn from(err: ExternalError) -> Self {
    LibrarianError::External(err)
  }
}

/// Repository configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// `.librarian/config.toml` has never been written
  NotFound { root: PathBuf },

  /// The document exists but is not valid
  Parse { path: PathBuf, message: String },

  /// Key path is not part of the config schema
  UnknownKey { key: String },

  /// Key path is known but the value is rejected
  InvalidValue { key: String, value: String, reason: String },

  /// The document violates a RepositoryConfig invariant
  Invalid { reason: String },

  /// `init` would overwrite an existing config
  AlreadyInitialized { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `librarian init <language>` to create a configuration.".to_string()),
      ConfigError::UnknownKey { .. } => Some(format!(
        "Known keys: {}",
        crate::core::keys::key_paths().collect::<Vec<_>>().join(", ")
      )),
      ConfigError::AlreadyInitialized { .. } => Some("Pass --force to overwrite it.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(
          f,
          "No librarian configuration found.\nExpected file: {}/.librarian/config.toml",
          root.display()
        )
      }
      ConfigError::Parse { path, message } => {
        write!(f, "Failed to parse config {}: {}", path.display(), message)
      }
      ConfigError::UnknownKey { key } => write!(f, "Unknown config key '{}'", key),
      ConfigError::InvalidValue { key, value, reason } => {
        write!(f, "Invalid value '{}' for config key '{}': {}", value, key, reason)
      }
      ConfigError::Invalid { reason } => write!(f, "Invalid configuration: {}", reason),
      ConfigError::AlreadyInitialized { path } => {
        write!(f, "Configuration already exists at {}", path.display())
      }
    }
  }
}

/// Artifact state document errors
#[derive(Debug)]
pub enum StateError {
  /// An explicit artifact path has no state document
  ArtifactNotFound { path: String },

  /// Artifact path is absolute or escapes the repository
  InvalidPath { path: String, reason: String },

  /// A state document exists but is not valid
  Parse { path: PathBuf, message: String },

  /// Walking the repository for state documents failed
  Scan { path: PathBuf, message: String },

  /// `--language LANG:KEY=VALUE` could not be applied
  InvalidLanguageMetadata { input: String, reason: String },
}

impl StateError {
  fn help_message(&self) -> Option<String> {
    match self {
      StateError::ArtifactNotFound { path } => Some(format!("Run `librarian add {}` to start tracking it.", path)),
      StateError::InvalidPath { .. } => {
        Some("Artifact paths are relative to the repository root, e.g. `packages/storage`.".to_string())
      }
      StateError::InvalidLanguageMetadata { .. } => {
        Some("Expected LANG:KEY=VALUE, e.g. `go:module=cloud.google.com/go/storage`.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for StateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StateError::ArtifactNotFound { path } => write!(f, "Artifact '{}' is not tracked", path),
      StateError::InvalidPath { path, reason } => write!(f, "Invalid artifact path '{}': {}", path, reason),
      StateError::Parse { path, message } => {
        write!(f, "Failed to parse state document {}: {}", path.display(), message)
      }
      StateError::Scan { path, message } => {
        write!(f, "Failed to scan for state documents under {}: {}", path.display(), message)
      }
      StateError::InvalidLanguageMetadata { input, reason } => {
        write!(f, "Invalid language metadata '{}': {}", input, reason)
      }
    }
  }
}

/// Version algebra errors
#[derive(Debug)]
pub enum VersionError {
  /// Does not match `v?MAJOR.MINOR.PATCH(-LABEL.N)?`
  InvalidFormat { version: String },

  /// Prerelease label would not round-trip through the version format
  InvalidLabel { label: String },

  /// The next version does not fit in a version component
  Overflow { version: String },
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::InvalidFormat { version } => write!(
        f,
        "Invalid version format '{}' (expected v?MAJOR.MINOR.PATCH or v?MAJOR.MINOR.PATCH-LABEL.N)",
        version
      ),
      VersionError::InvalidLabel { label } => {
        write!(f, "Invalid prerelease label '{}' (letters, digits and '-' only)", label)
      }
      VersionError::Overflow { version } => {
        write!(f, "Cannot increment '{}': a version component would overflow", version)
      }
    }
  }
}

/// Release state machine errors
#[derive(Debug)]
pub enum ReleaseError {
  /// Artifact has no `[release]` section
  NotConfigured { artifact: String },

  /// `tag` without a preceding `prepare`
  NoPendingRelease { artifact: String },

  /// Pending tag equals the last tag in history
  AlreadyTagged { artifact: String, tag: String },

  /// Computed tag already appears in history
  TagAlreadyReleased { artifact: String, tag: String },

  /// `--promote` on a version without a prerelease suffix
  NothingToPromote { artifact: String, version: String },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::NotConfigured { artifact } => Some(format!(
        "Add a [release] section to {}/.librarian.toml, or re-run `librarian add {}`.",
        artifact, artifact
      )),
      ReleaseError::NoPendingRelease { artifact } => {
        Some(format!("Run `librarian prepare {}` first.", artifact))
      }
      ReleaseError::TagAlreadyReleased { .. } => {
        Some("The recorded current version is behind history; fix [release] version before preparing.".to_string())
      }
      ReleaseError::NothingToPromote { .. } => {
        Some("Use `librarian prepare` without --promote for an ordinary release.".to_string())
      }
      ReleaseError::AlreadyTagged { .. } => None,
    }
  }

  /// Tagging something that is already tagged is reported, never fatal
  pub fn is_benign(&self) -> bool {
    matches!(self, ReleaseError::AlreadyTagged { .. })
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::NotConfigured { artifact } => write!(f, "{}: not configured for release", artifact),
      ReleaseError::NoPendingRelease { artifact } => write!(f, "{}: no pending release", artifact),
      ReleaseError::AlreadyTagged { artifact, tag } => write!(f, "{}: {} is already tagged", artifact, tag),
      ReleaseError::TagAlreadyReleased { artifact, tag } => {
        write!(f, "{}: {} already appears in release history", artifact, tag)
      }
      ReleaseError::NothingToPromote { artifact, version } => {
        write!(f, "{}: {} is not a prerelease, nothing to promote", artifact, version)
      }
    }
  }
}

/// Source control, network and formatter failures
#[derive(Debug)]
pub enum ExternalError {
  /// External command failed
  CommandFailed { command: String, stderr: String },

  /// No auth token could be obtained
  MissingToken { tried: String },
}

impl ExternalError {
  fn help_message(&self) -> Option<String> {
    match self {
      ExternalError::MissingToken { .. } => {
        Some("Export GITHUB_TOKEN, or log in with `gh auth login`.".to_string())
      }
      ExternalError::CommandFailed { stderr, .. } => {
        if stderr.contains("not a git repository") {
          Some("Run librarian from inside a git checkout.".to_string())
        } else if stderr.contains("already exists") {
          Some("The git tag already points at another commit; delete it or prepare again.".to_string())
        } else {
          None
        }
      }
    }
  }
}

impl fmt::Display for ExternalError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ExternalError::CommandFailed { command, stderr } => {
        write!(f, "External command failed: {}\n{}", command, stderr.trim_end())
      }
      ExternalError::MissingToken { tried } => write!(f, "No auth token available (tried {})", tried),
    }
  }
}

/// Result type alias for librarian
pub type LibrarianResult<T> = Result<T, LibrarianError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> LibrarianResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> LibrarianResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<LibrarianError>,
{
  fn context(self, ctx: impl Into<String>) -> LibrarianResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> LibrarianResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &LibrarianError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
