//! Repository context - build once, pass everywhere
//!
//! main.rs resolves the repository root and wires up the external
//! collaborators, then every command receives `&WorkspaceContext`. Nothing is
//! cached across invocations: each command loads, mutates and saves.

use crate::core::config::{ConfigStore, RepositoryConfig, find_repository_root};
use crate::core::error::LibrarianResult;
use crate::core::format::{Advisory, CommandFormatter, DocumentFormatter};
use crate::core::remote::{EnvTokenProvider, GitRemote, RemoteRepository};
use crate::core::vcs::{SourceControl, SystemGit};
use crate::state::store::ArtifactStore;
use crate::ui::output::Output;
use std::path::{Path, PathBuf};

/// Environment variable overriding repository root discovery
pub const ROOT_ENV: &str = "LIBRARIAN_ROOT";

/// Everything a command needs besides its own arguments
pub struct WorkspaceContext {
  /// Repository root (holds `.librarian/`)
  pub root: PathBuf,

  pub output: Output,

  pub git: Box<dyn SourceControl>,

  pub remote: Box<dyn RemoteRepository>,

  pub formatter: Box<dyn DocumentFormatter>,
}

impl WorkspaceContext {
  /// Context backed by system git, `git ls-remote` and the configured formatter
  pub fn build(root: &Path, output: Output) -> Self {
    Self {
      root: root.to_path_buf(),
      output,
      git: Box::new(SystemGit::new(root)),
      remote: Box::new(GitRemote::new(Box::new(EnvTokenProvider))),
      formatter: Box::new(CommandFormatter::from_env()),
    }
  }

  /// Root from `--root`, then `LIBRARIAN_ROOT`, then the nearest ancestor of
  /// `cwd` holding `.librarian/`, falling back to `cwd` itself
  pub fn resolve_root(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    if let Some(root) = explicit {
      return cwd.join(root);
    }
    if let Ok(root) = std::env::var(ROOT_ENV)
      && !root.is_empty()
    {
      return cwd.join(root);
    }
    find_repository_root(cwd).unwrap_or_else(|| cwd.to_path_buf())
  }

  pub fn config_store(&self) -> ConfigStore {
    ConfigStore::new(&self.root)
  }

  pub fn artifact_store(&self) -> ArtifactStore {
    ArtifactStore::new(&self.root)
  }

  /// Load the repository configuration (required by every command but `init`)
  pub fn load_config(&self) -> LibrarianResult<RepositoryConfig> {
    self.config_store().load()
  }

  /// Run the formatter on a document that was just written
  ///
  /// The advisory is logged here and handed back; it never turns into an error.
  pub fn format_document(&self, path: &Path) -> Advisory {
    let advisory = self.formatter.format(path);
    match &advisory {
      Advisory::Applied => self.output.verbose("format", &format!("formatted {}", path.display())),
      Advisory::Skipped(reason) => self.output.verbose("format", &format!("skipped {}: {}", path.display(), reason)),
      Advisory::Failed(reason) => self
        .output
        .warn(&format!("Could not format {}: {}", path.display(), reason)),
    }
    advisory
  }
}
