//! System git backend
//!
//! Shells out to the `git` binary for every operation. Commands run with an
//! isolated environment so user-level git configuration cannot change output
//! formats.

use super::SourceControl;
use crate::core::error::{ExternalError, LibrarianError, LibrarianResult, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Bind to a repository path
  ///
  /// Nothing is executed until the first call, so commands that never touch
  /// git also work outside a checkout.
  pub fn new(path: &Path) -> Self {
    Self {
      repo_path: path.to_path_buf(),
    }
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = isolated_git();
    cmd.arg("-C").arg(&self.repo_path);
    cmd
  }

  fn run(&self, args: &[&str]) -> LibrarianResult<String> {
    let mut cmd = self.git_cmd();
    cmd.args(args);
    let output = cmd
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;
    stdout_or_error(&format!("git {}", args.join(" ")), output)
  }
}

impl SourceControl for SystemGit {
  fn current_branch(&self) -> LibrarianResult<String> {
    self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
  }

  fn head_commit(&self) -> LibrarianResult<String> {
    self.run(&["rev-parse", "HEAD"])
  }

  fn create_tag(&self, name: &str, commit: &str, message: &str) -> LibrarianResult<()> {
    self.run(&["tag", "-a", name, commit, "-m", message]).map(|_| ())
  }

  fn tag_commit(&self, name: &str) -> LibrarianResult<Option<String>> {
    let spec = format!("refs/tags/{}^{{commit}}", name);
    let output = self
      .git_cmd()
      .args(["rev-parse", "-q", "--verify", &spec])
      .output()
      .context("Failed to execute git rev-parse")?;
    // --verify -q exits non-zero without output for a missing ref
    if !output.status.success() {
      return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
  }
}

/// `git` with a scrubbed environment and fixed config overrides
pub(crate) fn isolated_git() -> Command {
  let mut cmd = Command::new("git");

  // Isolated environment (don't trust global config)
  cmd.env_clear();
  if let Ok(path) = std::env::var("PATH") {
    cmd.env("PATH", path);
  }
  if let Ok(home) = std::env::var("HOME") {
    cmd.env("HOME", home);
  }
  cmd.env("GIT_TERMINAL_PROMPT", "0");

  // Force safe behavior (override user config)
  cmd.arg("-c").arg("advice.detachedHead=false");
  cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

  cmd
}

/// Trimmed stdout on success, `ExternalCommandFailed` otherwise
pub(crate) fn stdout_or_error(command: &str, output: Output) -> LibrarianResult<String> {
  if !output.status.success() {
    return Err(LibrarianError::External(ExternalError::CommandFailed {
      command: command.to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }));
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
