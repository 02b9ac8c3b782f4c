//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use toml_edit::DocumentMut;

/// A git repository librarian can run in
pub struct TestRepo {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestRepo {
  /// Create a repository with one commit on `main`
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(path.join("README.md"), "# client libraries\n")?;
    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial commit"])?;

    Ok(Self { _root: root, path })
  }

  /// A repository already initialized for `language`
  pub fn initialized(language: &str) -> Result<Self> {
    let repo = Self::new()?;
    repo.run(&["init", language])?;
    Ok(repo)
  }

  /// Run librarian and require success
  pub fn run(&self, args: &[&str]) -> Result<Output> {
    run_librarian(&self.path, args)
  }

  /// Run librarian and return whatever happened
  pub fn run_raw(&self, args: &[&str]) -> Result<Output> {
    librarian(&self.path, args).output().context("Failed to run librarian")
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "--allow-empty", "-m", message])?;
    self.head()
  }

  pub fn head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a file, including parent directories
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file = self.path.join(path);
    if let Some(dir) = file.parent() {
      std::fs::create_dir_all(dir)?;
    }
    std::fs::write(file, content)?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Parsed `.librarian.toml` of an artifact
  pub fn state(&self, artifact: &str) -> Result<DocumentMut> {
    let content = self.read_file(&format!("{}/.librarian.toml", artifact))?;
    Ok(content.parse::<DocumentMut>()?)
  }

  /// Parsed `.librarian/config.toml`
  pub fn config(&self) -> Result<DocumentMut> {
    Ok(self.read_file(".librarian/config.toml")?.parse::<DocumentMut>()?)
  }

  /// Tags in the repository
  pub fn tags(&self) -> Result<Vec<String>> {
    let output = git(&self.path, &["tag", "--list"])?;
    Ok(
      String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect(),
    )
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// librarian with a predictable environment
fn librarian(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_librarian"));
  cmd
    .current_dir(cwd)
    .args(args)
    .env("LIBRARIAN_FORMATTER", "")
    .env_remove("LIBRARIAN_ROOT")
    .env_remove("LIBRARIAN_VERBOSE");
  cmd
}

/// Run librarian CLI command
pub fn run_librarian(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = librarian(cwd, args).output().context("Failed to run librarian")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "librarian command failed: librarian {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
