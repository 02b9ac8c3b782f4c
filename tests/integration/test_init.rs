//! Integration tests for `librarian init`

use crate::helpers::{TestRepo, stderr};
use anyhow::Result;

#[test]
fn test_init_writes_config() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.run(&["init", "go"])?;

  let config = repo.config()?;
  assert_eq!(config["librarian"]["language"].as_str(), Some("go"));
  assert_eq!(config["librarian"]["version"].as_str(), Some(env!("CARGO_PKG_VERSION")));
  assert_eq!(config["generate"]["googleapis"]["repo"].as_str(), Some("googleapis/googleapis"));
  assert_eq!(config["release"]["tag_format"].as_str(), Some("{name}/{version}"));
  Ok(())
}

#[test]
fn test_init_release_only_has_no_generate_section() -> Result<()> {
  let repo = TestRepo::new()?;
  repo.run(&["init", "none"])?;

  let config = repo.config()?;
  assert_eq!(config["librarian"]["language"].as_str(), Some("none"));
  assert!(config.get("generate").is_none());
  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let repo = TestRepo::initialized("python")?;

  let output = repo.run_raw(&["init", "rust"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("already exists"));
  assert_eq!(repo.config()?["librarian"]["language"].as_str(), Some("python"));

  repo.run(&["init", "rust", "--force"])?;
  assert_eq!(repo.config()?["librarian"]["language"].as_str(), Some("rust"));
  Ok(())
}

#[test]
fn test_unknown_language_is_rejected() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = repo.run_raw(&["init", "java"])?;
  assert!(!output.status.success());
  assert!(!repo.file_exists(".librarian/config.toml"));
  Ok(())
}

#[test]
fn test_commands_require_init() -> Result<()> {
  let repo = TestRepo::new()?;
  let output = repo.run_raw(&["status"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("librarian init"));
  Ok(())
}

#[test]
fn test_root_is_found_from_subdirectory() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.write_file("packages/kms/README.md", "kms\n")?;

  crate::helpers::run_librarian(&repo.path.join("packages/kms"), &["add", "packages/kms"])?;
  assert!(repo.file_exists("packages/kms/.librarian.toml"));
  Ok(())
}
