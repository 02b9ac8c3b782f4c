//! Integration tests for `librarian config`

use crate::helpers::{TestRepo, stderr, stdout};
use anyhow::Result;

#[test]
fn test_config_get_and_set() -> Result<()> {
  let repo = TestRepo::initialized("go")?;

  let output = repo.run(&["config", "get", "librarian.language"])?;
  assert_eq!(stdout(&output).trim(), "go");

  repo.run(&["config", "set", "release.tag_format", "{name}-{version}"])?;
  let output = repo.run(&["config", "get", "release.tag_format"])?;
  assert_eq!(stdout(&output).trim(), "{name}-{version}");
  assert_eq!(repo.config()?["release"]["tag_format"].as_str(), Some("{name}-{version}"));
  Ok(())
}

#[test]
fn test_config_get_unset_key_is_empty() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let output = repo.run(&["config", "get", "generate.container.image"])?;
  assert_eq!(stdout(&output).trim(), "");
  Ok(())
}

#[test]
fn test_config_get_lists_every_key() -> Result<()> {
  let repo = TestRepo::initialized("python")?;
  let output = repo.run(&["config", "get"])?;
  let out = stdout(&output);
  assert!(out.contains("librarian.language = \"python\""));
  assert!(out.contains("generate.googleapis.repo = \"googleapis/googleapis\""));
  assert!(out.contains("release.tag_format = \"{name}/{version}\""));
  Ok(())
}

#[test]
fn test_config_unknown_key() -> Result<()> {
  let repo = TestRepo::initialized("go")?;

  let output = repo.run_raw(&["config", "get", "release.tag_formats"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Unknown config key 'release.tag_formats'"));

  let output = repo.run_raw(&["config", "set", "generate", "x"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_config_set_rejects_invalid_value() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let before = repo.read_file(".librarian/config.toml")?;

  let output = repo.run_raw(&["config", "set", "release.tag_format", "{name}"])?;
  assert_eq!(output.status.code(), Some(1));
  assert_eq!(repo.read_file(".librarian/config.toml")?, before);
  Ok(())
}

#[test]
fn test_config_switch_to_release_only_drops_generate() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  assert!(repo.config()?.get("generate").is_some());

  repo.run(&["config", "set", "librarian.language", "none"])?;
  let config = repo.config()?;
  assert_eq!(config["librarian"]["language"].as_str(), Some("none"));
  assert!(config.get("generate").is_none());
  Ok(())
}

#[test]
fn test_config_set_generate_key_on_release_only_repo() -> Result<()> {
  let repo = TestRepo::initialized("none")?;
  let output = repo.run_raw(&["config", "set", "generate.googleapis.ref", "abc123"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(repo.config()?.get("generate").is_none());
  Ok(())
}

#[test]
fn test_config_update_pins_local_source() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let apis = TestRepo::new()?;
  apis.write_file("google/cloud/kms/v1/kms.proto", "syntax = \"proto3\";\n")?;
  let head = apis.commit("Add kms")?;

  let apis_path = apis.path.to_string_lossy().to_string();
  repo.run(&["config", "set", "generate.googleapis.repo", &apis_path])?;
  repo.run(&["config", "update"])?;

  let output = repo.run(&["config", "get", "generate.googleapis.ref"])?;
  assert_eq!(stdout(&output).trim(), head);

  // Nothing changed upstream: a second update is a no-op
  let output = repo.run(&["config", "update"])?;
  assert!(stdout(&output).contains("up to date"));
  Ok(())
}

#[test]
fn test_config_update_all_syncs_artifacts() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let apis = TestRepo::new()?;
  let head = apis.head()?;

  repo.run(&["config", "set", "generate.googleapis.repo", &apis.path.to_string_lossy()])?;
  repo.run(&["add", "packages/kms", "google/cloud/kms/v1"])?;
  repo.run(&["config", "update", "--all"])?;

  let state = repo.state("packages/kms")?;
  assert_eq!(state["generate"]["googleapis"]["ref"].as_str(), Some(head.as_str()));
  Ok(())
}

#[test]
fn test_config_update_release_only_is_noop() -> Result<()> {
  let repo = TestRepo::initialized("none")?;
  let output = repo.run(&["config", "update"])?;
  assert!(stdout(&output).contains("Nothing to update"));
  Ok(())
}
