//! Integration tests for `librarian prepare` and `librarian release`

use crate::helpers::{TestRepo, git, stderr, stdout};
use anyhow::Result;

#[test]
fn test_prepare_then_release() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms", "google/cloud/kms/v1"])?;
  let head = repo.commit("Add kms")?;

  let output = repo.run(&["prepare", "packages/kms"])?;
  assert!(stdout(&output).contains("unreleased → v0.1.0"));

  let state = repo.state("packages/kms")?;
  assert_eq!(state["release"]["version"].as_str(), Some("unreleased"));
  assert_eq!(state["release"]["pending"]["version"].as_str(), Some("v0.1.0"));
  assert_eq!(state["release"]["pending"]["commit"].as_str(), Some(head.as_str()));
  assert_eq!(state["release"]["pending"]["branch"].as_str(), Some("main"));

  repo.run(&["release", "packages/kms"])?;
  assert_eq!(repo.tags()?, vec!["packages/kms/v0.1.0"]);

  let tagged = git(&repo.path, &["rev-list", "-n", "1", "packages/kms/v0.1.0"])?;
  assert_eq!(String::from_utf8_lossy(&tagged.stdout).trim(), head);

  let state = repo.state("packages/kms")?;
  assert_eq!(state["release"]["version"].as_str(), Some("v0.1.0"));
  assert!(state["release"].get("pending").is_none());
  let entry = &state["release"]["history"][0];
  assert_eq!(entry["tag"].as_str(), Some("v0.1.0"));
  assert_eq!(entry["commit"].as_str(), Some(head.as_str()));
  assert!(entry.get("date").is_some());
  Ok(())
}

#[test]
fn test_release_without_pending() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;

  let output = repo.run_raw(&["release", "packages/kms"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("packages/kms: no pending release"));
  assert!(stderr(&output).contains("librarian prepare packages/kms"));
  assert!(repo.tags()?.is_empty());
  Ok(())
}

#[test]
fn test_release_finishes_when_tag_already_exists() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;
  let head = repo.commit("Add kms")?;
  repo.run(&["prepare", "packages/kms"])?;

  // Tag created by an earlier run that never saved the state file
  git(&repo.path, &["tag", "-a", "packages/kms/v0.1.0", &head, "-m", "Release packages/kms v0.1.0"])?;

  repo.run(&["release", "packages/kms"])?;
  assert_eq!(repo.tags()?, vec!["packages/kms/v0.1.0"]);
  let state = repo.state("packages/kms")?;
  assert_eq!(state["release"]["version"].as_str(), Some("v0.1.0"));
  assert!(state["release"].get("pending").is_none());
  Ok(())
}

#[test]
fn test_second_release_needs_new_prepare() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;
  repo.run(&["prepare", "packages/kms"])?;
  repo.run(&["release", "packages/kms"])?;

  let output = repo.run_raw(&["release", "packages/kms"])?;
  assert_eq!(output.status.code(), Some(3));

  repo.commit("Fix kms")?;
  let output = repo.run(&["prepare", "packages/kms"])?;
  assert!(stdout(&output).contains("v0.1.0 → v0.2.0"));
  repo.run(&["release", "packages/kms"])?;

  let mut tags = repo.tags()?;
  tags.sort();
  assert_eq!(tags, vec!["packages/kms/v0.1.0", "packages/kms/v0.2.0"]);
  assert_eq!(repo.state("packages/kms")?["release"]["history"][1]["tag"].as_str(), Some("v0.2.0"));
  Ok(())
}

#[test]
fn test_prerelease_line_and_promotion() -> Result<()> {
  let repo = TestRepo::initialized("python")?;
  repo.run(&["add", "packages/kms"])?;

  repo.run(&["prepare", "packages/kms", "--prerelease", "rc"])?;
  repo.run(&["release", "packages/kms"])?;
  repo.run(&["prepare", "packages/kms", "--prerelease", "rc"])?;
  repo.run(&["release", "packages/kms"])?;
  assert_eq!(repo.state("packages/kms")?["release"]["version"].as_str(), Some("v0.1.0-rc.2"));

  repo.run(&["prepare", "packages/kms", "--promote"])?;
  repo.run(&["release", "packages/kms"])?;
  assert_eq!(repo.state("packages/kms")?["release"]["version"].as_str(), Some("v0.1.0"));

  let mut tags = repo.tags()?;
  tags.sort();
  assert_eq!(
    tags,
    vec!["packages/kms/v0.1.0", "packages/kms/v0.1.0-rc.1", "packages/kms/v0.1.0-rc.2"]
  );

  let output = repo.run_raw(&["prepare", "packages/kms", "--promote"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("nothing to promote"));
  Ok(())
}

#[test]
fn test_invalid_prerelease_label() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;

  let output = repo.run_raw(&["prepare", "packages/kms", "--prerelease", "rc.1"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Invalid prerelease label"));
  assert!(repo.state("packages/kms")?["release"].get("pending").is_none());
  Ok(())
}

#[test]
fn test_branch_rule_picks_prerelease_label() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let mut config = repo.read_file(".librarian/config.toml")?;
  config.push_str("\n[[release.branches]]\npattern = \"preview/*\"\nprerelease = \"preview\"\n");
  repo.write_file(".librarian/config.toml", &config)?;

  repo.run(&["add", "packages/kms"])?;
  git(&repo.path, &["checkout", "-b", "preview/next"])?;

  repo.run(&["prepare", "packages/kms"])?;
  let state = repo.state("packages/kms")?;
  assert_eq!(state["release"]["pending"]["version"].as_str(), Some("v0.1.0-preview.1"));
  assert_eq!(state["release"]["pending"]["branch"].as_str(), Some("preview/next"));

  // An explicit empty label overrides the branch rule
  repo.run(&["prepare", "packages/kms", "--prerelease", ""])?;
  let state = repo.state("packages/kms")?;
  assert_eq!(state["release"]["pending"]["version"].as_str(), Some("v0.1.0"));
  Ok(())
}

#[test]
fn test_dry_run_changes_nothing() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;

  let output = repo.run(&["prepare", "packages/kms", "--dry-run"])?;
  assert!(stdout(&output).contains("unreleased → v0.1.0 (dry run)"));
  assert!(repo.state("packages/kms")?["release"].get("pending").is_none());

  repo.run(&["prepare", "packages/kms"])?;
  let before = repo.read_file("packages/kms/.librarian.toml")?;
  let output = repo.run(&["release", "packages/kms", "--dry-run"])?;
  assert!(stdout(&output).contains("would tag packages/kms/v0.1.0"));
  assert!(repo.tags()?.is_empty());
  assert_eq!(repo.read_file("packages/kms/.librarian.toml")?, before);
  Ok(())
}

#[test]
fn test_root_artifact_tag_has_no_name() -> Result<()> {
  let repo = TestRepo::initialized("none")?;
  repo.run(&["add", "."])?;
  repo.run(&["prepare", "."])?;
  repo.run(&["release", "."])?;
  assert_eq!(repo.tags()?, vec!["v0.1.0"]);
  Ok(())
}

#[test]
fn test_custom_tag_format() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["config", "set", "release.tag_format", "{name}-{version}"])?;
  repo.run(&["add", "storage"])?;
  repo.run(&["prepare", "storage"])?;
  repo.run(&["release", "storage"])?;
  assert_eq!(repo.tags()?, vec!["storage-v0.1.0"]);
  Ok(())
}

#[test]
fn test_release_all() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;
  repo.run(&["add", "packages/storage"])?;
  repo.run(&["add", "tools/lint", "--no-release"])?;

  let output = repo.run(&["prepare", "--all"])?;
  assert!(stdout(&output).contains("prepared: 2, not configured: 1, failed: 0"));

  let output = repo.run(&["release", "--all"])?;
  assert!(stdout(&output).contains("tagged: 2, not configured: 1, failed: 0"));
  let mut tags = repo.tags()?;
  tags.sort();
  assert_eq!(tags, vec!["packages/kms/v0.1.0", "packages/storage/v0.1.0"]);

  let output = repo.run(&["release", "--all"])?;
  assert!(stdout(&output).contains("tagged: 0, no pending: 2, not configured: 1, failed: 0"));
  Ok(())
}

#[test]
fn test_prepare_all_continues_past_failures() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;
  repo.write_file("packages/bad/.librarian.toml", "[release]\nversion = \"banana\"\n")?;

  let output = repo.run_raw(&["prepare", "--all"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("packages/bad:"));
  assert!(stdout(&output).contains("prepared: 1, failed: 1"));
  assert_eq!(
    repo.state("packages/kms")?["release"]["pending"]["version"].as_str(),
    Some("v0.1.0")
  );
  Ok(())
}

#[test]
fn test_prepare_requires_target() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let output = repo.run_raw(&["prepare", "packages/kms", "--all"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("not both"));
  Ok(())
}
