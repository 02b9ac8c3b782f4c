//! Integration tests for add, edit, remove, generate and status

use crate::helpers::{TestRepo, stderr, stdout};
use anyhow::Result;

const KMS_BUILD: &str = r#"
go_gapic_library(
    name = "kms_go_gapic",
    srcs = [":kms_proto_with_info"],
    grpc_service_config = "cloudkms_grpc_service_config.json",
    rest_numeric_enums = True,
    service_yaml = "cloudkms_v1.yaml",
    transport = "grpc+rest",
)
"#;

#[test]
fn test_add_derives_api_settings_from_build_rules() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let apis = TestRepo::new()?;
  apis.write_file("google/cloud/kms/v1/BUILD.bazel", KMS_BUILD)?;

  let source_root = apis.path.to_string_lossy().to_string();
  repo.run(&["add", "packages/kms", "google/cloud/kms/v1", "--source-root", &source_root])?;

  let state = repo.state("packages/kms")?;
  let api = &state["generate"]["apis"][0];
  assert_eq!(api["path"].as_str(), Some("google/cloud/kms/v1"));
  assert_eq!(api["transport"].as_str(), Some("grpc+rest"));
  assert_eq!(api["service_config"].as_str(), Some("cloudkms_v1.yaml"));
  assert_eq!(api["grpc_service_config"].as_str(), Some("cloudkms_grpc_service_config.json"));
  assert_eq!(api["numeric_enums"].as_bool(), Some(true));
  assert_eq!(state["release"]["version"].as_str(), Some("unreleased"));
  Ok(())
}

#[test]
fn test_add_without_source_keeps_bare_api() -> Result<()> {
  let repo = TestRepo::initialized("go")?;

  let output = repo.run(&["add", "packages/kms", "google/cloud/kms/v1"])?;
  assert!(stderr(&output).contains("--source-root"));

  let state = repo.state("packages/kms")?;
  let api = &state["generate"]["apis"][0];
  assert_eq!(api["path"].as_str(), Some("google/cloud/kms/v1"));
  assert!(api.get("transport").is_none());
  assert_eq!(state["generate"]["googleapis"]["repo"].as_str(), Some("googleapis/googleapis"));
  Ok(())
}

#[test]
fn test_add_again_appends_apis_in_order() -> Result<()> {
  let repo = TestRepo::initialized("python")?;

  repo.run(&["add", "packages/kms", "google/cloud/kms/v1"])?;
  let output = repo.run(&["add", "packages/kms", "google/cloud/kms/v1", "google/cloud/kms/inventory/v1"])?;
  assert!(stdout(&output).contains("Updated packages/kms (2 API(s))"));

  let state = repo.state("packages/kms")?;
  let apis = &state["generate"]["apis"];
  assert_eq!(apis[0]["path"].as_str(), Some("google/cloud/kms/v1"));
  assert_eq!(apis[1]["path"].as_str(), Some("google/cloud/kms/inventory/v1"));
  assert!(apis.get(2).is_none());
  Ok(())
}

#[test]
fn test_add_handwritten_artifact() -> Result<()> {
  let repo = TestRepo::initialized("none")?;

  repo.run(&["add", "./tools/cli/"])?;
  let state = repo.state("tools/cli")?;
  assert!(state.get("generate").is_none());
  assert_eq!(state["release"]["tag_format"].as_str(), Some("{name}/{version}"));

  let output = repo.run_raw(&["add", "tools/lib", "google/cloud/kms/v1"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(!repo.file_exists("tools/lib/.librarian.toml"));
  Ok(())
}

#[test]
fn test_add_rejects_paths_outside_repository() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  for path in ["../outside", "/abs/path"] {
    let output = repo.run_raw(&["add", path])?;
    assert_eq!(output.status.code(), Some(1), "{}", path);
    assert!(stderr(&output).contains("Invalid artifact path"), "{}", path);
  }
  Ok(())
}

#[test]
fn test_edit_file_rules_and_language_metadata() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms", "google/cloud/kms/v1"])?;

  repo.run(&[
    "edit",
    "packages/kms",
    "--keep",
    "CHANGES.md",
    "--keep",
    "internal/version.go",
    "--exclude",
    "README.md",
    "--language",
    "go:module=cloud.google.com/go/kms",
  ])?;

  let state = repo.state("packages/kms")?;
  let keep = state["config"]["keep"].as_array().expect("keep list");
  let keep: Vec<_> = keep.iter().filter_map(|v| v.as_str()).collect();
  assert_eq!(keep, vec!["CHANGES.md", "internal/version.go"]);
  assert_eq!(state["config"]["exclude"][0].as_str(), Some("README.md"));
  assert_eq!(state["language"]["go"]["module"].as_str(), Some("cloud.google.com/go/kms"));

  let output = repo.run(&["status", "--json"])?;
  let statuses: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(statuses[0]["package"], "cloud.google.com/go/kms");
  Ok(())
}

#[test]
fn test_edit_rejects_other_language_without_writing() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;
  let before = repo.read_file("packages/kms/.librarian.toml")?;

  let output = repo.run_raw(&[
    "edit",
    "packages/kms",
    "--keep",
    "CHANGES.md",
    "--language",
    "python:package=google-cloud-kms",
  ])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Invalid language metadata"));
  assert_eq!(repo.read_file("packages/kms/.librarian.toml")?, before);
  Ok(())
}

#[test]
fn test_edit_untracked_artifact() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let output = repo.run_raw(&["edit", "packages/missing", "--keep", "x"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("is not tracked"));
  assert!(!repo.file_exists("packages/missing/.librarian.toml"));
  Ok(())
}

#[test]
fn test_remove_is_idempotent() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms"])?;

  let output = repo.run(&["remove", "packages/kms"])?;
  assert!(stdout(&output).contains("Removed packages/kms"));
  assert!(!repo.file_exists("packages/kms/.librarian.toml"));

  let output = repo.run(&["remove", "packages/kms"])?;
  assert!(stdout(&output).contains("not tracked"));
  Ok(())
}

#[test]
fn test_status_json_lists_artifacts_by_path() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/storage", "google/storage/v2"])?;
  repo.run(&["add", "packages/auth", "--no-release"])?;
  repo.run(&["add", "."])?;

  let output = repo.run(&["status", "--json"])?;
  let statuses: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  let statuses = statuses.as_array().expect("status array");

  let paths: Vec<_> = statuses.iter().filter_map(|s| s["path"].as_str()).collect();
  assert_eq!(paths, vec![".", "packages/auth", "packages/storage"]);

  assert_eq!(statuses[1]["phase"], "not_configured");
  assert_eq!(statuses[1]["generated"], false);
  assert_eq!(statuses[2]["phase"], "unreleased");
  assert_eq!(statuses[2]["generated"], true);
  assert_eq!(statuses[2]["apis"], 1);
  Ok(())
}

#[test]
fn test_status_with_no_artifacts() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let output = repo.run(&["status"])?;
  assert!(stdout(&output).contains("No artifacts tracked"));
  Ok(())
}

#[test]
fn test_generate_all_picks_up_config_changes() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  repo.run(&["add", "packages/kms", "google/cloud/kms/v1"])?;
  repo.run(&["add", "packages/storage", "google/storage/v2"])?;
  repo.run(&["add", "tools/cli"])?;

  repo.run(&["config", "set", "generate.container.image", "gcr.io/example/librarian-go"])?;
  repo.run(&["config", "set", "release.tag_format", "{name}-{version}"])?;
  let output = repo.run(&["generate", "--all"])?;
  assert!(stdout(&output).contains("failed: 0"));

  for path in ["packages/kms", "packages/storage"] {
    let state = repo.state(path)?;
    assert_eq!(
      state["generate"]["container"]["image"].as_str(),
      Some("gcr.io/example/librarian-go"),
      "{}",
      path
    );
    assert_eq!(state["release"]["tag_format"].as_str(), Some("{name}-{version}"));
  }
  assert!(repo.state("tools/cli")?.get("generate").is_none());
  Ok(())
}

#[test]
fn test_generate_requires_target() -> Result<()> {
  let repo = TestRepo::initialized("go")?;
  let output = repo.run_raw(&["generate"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("--all"));
  Ok(())
}
