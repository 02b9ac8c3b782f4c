//! Status command - one line per tracked artifact

use crate::core::config::Language;
use crate::core::context::WorkspaceContext;
use crate::core::error::LibrarianResult;
use crate::state::artifact::{Artifact, ReleasePhase};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
  pub path: String,
  /// Module path or package name for the repository language
  #[serde(skip_serializing_if = "Option::is_none")]
  pub package: Option<String>,
  pub generated: bool,
  pub apis: usize,
  pub phase: ReleasePhase,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pending: Option<String>,
}

impl ArtifactStatus {
  fn new(path: String, artifact: &Artifact, language: Language) -> Self {
    let release = artifact.release.as_ref();
    Self {
      path,
      package: artifact
        .language
        .as_ref()
        .and_then(|section| section.get(language))
        .map(|metadata| metadata.value().to_string()),
      generated: artifact.is_generated(),
      apis: artifact.generate.as_ref().map_or(0, |g| g.apis.len()),
      phase: artifact.release_phase(),
      version: release.map(|r| r.version.clone()),
      pending: release.and_then(|r| r.pending.as_ref()).map(|p| p.version.clone()),
    }
  }
}

/// Statuses of every artifact, sorted by path
pub fn collect_status(ctx: &WorkspaceContext, language: Language) -> LibrarianResult<Vec<ArtifactStatus>> {
  let mut statuses: Vec<_> = ctx
    .artifact_store()
    .load_all()?
    .into_iter()
    .map(|(path, artifact)| ArtifactStatus::new(path, &artifact, language))
    .collect();
  statuses.sort_by(|a, b| a.path.cmp(&b.path));
  Ok(statuses)
}

/// Run the status command
pub fn run_status(ctx: &WorkspaceContext, json: bool) -> LibrarianResult<()> {
  let config = ctx.load_config()?;
  let statuses = collect_status(ctx, config.language())?;

  if json {
    return ctx.output.data(&statuses);
  }

  if statuses.is_empty() {
    println!("No artifacts tracked. Add one with: librarian add <path>");
    return Ok(());
  }

  println!("📦 {} artifact(s) ({} repository)\n", statuses.len(), config.language());
  let width = statuses.iter().map(|s| s.path.len()).max().unwrap_or(0);
  for status in &statuses {
    let mut kind = if status.generated {
      format!("generated, {} API(s)", status.apis)
    } else {
      "handwritten".to_string()
    };
    if let Some(package) = &status.package {
      kind = format!("{} [{}]", kind, package);
    }
    let release = match (&status.version, &status.pending) {
      (None, _) => "not released".to_string(),
      (Some(version), None) => version.clone(),
      (Some(version), Some(pending)) => format!("{} → {} pending", version, pending),
    };
    println!("  {:<width$}  {:<28}  {}", status.path, release, kind, width = width);
  }
  Ok(())
}
