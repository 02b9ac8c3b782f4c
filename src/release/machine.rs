//! prepare -> tag transitions for a single artifact
//!
//! Every check runs before the artifact is touched, so a failed transition
//! leaves the in-memory state exactly as it was and the caller has nothing to
//! persist.

use crate::core::config::{BranchPrerelease, DEFAULT_TAG_FORMAT};
use crate::core::error::{LibrarianError, LibrarianResult, ReleaseError};
use crate::core::vcs::SourceControl;
use crate::release::branch::resolve_label;
use crate::release::version::{ReleaseVersion, has_prerelease, increment, remove_prerelease};
use crate::state::artifact::{Artifact, HistoryEntry, PendingRelease, ReleaseState};
use chrono::{DateTime, Utc};

/// What the user asked `prepare` for
#[derive(Debug, Clone, Default)]
pub struct ReleaseIntent<'a> {
  /// `--prerelease`; `Some("")` forces a stable release
  pub prerelease: Option<&'a str>,
  pub promote: bool,
  pub branch_rules: &'a [BranchPrerelease],
}

/// Where the release is cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
  pub commit: String,
  pub branch: String,
}

impl Checkout {
  pub fn current(git: &dyn SourceControl) -> LibrarianResult<Self> {
    Ok(Self {
      commit: git.head_commit()?,
      branch: git.current_branch()?,
    })
  }
}

fn release_state<'a>(artifact: &'a Artifact, path: &str) -> LibrarianResult<&'a ReleaseState> {
  artifact.release.as_ref().ok_or_else(|| {
    LibrarianError::Release(ReleaseError::NotConfigured {
      artifact: path.to_string(),
    })
  })
}

/// Compute the pending release `prepare` would record, without recording it
pub fn plan_prepare(
  artifact: &Artifact,
  path: &str,
  intent: &ReleaseIntent<'_>,
  checkout: &Checkout,
) -> LibrarianResult<PendingRelease> {
  let release = release_state(artifact, path)?;

  let version = if intent.promote {
    if release.is_unreleased() || !has_prerelease(&release.version) {
      return Err(LibrarianError::Release(ReleaseError::NothingToPromote {
        artifact: path.to_string(),
        version: release.version.clone(),
      }));
    }
    ReleaseVersion::parse(&release.version)?;
    remove_prerelease(&release.version)
  } else {
    let label = resolve_label(intent.prerelease, false, &checkout.branch, intent.branch_rules);
    increment(&release.version, &label)?
  };

  if release.has_released(&version) {
    return Err(LibrarianError::Release(ReleaseError::TagAlreadyReleased {
      artifact: path.to_string(),
      tag: version,
    }));
  }

  Ok(PendingRelease {
    tag: version.clone(),
    version,
    commit: checkout.commit.clone(),
    branch: checkout.branch.clone(),
  })
}

/// Record the next release as pending; a previous pending entry is replaced
pub fn prepare(
  artifact: &mut Artifact,
  path: &str,
  intent: &ReleaseIntent<'_>,
  checkout: &Checkout,
) -> LibrarianResult<PendingRelease> {
  let pending = plan_prepare(artifact, path, intent, checkout)?;
  if let Some(release) = artifact.release.as_mut() {
    release.pending = Some(pending.clone());
  }
  Ok(pending)
}

/// Name of the git tag for `version` of the artifact at `path`
///
/// `{name}` is the artifact path (empty for the repository root) and
/// `{version}` the released version.
pub fn render_tag(tag_format: Option<&str>, path: &str, version: &str) -> String {
  let name = if path == "." { "" } else { path };
  tag_format
    .unwrap_or(DEFAULT_TAG_FORMAT)
    .replace("{name}", name)
    .replace("{version}", version)
    .trim_start_matches('/')
    .to_string()
}

/// A tag transition that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPlan {
  pub pending: PendingRelease,
  /// Git tag name rendered from the artifact's tag format
  pub git_tag: String,
}

/// Check that the pending release can be tagged
pub fn plan_tag(artifact: &Artifact, path: &str) -> LibrarianResult<TagPlan> {
  let release = release_state(artifact, path)?;
  let pending = release.pending.clone().ok_or_else(|| {
    LibrarianError::Release(ReleaseError::NoPendingRelease {
      artifact: path.to_string(),
    })
  })?;

  if release.last_tag() == Some(pending.tag.as_str()) {
    return Err(LibrarianError::Release(ReleaseError::AlreadyTagged {
      artifact: path.to_string(),
      tag: pending.tag,
    }));
  }
  if release.has_released(&pending.tag) {
    return Err(LibrarianError::Release(ReleaseError::TagAlreadyReleased {
      artifact: path.to_string(),
      tag: pending.tag,
    }));
  }

  Ok(TagPlan {
    git_tag: render_tag(release.tag_format.as_deref(), path, &pending.tag),
    pending,
  })
}

/// Create the git tag for the pending release and move it into history
///
/// The artifact is only mutated after the tag exists. A tag already pointing
/// at the pending commit is left alone, so a run that tagged but failed to
/// save the state file can be repeated.
pub fn tag(artifact: &mut Artifact, path: &str, git: &dyn SourceControl, now: DateTime<Utc>) -> LibrarianResult<HistoryEntry> {
  let plan = plan_tag(artifact, path)?;
  if git.tag_commit(&plan.git_tag)?.as_deref() != Some(plan.pending.commit.as_str()) {
    let message = format!("Release {} {}", path, plan.pending.version);
    git.create_tag(&plan.git_tag, &plan.pending.commit, &message)?;
  }

  let entry = HistoryEntry {
    tag: plan.pending.tag.clone(),
    commit: plan.pending.commit,
    date: Some(now.to_rfc3339()),
  };

  if let Some(release) = artifact.release.as_mut() {
    release.history.push(entry.clone());
    release.version = plan.pending.tag;
    release.pending = None;
  }
  Ok(entry)
}
