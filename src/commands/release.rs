//! Release commands - `prepare` computes the next version, `release` tags it
//!
//! Both sync the artifact with the repository config first, so the tag format
//! used is always the current one.

use crate::commands::batch::{Outcome, Target, all_artifacts, run_batch};
use crate::core::config::RepositoryConfig;
use crate::core::context::WorkspaceContext;
use crate::core::error::{LibrarianError, LibrarianResult, ReleaseError};
use crate::generate::sync;
use crate::release::{Checkout, ReleaseIntent, plan_prepare, plan_tag, prepare, tag};
use crate::state::artifact::Artifact;
use chrono::Utc;

pub struct PrepareOptions {
  pub prerelease: Option<String>,
  pub promote: bool,
  pub dry_run: bool,
}

/// Run the prepare command
pub fn run_prepare(ctx: &WorkspaceContext, path: Option<&str>, all: bool, options: &PrepareOptions) -> LibrarianResult<()> {
  let target = Target::select(path, all)?;
  let config = ctx.load_config()?;
  let checkout = Checkout::current(ctx.git.as_ref())?;
  ctx
    .output
    .verbose("prepare", &format!("cutting from {} at {}", checkout.branch, checkout.commit));

  let intent = ReleaseIntent {
    prerelease: options.prerelease.as_deref(),
    promote: options.promote,
    branch_rules: config.branch_rules(),
  };

  match target {
    Target::One(key) => {
      let artifact = ctx.artifact_store().load_existing(&key)?;
      let message = prepare_one(ctx, &config, &key, artifact, &intent, &checkout, options.dry_run)?;
      ctx.output.success(&message);
      Ok(())
    }
    Target::All => {
      let report = run_batch(ctx, "prepare", all_artifacts(ctx)?, |key, artifact| {
        match prepare_one(ctx, &config, key, artifact, &intent, &checkout, options.dry_run) {
          Ok(message) => Ok(Outcome::Done(message)),
          Err(e) => match e.root() {
            LibrarianError::Release(ReleaseError::NotConfigured { .. }) => Ok(Outcome::Skipped("not configured")),
            LibrarianError::Release(ReleaseError::NothingToPromote { .. }) => Ok(Outcome::Skipped("nothing to promote")),
            _ => Err(e),
          },
        }
      });
      report.finish(ctx, if options.dry_run { "would prepare" } else { "prepared" })
    }
  }
}

fn prepare_one(
  ctx: &WorkspaceContext,
  config: &RepositoryConfig,
  key: &str,
  artifact: Artifact,
  intent: &ReleaseIntent<'_>,
  checkout: &Checkout,
  dry_run: bool,
) -> LibrarianResult<String> {
  let mut artifact = sync(config, &artifact);
  let current = artifact
    .release
    .as_ref()
    .map(|r| r.version.clone())
    .unwrap_or_default();

  if dry_run {
    let pending = plan_prepare(&artifact, key, intent, checkout)?;
    return Ok(format!("{}: {} → {} (dry run)", key, current, pending.version));
  }

  let pending = prepare(&mut artifact, key, intent, checkout)?;
  let doc = ctx.artifact_store().save(key, &artifact)?;
  ctx.format_document(&doc);
  Ok(format!("{}: {} → {} (pending)", key, current, pending.version))
}

/// Run the release command
pub fn run_release(ctx: &WorkspaceContext, path: Option<&str>, all: bool, dry_run: bool) -> LibrarianResult<()> {
  let target = Target::select(path, all)?;
  let config = ctx.load_config()?;

  match target {
    Target::One(key) => {
      let artifact = ctx.artifact_store().load_existing(&key)?;
      match tag_one(ctx, &config, &key, artifact, dry_run) {
        Ok(message) => {
          ctx.output.success(&message);
          Ok(())
        }
        Err(e) if matches!(e.root(), LibrarianError::Release(r) if r.is_benign()) => {
          ctx.output.warn(&format!("{} (nothing to do)", e.root()));
          Ok(())
        }
        Err(e) => Err(e),
      }
    }
    Target::All => {
      let report = run_batch(ctx, "release", all_artifacts(ctx)?, |key, artifact| {
        match tag_one(ctx, &config, key, artifact, dry_run) {
          Ok(message) => Ok(Outcome::Done(message)),
          Err(e) => match e.root() {
            LibrarianError::Release(ReleaseError::NoPendingRelease { .. }) => Ok(Outcome::Skipped("no pending")),
            LibrarianError::Release(ReleaseError::NotConfigured { .. }) => Ok(Outcome::Skipped("not configured")),
            LibrarianError::Release(ReleaseError::AlreadyTagged { .. }) => Ok(Outcome::Skipped("already tagged")),
            _ => Err(e),
          },
        }
      });
      report.finish(ctx, if dry_run { "would tag" } else { "tagged" })
    }
  }
}

fn tag_one(
  ctx: &WorkspaceContext,
  config: &RepositoryConfig,
  key: &str,
  artifact: Artifact,
  dry_run: bool,
) -> LibrarianResult<String> {
  let mut artifact = sync(config, &artifact);

  if dry_run {
    let plan = plan_tag(&artifact, key)?;
    return Ok(format!(
      "{}: would tag {} at {} (dry run)",
      key, plan.git_tag, plan.pending.commit
    ));
  }

  let entry = tag(&mut artifact, key, ctx.git.as_ref(), Utc::now())?;
  let doc = ctx.artifact_store().save(key, &artifact)?;
  ctx.format_document(&doc);
  Ok(format!("{}: released {} at {}", key, entry.tag, entry.commit))
}
