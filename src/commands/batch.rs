//! Target selection and `--all` batch execution shared by commands
//!
//! A batch walks artifacts in path order and persists each one on its own. A
//! failure is reported with the artifact path and the walk continues; the
//! command fails at the end if anything failed.

use crate::core::context::WorkspaceContext;
use crate::core::error::{LibrarianError, LibrarianResult, StateError};
use crate::state::artifact::Artifact;
use crate::ui::progress::BatchProgress;
use crate::utils::normalize_artifact_path;
use std::collections::BTreeMap;

/// Which artifacts a command applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
  One(String),
  All,
}

impl Target {
  pub fn select(path: Option<&str>, all: bool) -> LibrarianResult<Self> {
    match (path, all) {
      (Some(_), true) => Err(LibrarianError::message(
        "Specify either an artifact path or --all, not both",
      )),
      (Some(path), false) => Ok(Target::One(artifact_key(path)?)),
      (None, true) => Ok(Target::All),
      (None, false) => Err(LibrarianError::with_help(
        "Must specify an artifact path or use --all",
        "Run `librarian status` to list tracked artifacts.",
      )),
    }
  }
}

/// Normalize a user-supplied artifact path into its store key
pub fn artifact_key(path: &str) -> LibrarianResult<String> {
  normalize_artifact_path(path).map_err(|reason| {
    LibrarianError::State(StateError::InvalidPath {
      path: path.to_string(),
      reason,
    })
  })
}

/// Result of one artifact in a batch that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The artifact was updated; the message is shown with `--verbose`
  Done(String),
  /// Nothing to do; grouped by reason in the summary
  Skipped(&'static str),
}

#[derive(Debug, Default)]
pub struct BatchReport {
  pub done: usize,
  pub skipped: BTreeMap<&'static str, usize>,
  pub failed: Vec<String>,
}

impl BatchReport {
  /// One summary line, e.g. `tagged: 2, no pending: 1, failed: 0`
  pub fn summary(&self, done_label: &str) -> String {
    let mut parts = vec![format!("{}: {}", done_label, self.done)];
    parts.extend(self.skipped.iter().map(|(reason, n)| format!("{}: {}", reason, n)));
    parts.push(format!("failed: {}", self.failed.len()));
    parts.join(", ")
  }

  /// Print the summary and turn any failure into the command's error
  pub fn finish(self, ctx: &WorkspaceContext, done_label: &str) -> LibrarianResult<()> {
    let summary = self.summary(done_label);
    if self.failed.is_empty() {
      ctx.output.success(&summary);
      return Ok(());
    }

    ctx.output.info(&summary);
    Err(LibrarianError::with_help(
      format!("{} artifact(s) failed: {}", self.failed.len(), self.failed.join(", ")),
      "Fix the reported artifacts and re-run; completed artifacts were already saved.",
    ))
  }
}

/// Run `step` for every artifact, in path order
///
/// `step` owns loading-to-saving for its artifact. Errors are caught here,
/// reported as `<path>: <message>` and counted.
pub fn run_batch<F>(
  ctx: &WorkspaceContext,
  label: &str,
  artifacts: BTreeMap<String, Artifact>,
  mut step: F,
) -> BatchReport
where
  F: FnMut(&str, Artifact) -> LibrarianResult<Outcome>,
{
  let mut report = BatchReport::default();
  let mut progress = BatchProgress::new(artifacts.len(), label, &ctx.output);

  for (path, artifact) in artifacts {
    match step(&path, artifact) {
      Ok(Outcome::Done(message)) => {
        ctx.output.verbose(label, &format!("{}: {}", path, message));
        report.done += 1;
      }
      Ok(Outcome::Skipped(reason)) => {
        ctx.output.verbose(label, &format!("{}: {}", path, reason));
        *report.skipped.entry(reason).or_default() += 1;
      }
      Err(e) => {
        ctx.output.failure(&path, &e.to_string());
        report.failed.push(path);
      }
    }
    progress.inc();
  }

  report
}

/// Every tracked artifact, keyed and ordered by path
pub fn all_artifacts(ctx: &WorkspaceContext) -> LibrarianResult<BTreeMap<String, Artifact>> {
  Ok(ctx.artifact_store().load_all()?.into_iter().collect())
}
