//! Remove command - stop tracking an artifact

use crate::commands::batch::artifact_key;
use crate::core::context::WorkspaceContext;
use crate::core::error::LibrarianResult;

/// Delete the artifact's state document; untracked paths succeed too
pub fn run_remove(ctx: &WorkspaceContext, path: &str) -> LibrarianResult<()> {
  let key = artifact_key(path)?;
  if ctx.artifact_store().remove(&key)? {
    ctx.output.success(&format!("Removed {}", key));
  } else {
    ctx.output.info(&format!("{} is not tracked, nothing to remove", key));
  }
  Ok(())
}
