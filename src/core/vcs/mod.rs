//! Source control collaborator
//!
//! Release commands only need three things from version control: the branch
//! being released from, the commit being released, and its release tags. The
//! trait keeps the release state machine testable without a real repository.

pub mod system_git;

pub use system_git::SystemGit;

use crate::core::error::LibrarianResult;

/// Synchronous source-control calls used by prepare/tag
pub trait SourceControl {
  /// Current branch name (`HEAD` when detached)
  fn current_branch(&self) -> LibrarianResult<String>;

  /// Commit id of HEAD
  fn head_commit(&self) -> LibrarianResult<String>;

  /// Create an annotated tag `name` at `commit`
  fn create_tag(&self, name: &str, commit: &str, message: &str) -> LibrarianResult<()>;

  /// Commit an existing tag `name` points at, `None` when there is no such tag
  fn tag_commit(&self, name: &str) -> LibrarianResult<Option<String>>;
}
