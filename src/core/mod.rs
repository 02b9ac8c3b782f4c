//! Core engine for librarian operations
//!
//! - **config**: Repository configuration (`.librarian/config.toml`) and its store
//! - **context**: Repository context shared by all commands
//! - **error**: Error types with contextual help messages and exit codes
//! - **format**: Best-effort document formatting
//! - **keys**: Dot-path key schema for `config get|set`
//! - **remote**: Remote repository metadata and auth tokens
//! - **vcs**: Source control abstraction (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod keys;
pub mod remote;
pub mod vcs;
