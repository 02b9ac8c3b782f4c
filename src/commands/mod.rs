//! CLI commands for librarian
//!
//! ## Setup
//! - **init**: Create `.librarian/config.toml` for a repository
//! - **config**: Get, set and update repository configuration keys
//!
//! ## Artifacts
//! - **add**: Start tracking an artifact, deriving per-API settings
//! - **edit**: Change file rules and language metadata
//! - **remove**: Stop tracking an artifact
//! - **generate**: Sync artifact state with the repository config
//! - **status**: List tracked artifacts and their release state
//!
//! ## Releases
//! - **prepare**: Compute and record the next version
//! - **release**: Tag the pending version and move it into history
//!
//! All commands accept `&WorkspaceContext`.

pub mod add;
pub mod batch;
pub mod config;
pub mod edit;
pub mod generate;
pub mod init;
pub mod release;
pub mod remove;
pub mod status;

pub use add::{AddOptions, run_add};
pub use config::{run_config_get, run_config_set, run_config_update};
pub use edit::{EditOptions, run_edit};
pub use generate::run_generate;
pub use init::run_init;
pub use release::{PrepareOptions, run_prepare, run_release};
pub use remove::run_remove;
pub use status::run_status;
