//! Generation state: repository-wide propagation and per-API derivation
//!
//! Running the generator itself is left to the container named in the
//! repository config. This module only keeps each artifact's record of what it
//! is generated from up to date.

pub mod derive;
pub mod propagate;

pub use derive::{BuildRuleSource, DirectorySource, derive_api_config};
pub use propagate::{initial_state, sync};
