//! Release versioning and the prepare -> tag state machine
//!
//! # States
//!
//! An artifact with a `[release]` section moves through:
//!
//! 1. **Unreleased**: `version = "unreleased"`, no pending release
//! 2. **Pending**: `prepare` computed the next version and recorded it with the
//!    commit and branch it was cut from
//! 3. **Released**: `release` created the git tag, appended the pending entry to
//!    history and made it the current version
//!
//! `prepare` may run any number of times before tagging; the last one wins.
//! History is append-only and a version never appears in it twice.

pub mod branch;
pub mod machine;
pub mod version;

pub use machine::{Checkout, ReleaseIntent, plan_prepare, plan_tag, prepare, tag};
