//! Per-artifact state: document model, language metadata and the store

pub mod artifact;
pub mod language;
pub mod store;
