//! Terminal output and progress indicators

pub mod output;
pub mod progress;
