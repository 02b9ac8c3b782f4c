//! Integration tests for the librarian binary

mod helpers;

mod test_artifacts;
mod test_config;
mod test_init;
mod test_release;
