//! Terminal output for commands
//!
//! Status lines go to stdout, diagnostics to stderr. `--quiet` silences status
//! lines, `--verbose` (or `LIBRARIAN_VERBOSE=1`) adds context-tagged detail.
//! Warnings and errors are always shown.

use crate::core::error::LibrarianResult;
use serde::Serialize;

/// Environment variable that turns on verbose output
pub const VERBOSE_ENV: &str = "LIBRARIAN_VERBOSE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
  Quiet,
  #[default]
  Normal,
  Verbose,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
  verbosity: Verbosity,
}

impl Output {
  pub fn new(verbosity: Verbosity) -> Self {
    Self { verbosity }
  }

  /// Resolve from the global flags; `--quiet` beats `--verbose`
  pub fn from_flags(verbose: bool, quiet: bool) -> Self {
    let env_verbose = std::env::var(VERBOSE_ENV).is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let verbosity = if quiet {
      Verbosity::Quiet
    } else if verbose || env_verbose {
      Verbosity::Verbose
    } else {
      Verbosity::Normal
    };
    Self::new(verbosity)
  }

  pub fn is_quiet(&self) -> bool {
    self.verbosity == Verbosity::Quiet
  }

  pub fn is_verbose(&self) -> bool {
    self.verbosity == Verbosity::Verbose
  }

  /// Plain status line
  pub fn info(&self, message: &str) {
    if !self.is_quiet() {
      println!("{}", message);
    }
  }

  pub fn success(&self, message: &str) {
    if !self.is_quiet() {
      println!("✅ {}", message);
    }
  }

  pub fn warn(&self, message: &str) {
    eprintln!("⚠️  {}", message);
  }

  /// Per-artifact failure inside a batch
  pub fn failure(&self, path: &str, message: &str) {
    eprintln!("❌ {}: {}", path, message);
  }

  /// Debug detail, tagged with where it came from
  pub fn verbose(&self, context: &str, message: &str) {
    if self.is_verbose() {
      eprintln!("[verbose:{}] {}", context, message);
    }
  }

  /// Structured data as pretty JSON on stdout (shown even when quiet)
  pub fn data<T: Serialize>(&self, data: &T) -> LibrarianResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
  }
}
