//! Best-effort formatting of persisted documents
//!
//! After a command writes a document it asks an external formatter to tidy it.
//! The outcome is an [`Advisory`], reported next to the command's result but
//! never merged into it: a missing or failing formatter cannot fail a command.

use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Environment variable naming the formatter command (empty disables it)
pub const FORMATTER_ENV: &str = "LIBRARIAN_FORMATTER";

/// Formatter used when [`FORMATTER_ENV`] is not set
pub const DEFAULT_FORMATTER: &str = "taplo fmt";

/// Outcome of a non-fatal side step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
  /// The step ran and succeeded
  Applied,
  /// The step did not run (disabled or tool not installed)
  Skipped(String),
  /// The step ran and failed
  Failed(String),
}

/// Reformats a document in place
pub trait DocumentFormatter {
  fn format(&self, path: &Path) -> Advisory;
}

/// Runs an external program with the document path appended
pub struct CommandFormatter {
  program: Vec<String>,
}

impl CommandFormatter {
  /// Build from a shell-like command line (whitespace separated)
  pub fn new(command_line: &str) -> Self {
    Self {
      program: command_line.split_whitespace().map(str::to_string).collect(),
    }
  }

  /// Resolve from [`FORMATTER_ENV`], defaulting to [`DEFAULT_FORMATTER`]
  pub fn from_env() -> Self {
    match std::env::var(FORMATTER_ENV) {
      Ok(value) => Self::new(&value),
      Err(_) => Self::new(DEFAULT_FORMATTER),
    }
  }
}

impl DocumentFormatter for CommandFormatter {
  fn format(&self, path: &Path) -> Advisory {
    let Some((program, args)) = self.program.split_first() else {
      return Advisory::Skipped("formatter disabled".to_string());
    };

    match Command::new(program).args(args).arg(path).output() {
      Ok(output) if output.status.success() => Advisory::Applied,
      Ok(output) => Advisory::Failed(format!(
        "{} exited with {}: {}",
        self.program.join(" "),
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
      )),
      Err(e) if e.kind() == ErrorKind::NotFound => Advisory::Skipped(format!("{} is not installed", program)),
      Err(e) => Advisory::Failed(format!("failed to run {}: {}", program, e)),
    }
  }
}
