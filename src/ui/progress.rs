//! Progress bar for `--all` batches
//!
//! Uses `linya`, drawn on stderr, and only when stderr is a terminal so piped
//! and captured output stays clean. `--verbose` prints one line per artifact
//! instead.

use crate::ui::output::Output;
use linya::{Bar, Progress};
use std::io::IsTerminal;

/// One bar counting artifacts processed by a batch
pub struct BatchProgress {
  inner: Option<(Progress, Bar)>,
}

impl BatchProgress {
  pub fn new(total: usize, label: impl Into<String>, output: &Output) -> Self {
    let visible = total > 1 && !output.is_quiet() && !output.is_verbose() && std::io::stderr().is_terminal();
    let inner = visible.then(|| {
      let mut progress = Progress::new();
      let bar = progress.bar(total, label.into());
      (progress, bar)
    });
    Self { inner }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    if let Some((progress, bar)) = self.inner.as_mut() {
      progress.inc_and_draw(bar, 1);
    }
  }
}
