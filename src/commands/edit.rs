//! Edit command - file rules and language metadata of a tracked artifact

use crate::commands::batch::artifact_key;
use crate::core::config::Language;
use crate::core::context::WorkspaceContext;
use crate::core::error::{LibrarianError, LibrarianResult, StateError};
use crate::state::artifact::Artifact;
use crate::state::language::LanguageMetadata;

#[derive(Debug, Default)]
pub struct EditOptions {
  pub keep: Vec<String>,
  pub remove: Vec<String>,
  pub exclude: Vec<String>,
  /// `LANG:KEY=VALUE` assignments
  pub language: Vec<String>,
}

impl EditOptions {
  fn is_empty(&self) -> bool {
    self.keep.is_empty() && self.remove.is_empty() && self.exclude.is_empty() && self.language.is_empty()
  }
}

/// Run the edit command
pub fn run_edit(ctx: &WorkspaceContext, path: &str, options: &EditOptions) -> LibrarianResult<()> {
  let key = artifact_key(path)?;
  let config = ctx.load_config()?;
  let store = ctx.artifact_store();
  let artifact = store.load_existing(&key)?;

  if options.is_empty() {
    ctx.output.info(&format!("Nothing to edit for {}", key));
    return Ok(());
  }

  let artifact = apply_edit(artifact, config.language(), options)?;
  let doc = store.save(&key, &artifact)?;
  ctx.format_document(&doc);
  ctx.output.success(&format!("Updated {}", key));
  Ok(())
}

pub(crate) fn apply_edit(mut artifact: Artifact, language: Language, options: &EditOptions) -> LibrarianResult<Artifact> {
  let mut metadata = Vec::with_capacity(options.language.len());
  for input in &options.language {
    let invalid = |reason: String| {
      LibrarianError::State(StateError::InvalidLanguageMetadata {
        input: input.clone(),
        reason,
      })
    };
    let parsed = LanguageMetadata::parse(input).map_err(invalid)?;
    if parsed.language() != language {
      return Err(invalid(format!(
        "repository language is {}, cannot set {} metadata",
        language,
        parsed.language()
      )));
    }
    metadata.push(parsed);
  }

  let files = artifact.files.get_or_insert_with(Default::default);
  files.keep.extend(options.keep.iter().cloned());
  files.remove.extend(options.remove.iter().cloned());
  files.exclude.extend(options.exclude.iter().cloned());

  let section = artifact.language.get_or_insert_with(Default::default);
  for entry in metadata {
    section.set(language, entry).map_err(|reason| {
      LibrarianError::State(StateError::InvalidLanguageMetadata {
        input: options.language.join(", "),
        reason,
      })
    })?;
  }

  Ok(artifact.normalized())
}
