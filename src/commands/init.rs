//! Init command - create `.librarian/config.toml`

use crate::core::config::{Language, RepositoryConfig};
use crate::core::context::WorkspaceContext;
use crate::core::error::{ConfigError, LibrarianError, LibrarianResult};

/// Run the init command
pub fn run_init(ctx: &WorkspaceContext, language: Language, force: bool) -> LibrarianResult<()> {
  let store = ctx.config_store();
  if store.exists() && !force {
    return Err(LibrarianError::Config(ConfigError::AlreadyInitialized { path: store.path() }));
  }

  let config = RepositoryConfig::new(language);
  let path = store.save(&config)?;
  ctx.format_document(&path);

  ctx.output.success(&format!("Initialized {} repository at {}", language, path.display()));
  if language.generates() {
    ctx.output.info("   Pin API sources with: librarian config update");
  } else {
    ctx.output.info("   Release-only repository (nothing is generated)");
  }
  ctx.output.info("   Track an artifact with: librarian add <path>");
  Ok(())
}
