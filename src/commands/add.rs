//! Add command - start tracking an artifact
//!
//! Adding an already tracked artifact appends new API paths and keeps
//! everything else; API order is generation order and is never reshuffled.

use crate::commands::batch::artifact_key;
use crate::core::config::RepositoryConfig;
use crate::core::context::WorkspaceContext;
use crate::core::error::{LibrarianError, LibrarianResult};
use crate::generate::{BuildRuleSource, DirectorySource, derive_api_config, initial_state, sync};
use crate::state::artifact::{ApiConfig, Artifact, ReleaseState};
use crate::utils::is_local_path;
use std::path::{Path, PathBuf};

pub struct AddOptions {
  /// API definition paths, e.g. `google/cloud/kms/v1`
  pub apis: Vec<String>,
  /// Checkout of the API definitions holding `BUILD.bazel` files
  pub source_root: Option<PathBuf>,
  /// Track the artifact without a `[release]` section
  pub no_release: bool,
}

/// Run the add command
pub fn run_add(ctx: &WorkspaceContext, path: &str, options: &AddOptions) -> LibrarianResult<()> {
  let key = artifact_key(path)?;
  let config = ctx.load_config()?;
  let store = ctx.artifact_store();
  let existed = store.exists(&key);

  let source_root = options.source_root.clone().or_else(|| local_googleapis(&config, &ctx.root));
  if !options.apis.is_empty() && source_root.is_none() {
    ctx.output.warn("No local API definitions (pass --source-root); API settings are left empty");
  }
  let source = source_root.map(DirectorySource::new);

  let artifact = add_to_artifact(
    &config,
    &key,
    store.load(&key)?,
    &options.apis,
    source.as_ref().map(|s| s as &dyn BuildRuleSource),
    !options.no_release,
  )?;

  let doc = store.save(&key, &artifact)?;
  ctx.format_document(&doc);

  let apis = artifact.generate.as_ref().map_or(0, |g| g.apis.len());
  let verb = if existed { "Updated" } else { "Added" };
  ctx.output.success(&format!("{} {} ({} API(s))", verb, key, apis));
  Ok(())
}

/// `generate.googleapis.repo` when it points at a local checkout
fn local_googleapis(config: &RepositoryConfig, root: &Path) -> Option<PathBuf> {
  let repo = &config.generate.as_ref()?.googleapis.as_ref()?.repo;
  is_local_path(repo).then(|| root.join(repo))
}

/// Fold new API paths and a release section into `artifact`, then sync it
pub(crate) fn add_to_artifact(
  config: &RepositoryConfig,
  key: &str,
  mut artifact: Artifact,
  apis: &[String],
  source: Option<&dyn BuildRuleSource>,
  with_release: bool,
) -> LibrarianResult<Artifact> {
  if !apis.is_empty() {
    if !config.language().generates() {
      return Err(LibrarianError::with_help(
        format!("Cannot add APIs to {}: repository language is 'none'", key),
        "Release-only repositories track handwritten artifacts; omit the API paths.",
      ));
    }

    let generate = artifact.generate.get_or_insert_with(|| initial_state(config, key));
    for api_path in apis {
      let api_path = api_path.trim_matches('/');
      if generate.apis.iter().any(|a| a.path == api_path) {
        continue;
      }
      let derived = match source {
        Some(source) => derive_api_config(source, api_path, config.language())?,
        None => None,
      };
      generate.apis.push(derived.unwrap_or_else(|| ApiConfig::bare(api_path)));
    }
  }

  if with_release && artifact.release.is_none() {
    artifact.release = Some(ReleaseState::default());
  }

  Ok(sync(config, &artifact))
}
