//! Config commands - get, set and update the repository configuration

use crate::commands::batch::{Outcome, all_artifacts, run_batch};
use crate::core::config::SourceRef;
use crate::core::context::WorkspaceContext;
use crate::core::error::{LibrarianResult, ResultExt};
use crate::core::keys;
use crate::generate::sync;

/// Print one key, or the whole schema with current values
pub fn run_config_get(ctx: &WorkspaceContext, key: Option<&str>) -> LibrarianResult<()> {
  let config = ctx.load_config()?;

  match key {
    Some(key) => println!("{}", keys::get(&config, key)?),
    None => {
      for entry in keys::schema() {
        let value = keys::get(&config, entry.path)?;
        println!("{} = {:?}", entry.path, value);
        ctx.output.verbose("config", &format!("{}: {}", entry.path, entry.description));
      }
    }
  }
  Ok(())
}

pub fn run_config_set(ctx: &WorkspaceContext, key: &str, value: &str) -> LibrarianResult<()> {
  let store = ctx.config_store();
  let config = store.load()?;
  let updated = keys::set(&config, key, value)?;

  let path = store.save(&updated)?;
  ctx.format_document(&path);
  ctx.output.success(&format!("Set {} = {:?}", key, value));
  Ok(())
}

/// Pin every configured source to the head of its default branch
///
/// With `all`, the new refs are then propagated into every artifact.
pub fn run_config_update(ctx: &WorkspaceContext, all: bool) -> LibrarianResult<()> {
  let store = ctx.config_store();
  let mut config = store.load()?;

  let Some(generate) = config.generate.as_mut() else {
    ctx.output.info("Nothing to update: repository has no [generate] section");
    return Ok(());
  };

  for (name, source) in [("googleapis", &mut generate.googleapis), ("discovery", &mut generate.discovery)] {
    let Some(source) = source.as_mut().filter(|s| !s.repo.is_empty()) else {
      continue;
    };
    let latest = latest_ref(ctx, source).with_context(|| format!("Failed to update generate.{}", name))?;
    if latest == source.reference {
      ctx.output.info(&format!("   {}: up to date ({})", name, short(&latest)));
    } else {
      ctx.output.info(&format!(
        "   {}: {} → {}",
        name,
        if source.reference.is_empty() { "(unset)" } else { short(&source.reference) },
        short(&latest)
      ));
      source.reference = latest;
    }
  }

  let path = store.save(&config)?;
  ctx.format_document(&path);
  ctx.output.success(&format!("Updated {}", path.display()));

  if !all {
    return Ok(());
  }

  let artifact_store = ctx.artifact_store();
  let report = run_batch(ctx, "sync", all_artifacts(ctx)?, |path, artifact| {
    let synced = sync(&config, &artifact);
    if synced == artifact {
      return Ok(Outcome::Skipped("unchanged"));
    }
    let doc = artifact_store.save(path, &synced)?;
    ctx.format_document(&doc);
    Ok(Outcome::Done("synced".to_string()))
  });
  report.finish(ctx, "synced")
}

fn latest_ref(ctx: &WorkspaceContext, source: &SourceRef) -> LibrarianResult<String> {
  let branch = ctx.remote.default_branch(&source.repo)?;
  ctx.output.verbose("update", &format!("{} default branch is {}", source.repo, branch));
  ctx.remote.latest_commit(&source.repo, &branch)
}

fn short(sha: &str) -> &str {
  sha.get(..12).unwrap_or(sha)
}
