use crate::core::config::RepositoryConfig;
use crate::state::artifact::{Artifact, GenerateState};

/// Copy repository-level settings into an artifact's mirrors
///
/// Generated artifacts get the current toolchain version, container image and
/// source refs. Per-API settings under `generate.apis` and the per-artifact
/// `output` are left alone. Artifacts with a `[release]` section get the
/// current tag format. Applying this twice yields the same artifact.
pub fn sync(config: &RepositoryConfig, artifact: &Artifact) -> Artifact {
  let mut next = artifact.clone();
  let repo_generate = config.generate.as_ref();

  if let Some(generate) = next.generate.as_mut() {
    generate.toolchain_version = config.librarian.version.clone();
    generate.container = repo_generate.and_then(|g| g.container.clone());
    generate.googleapis = repo_generate.and_then(|g| g.googleapis.clone());
    generate.discovery = repo_generate.and_then(|g| g.discovery.clone());
  }

  if let Some(release) = next.release.as_mut() {
    release.tag_format = config.tag_format().map(str::to_string);
  }

  next
}

/// Generation state for a newly added artifact, before its first sync
pub fn initial_state(config: &RepositoryConfig, path: &str) -> GenerateState {
  let output = config
    .generate
    .as_ref()
    .and_then(|g| g.output_dir.as_deref())
    .map(|dir| {
      let dir = dir.trim_end_matches('/');
      if path == "." { dir.to_string() } else { format!("{}/{}", dir, path) }
    })
    .unwrap_or_default();

  GenerateState {
    output,
    ..Default::default()
  }
}
