//! Dot-path access to repository configuration fields
//!
//! `librarian config get|set <key>` resolves keys against a fixed table of
//! typed getter/setter pairs. Key names mirror the TOML layout of
//! `.librarian/config.toml` and are part of the on-disk contract.

use crate::core::config::{ContainerImage, GenerateConfig, Language, ReleaseConfig, RepositoryConfig, SourceRef};
use crate::core::error::{ConfigError, LibrarianError, LibrarianResult};

type Getter = fn(&RepositoryConfig) -> String;
type Setter = fn(&mut RepositoryConfig, &str) -> Result<(), String>;

/// One entry of the config key schema
pub struct ConfigKey {
  pub path: &'static str,
  pub description: &'static str,
  get: Getter,
  set: Setter,
}

static KEYS: &[ConfigKey] = &[
  ConfigKey {
    path: "librarian.version",
    description: "Version of librarian managing this repository",
    get: |c| c.librarian.version.clone(),
    set: |c, v| {
      semver::Version::parse(v).map_err(|e| format!("must be valid semver: {}", e))?;
      c.librarian.version = v.to_string();
      Ok(())
    },
  },
  ConfigKey {
    path: "librarian.language",
    description: "Target language (go, python, rust, dart, none)",
    get: |c| c.librarian.language.to_string(),
    set: |c, v| {
      let language: Language = v.parse()?;
      // Release-only repositories carry no [generate] section
      if !language.generates() {
        c.generate = None;
      }
      c.librarian.language = language;
      Ok(())
    },
  },
  ConfigKey {
    path: "generate.output_dir",
    description: "Directory generated code is written to",
    get: |c| generate(c).and_then(|g| g.output_dir.clone()).unwrap_or_default(),
    set: |c, v| {
      generate_mut(c)?.output_dir = non_empty(v);
      Ok(())
    },
  },
  ConfigKey {
    path: "generate.container.image",
    description: "Generator container image",
    get: |c| container(c).map(|i| i.image.clone()).unwrap_or_default(),
    set: |c, v| {
      container_mut(c)?.image = v.to_string();
      Ok(())
    },
  },
  ConfigKey {
    path: "generate.container.tag",
    description: "Generator container tag",
    get: |c| container(c).map(|i| i.tag.clone()).unwrap_or_default(),
    set: |c, v| {
      container_mut(c)?.tag = v.to_string();
      Ok(())
    },
  },
  ConfigKey {
    path: "generate.googleapis.repo",
    description: "Repository holding API definitions",
    get: |c| generate(c).and_then(|g| g.googleapis.as_ref()).map(|s| s.repo.clone()).unwrap_or_default(),
    set: |c, v| {
      generate_mut(c)?.googleapis.get_or_insert_with(SourceRef::default).repo = v.to_string();
      Ok(())
    },
  },
  ConfigKey {
    path: "generate.googleapis.ref",
    description: "Pinned commit of the API definitions",
    get: |c| generate(c).and_then(|g| g.googleapis.as_ref()).map(|s| s.reference.clone()).unwrap_or_default(),
    set: |c, v| {
      generate_mut(c)?.googleapis.get_or_insert_with(SourceRef::default).reference = v.to_string();
      Ok(())
    },
  },
  ConfigKey {
    path: "generate.discovery.repo",
    description: "Repository holding discovery documents",
    get: |c| generate(c).and_then(|g| g.discovery.as_ref()).map(|s| s.repo.clone()).unwrap_or_default(),
    set: |c, v| {
      generate_mut(c)?.discovery.get_or_insert_with(SourceRef::default).repo = v.to_string();
      Ok(())
    },
  },
  ConfigKey {
    path: "generate.discovery.ref",
    description: "Pinned commit of the discovery documents",
    get: |c| generate(c).and_then(|g| g.discovery.as_ref()).map(|s| s.reference.clone()).unwrap_or_default(),
    set: |c, v| {
      generate_mut(c)?.discovery.get_or_insert_with(SourceRef::default).reference = v.to_string();
      Ok(())
    },
  },
  ConfigKey {
    path: "release.tag_format",
    description: "Release tag template ({name}, {version})",
    get: |c| c.release.as_ref().and_then(|r| r.tag_format.clone()).unwrap_or_default(),
    set: |c, v| {
      if !v.is_empty() && !v.contains("{version}") {
        return Err("tag format must contain {version}".to_string());
      }
      c.release.get_or_insert_with(ReleaseConfig::default).tag_format = non_empty(v);
      Ok(())
    },
  },
  ConfigKey {
    path: "release.remote",
    description: "Remote release tags are pushed to",
    get: |c| c.release.as_ref().and_then(|r| r.remote.clone()).unwrap_or_default(),
    set: |c, v| {
      c.release.get_or_insert_with(ReleaseConfig::default).remote = non_empty(v);
      Ok(())
    },
  },
];

fn generate(config: &RepositoryConfig) -> Option<&GenerateConfig> {
  config.generate.as_ref()
}

fn container(config: &RepositoryConfig) -> Option<&ContainerImage> {
  generate(config).and_then(|g| g.container.as_ref())
}

fn generate_mut(config: &mut RepositoryConfig) -> Result<&mut GenerateConfig, String> {
  if !config.librarian.language.generates() {
    return Err("generation settings are not allowed when librarian.language is 'none'".to_string());
  }
  Ok(config.generate.get_or_insert_with(GenerateConfig::default))
}

fn container_mut(config: &mut RepositoryConfig) -> Result<&mut ContainerImage, String> {
  Ok(generate_mut(config)?.container.get_or_insert_with(ContainerImage::default))
}

fn non_empty(value: &str) -> Option<String> {
  (!value.is_empty()).then(|| value.to_string())
}

/// All known key paths, in schema order
pub fn key_paths() -> impl Iterator<Item = &'static str> {
  KEYS.iter().map(|k| k.path)
}

/// All schema entries, in schema order
pub fn schema() -> &'static [ConfigKey] {
  KEYS
}

fn lookup(key: &str) -> LibrarianResult<&'static ConfigKey> {
  KEYS
    .iter()
    .find(|k| k.path == key)
    .ok_or_else(|| LibrarianError::Config(ConfigError::UnknownKey { key: key.to_string() }))
}

/// Read a key; valid-but-unset optional fields read as the empty string
pub fn get(config: &RepositoryConfig, key: &str) -> LibrarianResult<String> {
  Ok((lookup(key)?.get)(config))
}

/// Return a copy of `config` with `key` set to `value`
pub fn set(config: &RepositoryConfig, key: &str, value: &str) -> LibrarianResult<RepositoryConfig> {
  let entry = lookup(key)?;
  let mut updated = config.clone();
  (entry.set)(&mut updated, value).map_err(|reason| {
    LibrarianError::Config(ConfigError::InvalidValue {
      key: key.to_string(),
      value: value.to_string(),
      reason,
    })
  })?;
  Ok(updated)
}
