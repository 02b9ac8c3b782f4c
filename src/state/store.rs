use crate::core::config::CONFIG_DIR;
use crate::core::error::{LibrarianError, LibrarianResult, ResultExt, StateError};
use crate::state::artifact::Artifact;
use crate::utils::path_to_key;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// State document name inside each artifact directory
pub const STATE_FILE: &str = ".librarian.toml";

/// Directories never searched for state documents
const SKIPPED_DIRS: &[&str] = &[".git", CONFIG_DIR];

/// Loads and saves `.librarian.toml` documents below a repository root
///
/// Artifact paths are keys produced by
/// [`normalize_artifact_path`](crate::utils::normalize_artifact_path).
#[derive(Debug, Clone)]
pub struct ArtifactStore {
  root: PathBuf,
}

impl ArtifactStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Location of the state document for `path`
  pub fn document_path(&self, path: &str) -> PathBuf {
    if path == "." {
      self.root.join(STATE_FILE)
    } else {
      self.root.join(path).join(STATE_FILE)
    }
  }

  pub fn exists(&self, path: &str) -> bool {
    self.document_path(path).is_file()
  }

  /// Load the artifact at `path`; an untracked path yields an empty artifact
  pub fn load(&self, path: &str) -> LibrarianResult<Artifact> {
    let doc = self.document_path(path);
    match fs::read_to_string(&doc) {
      Ok(content) => parse_document(&doc, &content),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Artifact::default()),
      Err(e) => Err(LibrarianError::from(e).context(format!("Failed to read {}", doc.display()))),
    }
  }

  /// Load the artifact at `path`, requiring that it is tracked
  pub fn load_existing(&self, path: &str) -> LibrarianResult<Artifact> {
    if !self.exists(path) {
      return Err(LibrarianError::State(StateError::ArtifactNotFound {
        path: path.to_string(),
      }));
    }
    self.load(path)
  }

  /// Overwrite the document at `path` with the normalized `artifact`
  pub fn save(&self, path: &str, artifact: &Artifact) -> LibrarianResult<PathBuf> {
    let doc = self.document_path(path);
    let content = toml_edit::ser::to_string_pretty(&artifact.clone().normalized())
      .with_context(|| format!("Failed to serialize state for {}", path))?;

    if let Some(dir) = doc.parent() {
      fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(&doc, content).with_context(|| format!("Failed to write {}", doc.display()))?;
    Ok(doc)
  }

  /// Delete the document at `path`; an untracked path is not an error
  pub fn remove(&self, path: &str) -> LibrarianResult<bool> {
    let doc = self.document_path(path);
    match fs::remove_file(&doc) {
      Ok(()) => Ok(true),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
      Err(e) => Err(LibrarianError::from(e).context(format!("Failed to remove {}", doc.display()))),
    }
  }

  /// Scan the tree for every state document and load each one
  ///
  /// Keys are the documents' directories relative to the root. Iteration
  /// order of the returned map is unspecified; sort when output must be stable.
  pub fn load_all(&self) -> LibrarianResult<HashMap<String, Artifact>> {
    let mut artifacts = HashMap::new();

    let walker = WalkDir::new(&self.root).into_iter().filter_entry(|e| {
      let name = e.file_name().to_string_lossy();
      e.depth() == 0 || !(e.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
    });

    for entry in walker {
      let entry = entry.map_err(|e| {
        LibrarianError::State(StateError::Scan {
          path: e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone()),
          message: e.to_string(),
        })
      })?;

      if !entry.file_type().is_file() || entry.file_name() != STATE_FILE {
        continue;
      }

      let doc = entry.path();
      let dir = doc.parent().unwrap_or(&self.root);
      let relative = dir.strip_prefix(&self.root).unwrap_or(dir);
      let content = fs::read_to_string(doc).map_err(|e| {
        LibrarianError::State(StateError::Scan {
          path: doc.to_path_buf(),
          message: e.to_string(),
        })
      })?;

      artifacts.insert(path_to_key(relative), parse_document(doc, &content)?);
    }

    Ok(artifacts)
  }
}

fn parse_document(doc: &Path, content: &str) -> LibrarianResult<Artifact> {
  toml_edit::de::from_str(content).map_err(|e| {
    LibrarianError::State(StateError::Parse {
      path: doc.to_path_buf(),
      message: e.to_string(),
    })
  })
}
