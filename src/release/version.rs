//! Version algebra for release preparation
//!
//! Versions look like `v?MAJOR.MINOR.PATCH(-LABEL.N)?`. The optional `v` prefix
//! is carried through unchanged, and `unreleased` stands for "never shipped".
//!
//! Transitions for `increment(previous, label)`, first match wins:
//!
//! | previous            | label   | result               |
//! |---------------------|---------|----------------------|
//! | `unreleased`        | `""`    | `v0.1.0`             |
//! | `unreleased`        | `rc`    | `v0.1.0-rc.1`        |
//! | `v1.1.0-rc.1`       | `rc`    | `v1.1.0-rc.2`        |
//! | `v1.0.0`, `v1.1.0-beta.2` | `rc` | bump minor, `-rc.1` |
//! | `v1.1.0-rc.2`       | `""`    | `v1.1.0` (promotion) |
//! | `v1.0.0`            | `""`    | `v1.1.0`             |

use crate::core::error::{LibrarianResult, VersionError};
use crate::state::artifact::UNRELEASED;
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;

/// A parsed release version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
  v_prefix: bool,
  version: Version,
}

impl ReleaseVersion {
  pub fn parse(input: &str) -> LibrarianResult<Self> {
    let invalid = || VersionError::InvalidFormat {
      version: input.to_string(),
    };

    let (v_prefix, rest) = match input.strip_prefix('v') {
      Some(rest) => (true, rest),
      None => (false, input),
    };
    let version = Version::parse(rest).map_err(|_| invalid())?;
    if !version.build.is_empty() {
      return Err(invalid().into());
    }

    let parsed = Self { v_prefix, version };
    if !parsed.version.pre.is_empty() && parsed.prerelease().is_none() {
      return Err(invalid().into());
    }
    Ok(parsed)
  }

  /// `(label, counter)` of a `-LABEL.N` suffix
  pub fn prerelease(&self) -> Option<(&str, u64)> {
    let (label, counter) = self.version.pre.as_str().split_once('.')?;
    if label.is_empty() || counter.is_empty() || !counter.bytes().all(|b| b.is_ascii_digit()) {
      return None;
    }
    Some((label, counter.parse().ok()?))
  }

  fn with_prerelease(&self, label: &str, counter: u64) -> LibrarianResult<Self> {
    let pre = Prerelease::new(&format!("{}.{}", label, counter)).map_err(|_| VersionError::InvalidLabel {
      label: label.to_string(),
    })?;
    let mut next = self.clone();
    next.version.pre = pre;
    Ok(next)
  }

  fn without_prerelease(&self) -> Self {
    let mut next = self.clone();
    next.version.pre = Prerelease::EMPTY;
    next.version.build = BuildMetadata::EMPTY;
    next
  }

  fn bump_minor(&self) -> LibrarianResult<Self> {
    let minor = self.version.minor.checked_add(1).ok_or_else(|| self.overflow())?;
    Ok(Self {
      v_prefix: self.v_prefix,
      version: Version::new(self.version.major, minor, 0),
    })
  }

  fn overflow(&self) -> VersionError {
    VersionError::Overflow {
      version: self.to_string(),
    }
  }
}

impl fmt::Display for ReleaseVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.v_prefix {
      write!(f, "v{}", self.version)
    } else {
      write!(f, "{}", self.version)
    }
  }
}

/// Labels must survive as the first dot-separated prerelease identifier
fn validate_label(label: &str) -> LibrarianResult<()> {
  if label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
    Ok(())
  } else {
    Err(
      VersionError::InvalidLabel {
        label: label.to_string(),
      }
      .into(),
    )
  }
}

/// Next version after `previous` for a release labelled `label` (`""` = stable)
pub fn increment(previous: &str, label: &str) -> LibrarianResult<String> {
  validate_label(label)?;

  if previous == UNRELEASED {
    return Ok(if label.is_empty() {
      "v0.1.0".to_string()
    } else {
      format!("v0.1.0-{}.1", label)
    });
  }

  let current = ReleaseVersion::parse(previous)?;
  let next = match (label, current.prerelease()) {
    ("", Some(_)) => current.without_prerelease(),
    ("", None) => current.bump_minor()?,
    (label, Some((same, counter))) if same == label => {
      let counter = counter.checked_add(1).ok_or_else(|| current.overflow())?;
      current.with_prerelease(label, counter)?
    }
    // Any label change starts a new release line, even at the same core version
    (label, _) => current.bump_minor()?.with_prerelease(label, 1)?,
  };
  Ok(next.to_string())
}

/// Strip a `-LABEL.N` suffix; versions without one are returned unchanged
pub fn remove_prerelease(version: &str) -> String {
  match version.split_once('-') {
    Some((core, _)) => core.to_string(),
    None => version.to_string(),
  }
}

pub fn has_prerelease(version: &str) -> bool {
  version.contains('-')
}
