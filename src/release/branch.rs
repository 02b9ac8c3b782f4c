use crate::core::config::BranchPrerelease;

/// Effective prerelease label for a prepare
///
/// `--promote` always means a stable release. Otherwise an explicit
/// `--prerelease` value wins (an explicit empty value forces stable), and
/// failing that the first branch rule whose glob matches `branch` decides.
/// No match means a stable release.
pub fn resolve_label(explicit: Option<&str>, promote: bool, branch: &str, rules: &[BranchPrerelease]) -> String {
  if promote {
    return String::new();
  }
  if let Some(label) = explicit {
    return label.to_string();
  }

  rules
    .iter()
    .find(|rule| glob::Pattern::new(&rule.pattern).is_ok_and(|p| p.matches(branch)))
    .map(|rule| rule.prerelease.clone())
    .unwrap_or_default()
}
