//! Remote repository metadata used to pin external sources
//!
//! `config update` asks a remote for its default branch and the head commit of
//! that branch. The default implementation uses `git ls-remote`, so it works
//! against GitHub (`owner/name`), any git URL, and local paths alike.

use crate::core::error::{ExternalError, LibrarianError, LibrarianResult, ResultExt};
use crate::core::vcs::system_git::{isolated_git, stdout_or_error};
use crate::utils::is_local_path;
use std::cell::OnceCell;
use std::process::Command;

/// Supplies an auth token for network access
pub trait TokenProvider {
  fn token(&self) -> LibrarianResult<String>;
}

/// Reads `GITHUB_TOKEN` / `GH_TOKEN`, falling back to `gh auth token`
pub struct EnvTokenProvider;

impl TokenProvider for EnvTokenProvider {
  fn token(&self) -> LibrarianResult<String> {
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
      if let Ok(token) = std::env::var(var)
        && !token.trim().is_empty()
      {
        return Ok(token.trim().to_string());
      }
    }

    let output = Command::new("gh").args(["auth", "token"]).output();
    if let Ok(output) = output
      && output.status.success()
    {
      let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
      if !token.is_empty() {
        return Ok(token);
      }
    }

    Err(LibrarianError::External(ExternalError::MissingToken {
      tried: "GITHUB_TOKEN, GH_TOKEN, `gh auth token`".to_string(),
    }))
  }
}

/// Metadata lookups against a named remote repository
pub trait RemoteRepository {
  /// Branch HEAD points at on the remote
  fn default_branch(&self, repo: &str) -> LibrarianResult<String>;

  /// Commit sha at the tip of `branch`
  fn latest_commit(&self, repo: &str, branch: &str) -> LibrarianResult<String>;
}

/// `git ls-remote` backed [`RemoteRepository`]
///
/// The token is only requested the first time a non-local repository is
/// contacted.
pub struct GitRemote {
  tokens: Box<dyn TokenProvider>,
  token: OnceCell<String>,
}

impl GitRemote {
  pub fn new(tokens: Box<dyn TokenProvider>) -> Self {
    Self {
      tokens,
      token: OnceCell::new(),
    }
  }

  /// URL passed to git, plus the token when GitHub needs one
  fn target(&self, repo: &str) -> LibrarianResult<(String, Option<String>)> {
    if is_local_path(repo) || repo.contains("://") || repo.contains('@') {
      return Ok((repo.to_string(), None));
    }

    let token = match self.token.get() {
      Some(token) => token.clone(),
      None => {
        let token = self.tokens.token().context("Remote metadata requires an auth token")?;
        self.token.get_or_init(|| token).clone()
      }
    };
    Ok((format!("https://github.com/{}.git", repo), Some(token)))
  }

  fn ls_remote(&self, repo: &str, args: &[&str]) -> LibrarianResult<String> {
    let (url, token) = self.target(repo)?;
    let output = ls_remote_command(&url, args, token.as_deref())
      .output()
      .context("Failed to execute git ls-remote")?;
    stdout_or_error(&format!("git ls-remote {} {}", args.join(" "), url), output)
  }
}

/// `git ls-remote` with the token handed over through the environment
///
/// The token never appears in argv or the URL. A credential helper configured
/// via `GIT_CONFIG_*` reads it back from `LIBRARIAN_GIT_TOKEN`; the empty
/// helper entry first clears any helpers from the user's git config.
fn ls_remote_command(url: &str, args: &[&str], token: Option<&str>) -> Command {
  let mut cmd = isolated_git();
  if let Some(token) = token {
    cmd
      .env("GIT_CONFIG_COUNT", "2")
      .env("GIT_CONFIG_KEY_0", "credential.helper")
      .env("GIT_CONFIG_VALUE_0", "")
      .env("GIT_CONFIG_KEY_1", "credential.helper")
      .env("GIT_CONFIG_VALUE_1", CREDENTIAL_HELPER)
      .env(TOKEN_VAR, token);
  }
  cmd.arg("ls-remote").args(args).arg(url);
  cmd
}

const TOKEN_VAR: &str = "LIBRARIAN_GIT_TOKEN";
const CREDENTIAL_HELPER: &str =
  "!f() { test \"$1\" = get || return 0; echo username=x-access-token; echo \"password=$LIBRARIAN_GIT_TOKEN\"; }; f";

impl RemoteRepository for GitRemote {
  fn default_branch(&self, repo: &str) -> LibrarianResult<String> {
    let out = self.ls_remote(repo, &["--symref"])?;
    parse_symref_head(&out).ok_or_else(|| {
      LibrarianError::External(ExternalError::CommandFailed {
        command: format!("git ls-remote --symref {}", repo),
        stderr: "remote did not report a default branch".to_string(),
      })
    })
  }

  fn latest_commit(&self, repo: &str, branch: &str) -> LibrarianResult<String> {
    let refname = format!("refs/heads/{}", branch);
    let out = self.ls_remote(repo, &["--heads"])?;
    parse_ref_sha(&out, &refname).ok_or_else(|| {
      LibrarianError::External(ExternalError::CommandFailed {
        command: format!("git ls-remote --heads {}", repo),
        stderr: format!("branch '{}' not found on remote", branch),
      })
    })
  }
}

/// `ref: refs/heads/main\tHEAD` -> `main`
fn parse_symref_head(output: &str) -> Option<String> {
  output.lines().find_map(|line| {
    let (target, name) = line.strip_prefix("ref: ")?.split_once('\t')?;
    (name.trim() == "HEAD").then(|| target.trim_start_matches("refs/heads/").to_string())
  })
}

/// `<sha>\t<refname>` -> `<sha>` for the matching refname
fn parse_ref_sha(output: &str, refname: &str) -> Option<String> {
  output.lines().find_map(|line| {
    let (sha, name) = line.split_once('\t')?;
    (name.trim() == refname).then(|| sha.trim().to_string())
  })
}
