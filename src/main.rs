mod commands;
mod core;
mod generate;
mod release;
mod state;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::config::Language;
use core::context::WorkspaceContext;
use core::error::{LibrarianError, print_error};
use std::path::PathBuf;
use ui::output::Output;

/// Track generation and release state of the libraries in a monorepo
#[derive(Parser)]
#[command(name = "librarian")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Repository root (default: nearest directory containing .librarian/)
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Show detailed progress
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Only print warnings and errors
  #[arg(short, long, global = true)]
  quiet: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Setup
  // ============================================================================
  /// Create .librarian/config.toml for a repository
  Init {
    /// Target language: go, python, rust, dart or none (release-only)
    language: Language,
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },

  /// Read and change repository configuration
  #[command(subcommand)]
  Config(ConfigCommands),

  // ============================================================================
  // Artifacts
  // ============================================================================
  /// Start tracking an artifact, optionally with the APIs it is generated from
  Add {
    /// Artifact directory, relative to the repository root
    path: String,
    /// API paths to generate from, e.g. google/cloud/kms/v1
    apis: Vec<String>,
    /// Local checkout of the API definitions (for BUILD.bazel rules)
    #[arg(long, value_name = "DIR")]
    source_root: Option<PathBuf>,
    /// Do not add a [release] section
    #[arg(long)]
    no_release: bool,
  },

  /// Change file rules and language metadata of a tracked artifact
  Edit {
    /// Artifact directory
    path: String,
    /// Files kept across regeneration (repeatable)
    #[arg(long, value_name = "PATTERN")]
    keep: Vec<String>,
    /// Files deleted after regeneration (repeatable)
    #[arg(long, value_name = "PATTERN")]
    remove: Vec<String>,
    /// Files that never trigger a release (repeatable)
    #[arg(long, value_name = "PATTERN")]
    exclude: Vec<String>,
    /// Language metadata as LANG:KEY=VALUE, e.g. go:module=cloud.google.com/go/kms
    #[arg(long, value_name = "LANG:KEY=VALUE")]
    language: Vec<String>,
  },

  /// Stop tracking an artifact
  Remove {
    /// Artifact directory
    path: String,
  },

  /// Sync artifact state with the repository configuration
  Generate {
    /// Artifact directory
    path: Option<String>,
    /// Sync every tracked artifact
    #[arg(short, long)]
    all: bool,
  },

  /// List tracked artifacts
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Releases
  // ============================================================================
  /// Compute the next version and record it as pending
  Prepare {
    /// Artifact directory
    path: Option<String>,
    /// Prepare every tracked artifact
    #[arg(short, long)]
    all: bool,
    /// Prerelease label (default: from release.branches, empty for stable)
    #[arg(long, value_name = "LABEL")]
    prerelease: Option<String>,
    /// Finalize the current prerelease as a stable version
    #[arg(long)]
    promote: bool,
    /// Show the transition without saving it
    #[arg(long)]
    dry_run: bool,
  },

  /// Tag the pending version and record it in history
  Release {
    /// Artifact directory
    path: Option<String>,
    /// Release every artifact with a pending release
    #[arg(short, long)]
    all: bool,
    /// Show what would be tagged without tagging
    #[arg(long)]
    dry_run: bool,
  },
}

#[derive(Subcommand)]
enum ConfigCommands {
  /// Print a key, or every key when none is given
  Get {
    /// Dot-separated key, e.g. generate.googleapis.ref
    key: Option<String>,
  },
  /// Set a key
  Set {
    /// Dot-separated key, e.g. release.tag_format
    key: String,
    /// New value (empty clears optional keys)
    value: String,
  },
  /// Pin API sources to the latest commit of their default branch
  Update {
    /// Also sync every artifact with the new refs
    #[arg(short, long)]
    all: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  let output = Output::from_flags(cli.verbose, cli.quiet);

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(LibrarianError::from(e).context("Failed to get current directory")),
  };
  let root = WorkspaceContext::resolve_root(cli.root.as_deref(), &cwd);
  output.verbose("root", &root.display().to_string());

  let ctx = WorkspaceContext::build(&root, output);

  let result = match cli.command {
    // Setup
    Commands::Init { language, force } => commands::run_init(&ctx, language, force),
    Commands::Config(config_cmd) => match config_cmd {
      ConfigCommands::Get { key } => commands::run_config_get(&ctx, key.as_deref()),
      ConfigCommands::Set { key, value } => commands::run_config_set(&ctx, &key, &value),
      ConfigCommands::Update { all } => commands::run_config_update(&ctx, all),
    },

    // Artifacts
    Commands::Add {
      path,
      apis,
      source_root,
      no_release,
    } => commands::run_add(
      &ctx,
      &path,
      &commands::AddOptions {
        apis,
        source_root,
        no_release,
      },
    ),
    Commands::Edit {
      path,
      keep,
      remove,
      exclude,
      language,
    } => commands::run_edit(
      &ctx,
      &path,
      &commands::EditOptions {
        keep,
        remove,
        exclude,
        language,
      },
    ),
    Commands::Remove { path } => commands::run_remove(&ctx, &path),
    Commands::Generate { path, all } => commands::run_generate(&ctx, path.as_deref(), all),
    Commands::Status { json } => commands::run_status(&ctx, json),

    // Releases
    Commands::Prepare {
      path,
      all,
      prerelease,
      promote,
      dry_run,
    } => commands::run_prepare(
      &ctx,
      path.as_deref(),
      all,
      &commands::PrepareOptions {
        prerelease,
        promote,
        dry_run,
      },
    ),
    Commands::Release { path, all, dry_run } => commands::run_release(&ctx, path.as_deref(), all, dry_run),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: LibrarianError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
