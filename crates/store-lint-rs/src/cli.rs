//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueEnum};

/// Linter for Pinia store definitions.
#[derive(Debug, Parser)]
#[command(name = "store-lint-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to lint, relative to the workspace (default: the whole workspace)
    pub paths: Vec<Utf8PathBuf>,

    /// Working directory for the check
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Attach fixes to diagnostics even if the config does not enable them
    #[arg(long = "enable-fix")]
    pub enable_fix: bool,

    /// Write fixed sources back to disk
    #[arg(long, conflicts_with = "fix_dry_run")]
    pub fix: bool,

    /// Print fixed sources instead of writing them
    #[arg(long = "fix-dry-run")]
    pub fix_dry_run: bool,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Human-readable with code snippets
    HumanVerbose,
    /// JSON output
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}

impl Args {
    /// Returns whether fixed sources are computed at all.
    pub fn fixing(&self) -> bool {
        self.fix || self.fix_dry_run
    }

    /// Returns whether the rule should attach fixes to its diagnostics.
    pub fn force_fix(&self) -> bool {
        self.enable_fix || self.fixing()
    }
}
