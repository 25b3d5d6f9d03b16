//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "drvlint",
    version,
    about = "Check pipeline for an in-tree kernel driver",
    long_about = "Drvlint runs the driver check pipeline: build, semantic check, style check, and doc check, stopping at the first failing stage.\n\nConfiguration precedence: CLI > drvlint.toml > defaults.",
    after_help = "Examples:\n  drvlint check\n  drvlint check --fast --no-extra-warnings\n  drvlint check --tree-root ~/src/linux --jobs 4\n  drvlint tools",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging")]
    pub debug: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for running the pipeline and reporting tools.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current drvlint version.")]
    Version,
    /// Run the check pipeline
    #[command(
        about = "Run the check pipeline",
        long_about = "Run compile, semantic-check, style-check, and doc-check over the configured subdirectory. The first failing stage sets the exit code: 1 compile, 2 semantic-check, 3 style-check, 4 doc-check.",
        after_help = "Examples:\n  drvlint check\n  drvlint check --fast\n  drvlint check --no-filter --output json"
    )]
    Check {
        #[arg(long, help = "Kernel tree root (default: current dir)")]
        tree_root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the style-check stage")]
        fast: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Build without the extra-warnings level")]
        no_extra_warnings: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Print tool output unfiltered")]
        no_filter: bool,
        #[arg(long, help = "Style-check worker count (default: cores + 2)")]
        jobs: Option<usize>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Report external tool versions
    #[command(
        about = "Report external tool versions",
        long_about = "Probe each external collaborator (git, make, sparse, ctags, checkpatch, kernel-doc, the configured compiler) and print one line per tool. Missing tools are reported, not fatal.",
        after_help = "Examples:\n  drvlint tools\n  drvlint tools --tree-root ~/src/linux --output json"
    )]
    Tools {
        #[arg(long, help = "Kernel tree root (default: current dir)")]
        tree_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
