//! Drvlint CLI binary entry point.
//! Dispatches to the pipeline and reports, mapping stage failures to
//! process exit codes.

mod cli;
mod config;
mod filter;
mod models;
mod output;
mod parse;
mod pipeline;
mod pool;
mod stages;
mod tags;
mod tools;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let env_filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Check {
            tree_root,
            fast,
            no_extra_warnings,
            no_filter,
            jobs,
            output,
        } => {
            let eff = config::resolve_effective(
                tree_root.as_deref(),
                jobs,
                output.as_deref(),
                fast,
                no_extra_warnings,
                no_filter,
            );
            // Friendly note if no drvlint config was found
            if config::load_config(&eff.tree_root).is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No drvlint.toml found; using defaults."
                );
            }
            let checked = eff.tree_root.join(&eff.subdir);
            if !checked.is_dir() {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    format!(
                        "checked directory not found: {} (set subdir in drvlint.toml)",
                        checked.to_string_lossy()
                    )
                );
                std::process::exit(2);
            }
            match pipeline::run(&eff) {
                Ok(status) => std::process::exit(status.exit_code()),
                Err(err) => {
                    eprintln!("{} {:#}", utils::error_prefix(), err);
                    std::process::exit(2);
                }
            }
        }
        Commands::Tools { tree_root, output } => {
            let eff = config::resolve_effective(
                tree_root.as_deref(),
                None,
                output.as_deref(),
                false,
                false,
                false,
            );
            let report = tools::version_report(&eff);
            output::print_tool_report(&report, &eff.output);
        }
    }
}
