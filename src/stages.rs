//! Stage runners: one external tool per pipeline stage.
//!
//! Each runner invokes its collaborator, filters the output lines, prints
//! survivors, and reports pass or fail. Only the style stage fans out to
//! the worker pool; the rest block on a single process.

use crate::config::Effective;
use crate::filter;
use crate::models::{MatchTarget, Stage};
use crate::output;
use crate::parse;
use crate::pool;
use crate::tags::TagIndex;
use crate::tools;
use crate::utils;
use anyhow::{Context, Result};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Run one stage over the tracked files. `Ok(true)` means it passed.
pub fn run(stage: Stage, eff: &Effective, files: &[String]) -> Result<bool> {
    match stage {
        Stage::Compile => compile(eff),
        Stage::Semantic => semantic(eff),
        Stage::Style => style(eff, files),
        Stage::Doc => doc(eff, files),
    }
}

fn compile(eff: &Effective) -> Result<bool> {
    remove_stale_objects(eff);
    let mut args = vec![format!("M={}", eff.subdir)];
    if eff.extra_warnings {
        args.push("W=1".to_string());
    }
    let out = Command::new(&eff.make)
        .args(&args)
        .current_dir(&eff.tree_root)
        .env("CCACHE_DISABLE", "1")
        .output()
        .with_context(|| format!("failed to run {}", eff.make))?;
    print_scoped(&out.stderr, eff, &[]);
    Ok(out.status.success())
}

fn semantic(eff: &Effective) -> Result<bool> {
    let args = [
        format!("M={}", eff.subdir),
        "C=2".to_string(),
        "CF=-D__CHECK_ENDIAN__".to_string(),
    ];
    let out = Command::new(&eff.make)
        .args(&args)
        .current_dir(&eff.tree_root)
        .env("CCACHE_DISABLE", "1")
        .output()
        .with_context(|| format!("failed to run {}", eff.make))?;
    print_scoped(&out.stderr, eff, &eff.semantic_suppress);
    Ok(out.status.success())
}

fn style(eff: &Effective, files: &[String]) -> Result<bool> {
    tools::verify_style_checker(eff);
    let index = TagIndex::build(&eff.tree_root, files, &eff.ctags, &eff.untaggable)?;

    let survivors = AtomicUsize::new(0);
    let failures = AtomicUsize::new(0);
    pool::drain(files.to_vec(), eff.jobs, |path| {
        match check_style(eff, &index, &path) {
            Ok(kept) => {
                survivors.fetch_add(kept, Ordering::Relaxed);
            }
            Err(err) => {
                // one bad file must not sink the other workers
                failures.fetch_add(1, Ordering::Relaxed);
                eprintln!("{} {}", utils::error_prefix(), format!("{}: {:#}", path, err));
            }
        }
    });

    let survivors = survivors.into_inner();
    let failures = failures.into_inner();
    output::style_summary(survivors, failures, files.len(), &eff.output);
    Ok(survivors == 0 && failures == 0)
}

/// Style-check one file, printing surviving warnings as they are found.
/// Returns how many survived the filter.
fn check_style(eff: &Effective, index: &TagIndex, path: &str) -> Result<usize> {
    let checker = eff.tree_root.join(&eff.checkpatch);
    let out = Command::new(&checker)
        .args(["--terse", "--show-types", "--strict", "--no-summary", "-f", path])
        .current_dir(&eff.tree_root)
        .output()
        .with_context(|| format!("failed to run {}", checker.display()))?;

    let mut kept = 0;
    for line in String::from_utf8_lossy(&out.stdout).lines() {
        let mut warning = match parse::parse_warning_line(line) {
            Ok(w) => w,
            Err(err) => {
                tracing::debug!("skipping checker line: {}", err);
                continue;
            }
        };
        warning.symbol = index
            .enclosing_symbol(&warning.path, warning.line)
            .map(str::to_string);
        let target = MatchTarget::for_warning(&warning, &eff.tree_root);
        if filter::is_suppressed(&warning, &target, &eff.suppress) {
            tracing::debug!(
                "suppressed {}:{} {}",
                warning.path,
                warning.line,
                warning.kind
            );
            continue;
        }
        output::print_warning(&warning, &eff.output);
        kept += 1;
    }
    Ok(kept)
}

fn doc(eff: &Effective, files: &[String]) -> Result<bool> {
    if files.is_empty() {
        return Ok(true);
    }
    let checker = eff.tree_root.join(&eff.kernel_doc);
    let out = Command::new(&checker)
        .arg("-none")
        .args(files)
        .current_dir(&eff.tree_root)
        .output()
        .with_context(|| format!("failed to run {}", checker.display()))?;
    // doc-check output passes through unfiltered
    for line in String::from_utf8_lossy(&out.stderr).lines() {
        eprintln!("{}", line);
    }
    Ok(out.status.success())
}

/// Remove object files and command stamps left under the checked
/// subdirectory by earlier builds.
fn remove_stale_objects(eff: &Effective) {
    for pat in ["**/*.o", "**/.*.cmd"] {
        let full = eff.tree_root.join(&eff.subdir).join(pat);
        let Ok(paths) = glob::glob(&full.to_string_lossy()) else {
            continue;
        };
        for entry in paths.flatten() {
            tracing::debug!("removing stale {}", utils::rel_to_wd(&entry));
            let _ = std::fs::remove_file(&entry);
        }
    }
}

/// Print stderr lines scoped to the checked subdirectory, minus any
/// suppressed patterns. Scoping is skipped when filtering is disabled.
fn print_scoped(raw: &[u8], eff: &Effective, suppress: &[String]) {
    for line in String::from_utf8_lossy(raw).lines() {
        if eff.filter_output {
            if !line.contains(&eff.subdir) {
                continue;
            }
            if suppress.iter().any(|p| line.contains(p)) {
                continue;
            }
        }
        eprintln!("{}", line);
    }
}
