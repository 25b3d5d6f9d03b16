//! External tool invocation and probing.
//!
//! Every collaborator (build system, semantic checker, style checker,
//! tagging tool, doc checker, version control) is an opaque subprocess.
//! This module holds the shared invocation helpers, the tracked-file
//! enumeration, the style-checker checksum validation, and the probes
//! behind the `tools` report.

use crate::config::Effective;
use crate::utils;
use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::process::{Command, Output};

/// Run a command under `cwd` and capture its output. Only the spawn can
/// error here; callers inspect the exit status themselves.
pub fn capture(program: &str, args: &[&str], cwd: &Path) -> Result<Output> {
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to run {}", program))
}

/// Tracked files under the checked subdirectory, via version control.
pub fn tracked_files(tree_root: &Path, subdir: &str) -> Result<Vec<String>> {
    let out = capture("git", &["ls-files", "--", subdir], tree_root)?;
    if !out.status.success() {
        bail!("git ls-files failed ({})", out.status);
    }
    Ok(String::from_utf8_lossy(&out.stdout)
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Hex-encoded sha256 of a file.
pub fn file_sha256(path: &Path) -> Result<String> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare the style checker script against its known-good checksum.
/// A mismatch is reported and the run continues.
pub fn verify_style_checker(eff: &Effective) {
    let path = eff.tree_root.join(&eff.checkpatch);
    match file_sha256(&path) {
        Ok(actual) if actual == eff.checkpatch_sha256 => {}
        Ok(actual) => {
            eprintln!(
                "{} {}",
                utils::warn_prefix(),
                format!(
                    "{} checksum {} does not match the known-good value; results may differ",
                    utils::rel_to_wd(&path),
                    &actual[..12]
                )
            );
        }
        Err(err) => {
            eprintln!("{} {:#}", utils::warn_prefix(), err);
        }
    }
}

/// Compiler version recorded in the tree's build configuration, if any.
pub fn cc_version_from_config(tree_root: &Path) -> Option<String> {
    let text = std::fs::read_to_string(tree_root.join(".config")).ok()?;
    text.lines().find_map(|line| {
        line.strip_prefix("CONFIG_CC_VERSION_TEXT=")
            .map(|rest| rest.trim().trim_matches('"').to_string())
    })
}

/// Resolve a tool on PATH and ask it for its version line.
pub fn probe_version(program: &str, version_arg: &str) -> Option<String> {
    let path = which::which(program).ok()?;
    let out = Command::new(&path).arg(version_arg).output().ok()?;
    first_line(&out.stdout).or_else(|| first_line(&out.stderr))
}

/// Probe an in-tree script: absent means "not found"; present scripts are
/// asked for a version line when they support one.
fn probe_script(path: &Path, version_arg: Option<&str>) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    if let Some(arg) = version_arg {
        if let Ok(out) = Command::new(path).arg(arg).output() {
            if let Some(line) = first_line(&out.stdout).or_else(|| first_line(&out.stderr)) {
                return Some(line);
            }
        }
    }
    Some("present".to_string())
}

fn first_line(raw: &[u8]) -> Option<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(|l| l.trim().to_string())
        .find(|l| !l.is_empty())
}

/// One line per collaborator for the `tools` subcommand. Each tool is
/// probed independently; a missing one reports as not found without
/// aborting the others.
pub fn version_report(eff: &Effective) -> Vec<(String, Option<String>)> {
    vec![
        ("git".to_string(), probe_version("git", "--version")),
        (eff.make.clone(), probe_version(&eff.make, "--version")),
        ("sparse".to_string(), probe_version("sparse", "--version")),
        (eff.ctags.clone(), probe_version(&eff.ctags, "--version")),
        (
            eff.checkpatch.clone(),
            probe_script(&eff.tree_root.join(&eff.checkpatch), Some("--version")),
        ),
        (
            eff.kernel_doc.clone(),
            probe_script(&eff.tree_root.join(&eff.kernel_doc), None),
        ),
        ("cc".to_string(), cc_version_from_config(&eff.tree_root)),
    ]
}
