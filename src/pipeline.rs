//! Pipeline orchestration.
//!
//! Stages run in a fixed order (compile, semantic-check, style-check,
//! doc-check) and the first failure short-circuits the rest. Fast mode
//! drops the style stage from the order before anything runs. A tool
//! invocation error inside a stage counts as that stage failing, so the
//! exit code still names the stage.

use crate::config::Effective;
use crate::models::{PipelineStatus, Stage};
use crate::output;
use crate::stages;
use crate::tools;
use crate::utils;
use anyhow::Result;

/// Stages to run for this invocation.
pub fn stage_order(fast: bool) -> Vec<Stage> {
    Stage::ALL
        .into_iter()
        .filter(|stage| !(fast && *stage == Stage::Style))
        .collect()
}

/// Advance through `order`, stopping at the first failing stage.
pub fn run_stages<F>(order: &[Stage], mut runner: F) -> PipelineStatus
where
    F: FnMut(Stage) -> Result<bool>,
{
    for &stage in order {
        tracing::debug!("stage {} starting", stage.label());
        match runner(stage) {
            Ok(true) => {}
            Ok(false) => return PipelineStatus::Failed(stage),
            Err(err) => {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    format!("{}: {:#}", stage.label(), err)
                );
                return PipelineStatus::Failed(stage);
            }
        }
    }
    PipelineStatus::Passed
}

/// Run the whole pipeline for one invocation. Errors here happen before
/// any stage runs; errors inside a stage become that stage's failure.
pub fn run(eff: &Effective) -> Result<PipelineStatus> {
    let files = tools::tracked_files(&eff.tree_root, &eff.subdir)?;
    tracing::debug!("{} tracked files under {}", files.len(), eff.subdir);
    Ok(run_stages(&stage_order(eff.fast), |stage| {
        output::stage_banner(stage, &eff.output);
        stages::run(stage, eff, &files)
    }))
}
