//! Shared data models for stages, warnings, and suppress rules.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One pipeline stage, in run order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Semantic,
    Style,
    Doc,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 4] = [Stage::Compile, Stage::Semantic, Stage::Style, Stage::Doc];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Semantic => "semantic-check",
            Stage::Style => "style-check",
            Stage::Doc => "doc-check",
        }
    }

    /// Process exit code reported when this stage fails.
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::Compile => 1,
            Stage::Semantic => 2,
            Stage::Style => 3,
            Stage::Doc => 4,
        }
    }
}

/// Terminal pipeline outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStatus {
    Passed,
    Failed(Stage),
}

impl PipelineStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            PipelineStatus::Passed => 0,
            PipelineStatus::Failed(stage) => stage.exit_code(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
/// One parsed style-checker warning. Immutable once the enclosing symbol
/// has been resolved; printed or suppressed, never stored.
pub struct Warning {
    pub path: String,
    pub line: u32,
    pub category: String,
    pub kind: String,
    pub message: String,
    pub symbol: Option<String>,
}

/// A `(line, symbol)` pair from the tagging tool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub line: u32,
    pub symbol: String,
}

#[derive(Deserialize, Clone, Debug)]
/// A suppress rule: silences warnings of `kind` whose match target hits
/// `pattern`. First matching rule wins.
pub struct SuppressRule {
    pub pattern: String,
    pub kind: String,
}

/// Where a suppress pattern is matched for one warning.
#[derive(Debug, PartialEq, Eq)]
pub enum MatchTarget {
    /// Enclosing symbol resolved; the pattern matches as an anchored
    /// regex prefix of the symbol name.
    Symbol(String),
    /// No symbol resolved; the pattern matches as a literal substring of
    /// the source line re-read from disk.
    SourceLine { path: PathBuf, line: u32 },
}

impl MatchTarget {
    pub fn for_warning(warning: &Warning, tree_root: &Path) -> MatchTarget {
        match &warning.symbol {
            Some(sym) => MatchTarget::Symbol(sym.clone()),
            None => MatchTarget::SourceLine {
                path: tree_root.join(&warning.path),
                line: warning.line,
            },
        }
    }
}
