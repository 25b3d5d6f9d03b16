//! Style-checker output parsing.
//!
//! With `--terse --show-types` the style checker emits one warning per
//! line, `path:line: CATEGORY:KIND: message`. Summary and blank lines do
//! not match that shape; callers skip them (and log at debug level)
//! instead of aborting the batch.

use crate::models::Warning;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static WARNING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<path>[^:]+):(?P<line>\d+): (?P<cat>[A-Z]+):(?P<kind>[A-Z0-9_]+): (?P<msg>.*)$")
        .expect("warning line pattern")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WarningParseError {
    #[error("unrecognized checker output: {0:?}")]
    Shape(String),
    #[error("line number out of range: {0:?}")]
    LineNumber(String),
}

/// Parse one line of checker output into a `Warning`. The enclosing
/// symbol is left unresolved.
pub fn parse_warning_line(line: &str) -> Result<Warning, WarningParseError> {
    let caps = WARNING_LINE
        .captures(line)
        .ok_or_else(|| WarningParseError::Shape(line.to_string()))?;
    let lineno: u32 = caps["line"]
        .parse()
        .map_err(|_| WarningParseError::LineNumber(caps["line"].to_string()))?;
    Ok(Warning {
        path: caps["path"].to_string(),
        line: lineno,
        category: caps["cat"].to_string(),
        kind: caps["kind"].to_string(),
        message: caps["msg"].trim().to_string(),
        symbol: None,
    })
}
