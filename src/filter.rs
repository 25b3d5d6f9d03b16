//! Warning suppression against the allow-list.
//!
//! Rules are `(pattern, kind)` pairs checked in declaration order; the
//! first rule whose kind equals the warning kind and whose pattern hits
//! the match target wins. Symbol targets match the pattern as an anchored
//! regex prefix; source-line targets match it as a literal substring of
//! the exact line on disk.

use crate::models::{MatchTarget, SuppressRule, Warning};
use regex::Regex;
use std::fs;
use std::path::Path;

fn rule(pattern: &str, kind: &str) -> SuppressRule {
    SuppressRule {
        pattern: pattern.to_string(),
        kind: kind.to_string(),
    }
}

/// Built-in allow-list. Config `[style] suppress` entries are appended
/// after these.
pub fn builtin_rules() -> Vec<SuppressRule> {
    vec![
        // iterator macros legitimately reuse their loop argument
        rule(r"for_each_\w+", "MACRO_ARG_REUSE"),
        rule(r"hlist_for_each\w*", "MACRO_ARG_REUSE"),
        // register and field macros keep the datasheet's mixed-case names
        rule(r"\w+_(REG|FLD)_", "CAMELCASE"),
        // Kconfig help text is prose, not code
        rule("help", "LONG_LINE"),
    ]
}

/// Decide whether `warning` is silenced by `rules`.
pub fn is_suppressed(warning: &Warning, target: &MatchTarget, rules: &[SuppressRule]) -> bool {
    rules.iter().any(|r| {
        r.kind == warning.kind
            && match target {
                MatchTarget::Symbol(symbol) => matches_symbol(&r.pattern, symbol),
                MatchTarget::SourceLine { path, line } => {
                    matches_source_line(&r.pattern, path, *line)
                }
            }
    })
}

fn matches_symbol(pattern: &str, symbol: &str) -> bool {
    match Regex::new(&format!("^(?:{})", pattern)) {
        Ok(re) => re.is_match(symbol),
        Err(err) => {
            tracing::debug!("unusable suppress pattern {:?}: {}", pattern, err);
            false
        }
    }
}

fn matches_source_line(pattern: &str, path: &Path, line: u32) -> bool {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(err) => {
            tracing::debug!("cannot re-read {} for line match: {}", path.display(), err);
            return false;
        }
    };
    match text.lines().nth(line.saturating_sub(1) as usize) {
        Some(src) => src.contains(pattern),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn warning(kind: &str, symbol: Option<&str>) -> Warning {
        Warning {
            path: "drivers/foo.c".into(),
            line: 3,
            category: "WARNING".into(),
            kind: kind.into(),
            message: "msg".into(),
            symbol: symbol.map(str::to_string),
        }
    }

    #[test]
    fn test_symbol_prefix_match_suppresses() {
        let rules = vec![rule("foo_", "LONG_LINE")];
        let w = warning("LONG_LINE", Some("foo_probe"));
        let t = MatchTarget::Symbol("foo_probe".into());
        assert!(is_suppressed(&w, &t, &rules));
        // prefix, not substring
        let t = MatchTarget::Symbol("acme_foo_probe".into());
        assert!(!is_suppressed(&w, &t, &rules));
    }

    #[test]
    fn test_kind_must_match() {
        let rules = vec![rule("foo_", "LONG_LINE")];
        let w = warning("CAMELCASE", Some("foo_probe"));
        let t = MatchTarget::Symbol("foo_probe".into());
        assert!(!is_suppressed(&w, &t, &rules));
    }

    #[test]
    fn test_rule_regex_alternation() {
        let rules = vec![rule(r"for_each_\w+", "MACRO_ARG_REUSE")];
        let w = warning("MACRO_ARG_REUSE", Some("for_each_acme_queue"));
        let t = MatchTarget::Symbol("for_each_acme_queue".into());
        assert!(is_suppressed(&w, &t, &rules));
    }

    #[test]
    fn test_first_match_wins_regardless_of_later_rules() {
        let rules = vec![
            rule("foo_", "LONG_LINE"),
            rule("unrelated", "LONG_LINE"),
        ];
        let w = warning("LONG_LINE", Some("foo_probe"));
        let t = MatchTarget::Symbol("foo_probe".into());
        assert!(is_suppressed(&w, &t, &rules));
    }

    #[test]
    fn test_source_line_substring_match() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("Kconfig");
        std::fs::write(&file, "config ACME\n\tbool \"Acme driver\"\n\thelp\n").unwrap();

        let rules = vec![rule("help", "LONG_LINE")];
        let w = warning("LONG_LINE", None);
        let hit = MatchTarget::SourceLine {
            path: file.clone(),
            line: 3,
        };
        assert!(is_suppressed(&w, &hit, &rules));
        // exact line only: line 1 does not contain the pattern
        let miss = MatchTarget::SourceLine {
            path: file.clone(),
            line: 1,
        };
        assert!(!is_suppressed(&w, &miss, &rules));
        // out-of-range line never matches
        let past = MatchTarget::SourceLine { path: file, line: 99 };
        assert!(!is_suppressed(&w, &past, &rules));
    }

    #[test]
    fn test_unreadable_file_keeps_warning() {
        let rules = vec![rule("help", "LONG_LINE")];
        let w = warning("LONG_LINE", None);
        let t = MatchTarget::SourceLine {
            path: PathBuf::from("/nonexistent/Kconfig"),
            line: 1,
        };
        assert!(!is_suppressed(&w, &t, &rules));
    }

    #[test]
    fn test_invalid_pattern_never_suppresses() {
        let rules = vec![rule("(unclosed", "LONG_LINE")];
        let w = warning("LONG_LINE", Some("anything"));
        let t = MatchTarget::Symbol("anything".into());
        assert!(!is_suppressed(&w, &t, &rules));
    }
}
