//! Symbol tag index built from the tagging tool's cross-reference output.
//!
//! For every taggable tracked file, `ctags -x` lists where named functions
//! and macros begin. The index keeps one `(line, symbol)` list per file,
//! sorted once at build time, and answers "which symbol encloses line N"
//! by binary search. Build-config files (`Kconfig*`) and build scripts
//! (`Makefile*`) carry no taggable symbols and never enter the index.

use crate::models::Tag;
use crate::tools;
use anyhow::{bail, Context, Result};
use glob::Pattern;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

pub struct TagIndex {
    by_file: HashMap<String, Vec<Tag>>,
}

impl TagIndex {
    /// Build the index for `files`, invoking the tagging tool once per
    /// taggable path. A tool failure for any file aborts the build.
    pub fn build(
        tree_root: &Path,
        files: &[String],
        ctags: &str,
        untaggable: &[Pattern],
    ) -> Result<TagIndex> {
        let tagged: Vec<(String, Vec<Tag>)> = files
            .par_iter()
            .filter(|path| is_taggable(path, untaggable))
            .map(|path| {
                let out = tools::capture(
                    ctags,
                    &["-x", "--c-kinds=fm", path.as_str()],
                    tree_root,
                )?;
                if !out.status.success() {
                    bail!("{} failed on {} ({})", ctags, path, out.status);
                }
                let mut tags: Vec<Tag> = String::from_utf8_lossy(&out.stdout)
                    .lines()
                    .filter_map(parse_xref_line)
                    .collect();
                tags.sort_by_key(|t| t.line);
                Ok((path.clone(), tags))
            })
            .collect::<Result<_>>()
            .context("building symbol tag index")?;

        let mut by_file = HashMap::new();
        for (path, tags) in tagged {
            tracing::debug!("tagged {}: {} symbols", path, tags.len());
            by_file.insert(path, tags);
        }
        Ok(TagIndex { by_file })
    }

    /// The symbol whose tag line is the largest not exceeding `line`, or
    /// none when the file is absent from the index or every tag starts
    /// past the queried line.
    pub fn enclosing_symbol(&self, path: &str, line: u32) -> Option<&str> {
        let tags = self.by_file.get(path)?;
        let idx = tags.partition_point(|t| t.line <= line);
        if idx == 0 {
            None
        } else {
            Some(tags[idx - 1].symbol.as_str())
        }
    }

    #[cfg(test)]
    fn from_entries(entries: Vec<(&str, Vec<(u32, &str)>)>) -> TagIndex {
        let by_file = entries
            .into_iter()
            .map(|(path, tags)| {
                let mut tags: Vec<Tag> = tags
                    .into_iter()
                    .map(|(line, symbol)| Tag {
                        line,
                        symbol: symbol.to_string(),
                    })
                    .collect();
                tags.sort_by_key(|t| t.line);
                (path.to_string(), tags)
            })
            .collect();
        TagIndex { by_file }
    }
}

/// Whether the tagging tool can annotate this path at all.
fn is_taggable(path: &str, untaggable: &[Pattern]) -> bool {
    let name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    !untaggable.iter().any(|p| p.matches(&name))
}

/// One `ctags -x` line: `symbol kind line path source-text`.
fn parse_xref_line(line: &str) -> Option<Tag> {
    let mut cols = line.split_whitespace();
    let symbol = cols.next()?;
    let _kind = cols.next()?;
    let line = cols.next()?.parse().ok()?;
    Some(Tag {
        line,
        symbol: symbol.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TagIndex {
        // Deliberately unsorted input; from_entries sorts like build does.
        TagIndex::from_entries(vec![(
            "drivers/foo.c",
            vec![(40, "foo_remove"), (10, "foo_probe"), (25, "FOO_REG")],
        )])
    }

    #[test]
    fn test_lookup_at_exact_tag_line() {
        let idx = sample();
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 10), Some("foo_probe"));
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 25), Some("FOO_REG"));
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 40), Some("foo_remove"));
    }

    #[test]
    fn test_lookup_before_first_tag_is_none() {
        let idx = sample();
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 1), None);
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 9), None);
    }

    #[test]
    fn test_lookup_at_or_past_last_tag_is_last() {
        let idx = sample();
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 41), Some("foo_remove"));
        assert_eq!(
            idx.enclosing_symbol("drivers/foo.c", 100_000),
            Some("foo_remove")
        );
    }

    #[test]
    fn test_lookup_between_tags_picks_preceding() {
        let idx = sample();
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 24), Some("foo_probe"));
        assert_eq!(idx.enclosing_symbol("drivers/foo.c", 39), Some("FOO_REG"));
    }

    #[test]
    fn test_unknown_file_is_none() {
        let idx = sample();
        assert_eq!(idx.enclosing_symbol("drivers/bar.c", 10), None);
    }

    #[test]
    fn test_untaggable_names() {
        let pats = vec![
            Pattern::new("Kconfig*").unwrap(),
            Pattern::new("Makefile*").unwrap(),
        ];
        assert!(!is_taggable("drivers/foo/Kconfig", &pats));
        assert!(!is_taggable("drivers/foo/Kconfig.debug", &pats));
        assert!(!is_taggable("drivers/foo/Makefile", &pats));
        assert!(is_taggable("drivers/foo/foo.c", &pats));
    }

    #[test]
    fn test_parse_xref_line() {
        let tag =
            parse_xref_line("foo_probe        function     10 drivers/foo.c   static int foo_probe(struct device *dev)")
                .unwrap();
        assert_eq!(tag.line, 10);
        assert_eq!(tag.symbol, "foo_probe");
        assert!(parse_xref_line("").is_none());
        assert!(parse_xref_line("name kind notanumber file").is_none());
    }
}
