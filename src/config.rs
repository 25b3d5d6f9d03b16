//! Configuration discovery and effective settings resolution.
//!
//! Drvlint reads `drvlint.toml|yaml|yml` from the tree root and merges it
//! with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `subdir`: `drivers`
//! - `jobs`: detected core count + 2 (fixed fallback when detection fails)
//! - `output`: `human`
//! - `[tools]`: `make`, `scripts/checkpatch.pl`, `ctags`, `scripts/kernel-doc`
//! - `[style].untaggable`: `Kconfig*`, `Makefile*`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::filter;
use crate::models::SuppressRule;
use crate::utils;
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Known-good sha256 of the pinned style checker script.
pub const KNOWN_CHECKPATCH_SHA256: &str =
    "c5a47ce38a985d28bd4e2d1b6bd519117e8ddaef0b9f3265faef71a41eeb041a";

#[derive(Debug, Default, Deserialize, Clone)]
/// Tool path overrides under `[tools]`. Script paths are relative to the
/// tree root; bare names resolve on PATH.
pub struct ToolsCfg {
    pub make: Option<String>,
    pub checkpatch: Option<String>,
    pub checkpatch_sha256: Option<String>,
    pub ctags: Option<String>,
    pub kernel_doc: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Style-stage configuration under `[style]`.
pub struct StyleCfg {
    /// Extra suppress rules, appended after the built-ins.
    #[serde(default)]
    pub suppress: Vec<SuppressRule>,
    /// File-name globs the tagging tool cannot annotate.
    pub untaggable: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Semantic-stage configuration under `[semantic]`.
pub struct SemanticCfg {
    /// Substring patterns removing checker stderr lines. Empty by default.
    #[serde(default)]
    pub suppress: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `drvlint.toml|yaml`.
pub struct DrvlintConfig {
    pub subdir: Option<String>,
    pub jobs: Option<usize>,
    pub output: Option<String>,
    pub fast: Option<bool>,
    #[serde(default)]
    pub tools: Option<ToolsCfg>,
    #[serde(default)]
    pub style: Option<StyleCfg>,
    #[serde(default)]
    pub semantic: Option<SemanticCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the pipeline and stages after
/// applying precedence.
pub struct Effective {
    pub tree_root: PathBuf,
    pub subdir: String,
    pub output: String,
    pub jobs: usize,
    pub fast: bool,
    pub extra_warnings: bool,
    pub filter_output: bool,
    pub make: String,
    pub checkpatch: String,
    pub checkpatch_sha256: String,
    pub ctags: String,
    pub kernel_doc: String,
    pub suppress: Vec<SuppressRule>,
    pub semantic_suppress: Vec<String>,
    pub untaggable: Vec<Pattern>,
}

/// Load the config file from the tree root, trying TOML first and the
/// YAML spellings after it.
pub fn load_config(root: &Path) -> Option<DrvlintConfig> {
    if let Ok(s) = fs::read_to_string(root.join("drvlint.toml")) {
        match toml::from_str(&s) {
            Ok(cfg) => return Some(cfg),
            Err(err) => {
                eprintln!(
                    "{} {}",
                    utils::warn_prefix(),
                    format!("drvlint.toml is not valid TOML: {}", err)
                );
            }
        }
    }
    for name in ["drvlint.yaml", "drvlint.yml"] {
        if let Ok(s) = fs::read_to_string(root.join(name)) {
            if let Ok(cfg) = serde_yaml::from_str(&s) {
                return Some(cfg);
            }
        }
    }
    None
}

/// Worker pool width: detected core count + 2, or a fixed width when
/// detection is unavailable.
fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() + 2)
        .unwrap_or(4)
}

/// Resolve the effective configuration from CLI flags and the config
/// file, CLI taking precedence.
pub fn resolve_effective(
    tree_root: Option<&str>,
    jobs: Option<usize>,
    output: Option<&str>,
    fast: bool,
    no_extra_warnings: bool,
    no_filter: bool,
) -> Effective {
    let tree_root = PathBuf::from(tree_root.unwrap_or("."));
    let cfg = load_config(&tree_root).unwrap_or_default();
    let tools = cfg.tools.unwrap_or_default();
    let style = cfg.style.unwrap_or_default();
    let semantic = cfg.semantic.unwrap_or_default();

    let mut suppress = filter::builtin_rules();
    suppress.extend(style.suppress);

    let untaggable = style
        .untaggable
        .unwrap_or_else(|| vec!["Kconfig*".to_string(), "Makefile*".to_string()])
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pat) => Some(pat),
            Err(err) => {
                tracing::warn!("ignoring untaggable pattern {:?}: {}", p, err);
                None
            }
        })
        .collect();

    Effective {
        tree_root,
        subdir: cfg.subdir.unwrap_or_else(|| "drivers".to_string()),
        output: output
            .map(str::to_string)
            .or(cfg.output)
            .unwrap_or_else(|| "human".to_string()),
        jobs: jobs.or(cfg.jobs).unwrap_or_else(default_jobs),
        fast: fast || cfg.fast.unwrap_or(false),
        extra_warnings: !no_extra_warnings,
        filter_output: !no_filter,
        make: tools.make.unwrap_or_else(|| "make".to_string()),
        checkpatch: tools
            .checkpatch
            .unwrap_or_else(|| "scripts/checkpatch.pl".to_string()),
        checkpatch_sha256: tools
            .checkpatch_sha256
            .unwrap_or_else(|| KNOWN_CHECKPATCH_SHA256.to_string()),
        ctags: tools.ctags.unwrap_or_else(|| "ctags".to_string()),
        kernel_doc: tools
            .kernel_doc
            .unwrap_or_else(|| "scripts/kernel-doc".to_string()),
        suppress,
        semantic_suppress: semantic.suppress,
        untaggable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config() {
        let tmp = tempdir().unwrap();
        let eff = resolve_effective(tmp.path().to_str(), None, None, false, false, false);
        assert_eq!(eff.subdir, "drivers");
        assert_eq!(eff.output, "human");
        assert!(eff.jobs >= 3);
        assert!(!eff.fast);
        assert!(eff.extra_warnings);
        assert!(eff.filter_output);
        assert_eq!(eff.checkpatch, "scripts/checkpatch.pl");
        assert_eq!(eff.checkpatch_sha256, KNOWN_CHECKPATCH_SHA256);
        assert!(!eff.suppress.is_empty());
        assert!(eff.semantic_suppress.is_empty());
        assert!(eff.untaggable.iter().any(|p| p.matches("Kconfig")));
    }

    #[test]
    fn test_config_file_values_and_cli_precedence() {
        let tmp = tempdir().unwrap();
        std::fs::write(
            tmp.path().join("drvlint.toml"),
            r#"
subdir = "drivers/net/acme"
jobs = 6
output = "json"
fast = true

[tools]
checkpatch = "tools/checkpatch.pl"
checkpatch_sha256 = "deadbeef"

[style]
suppress = [{ pattern = "acme_", kind = "CAMELCASE" }]
untaggable = ["Kconfig*"]

[semantic]
suppress = ["cast to restricted __le16"]
"#,
        )
        .unwrap();

        let eff = resolve_effective(tmp.path().to_str(), None, None, false, false, false);
        assert_eq!(eff.subdir, "drivers/net/acme");
        assert_eq!(eff.jobs, 6);
        assert_eq!(eff.output, "json");
        assert!(eff.fast);
        assert_eq!(eff.checkpatch, "tools/checkpatch.pl");
        assert_eq!(eff.checkpatch_sha256, "deadbeef");
        assert_eq!(eff.semantic_suppress, vec!["cast to restricted __le16"]);
        // config rules land after the built-ins
        let last = eff.suppress.last().unwrap();
        assert_eq!(last.pattern, "acme_");
        assert_eq!(last.kind, "CAMELCASE");
        assert!(eff.suppress.len() > 1);

        // CLI wins over the file
        let eff = resolve_effective(
            tmp.path().to_str(),
            Some(2),
            Some("human"),
            false,
            false,
            false,
        );
        assert_eq!(eff.jobs, 2);
        assert_eq!(eff.output, "human");
    }

    #[test]
    fn test_yaml_fallback() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("drvlint.yaml"), "subdir: drivers/misc/acme\n").unwrap();
        let eff = resolve_effective(tmp.path().to_str(), None, None, false, false, false);
        assert_eq!(eff.subdir, "drivers/misc/acme");
    }

    #[test]
    fn test_disable_flags() {
        let tmp = tempdir().unwrap();
        let eff = resolve_effective(tmp.path().to_str(), None, None, true, true, true);
        assert!(eff.fast);
        assert!(!eff.extra_warnings);
        assert!(!eff.filter_output);
    }
}
