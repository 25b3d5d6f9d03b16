//! Supporting helpers: colored message prefixes and path display.

use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Colors are used unless NO_COLOR is set.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn warn_prefix() -> String {
    if use_colors() {
        "warning:".yellow().bold().to_string()
    } else {
        "warning:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors() {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Render a path relative to the working directory when possible.
pub fn rel_to_wd(path: &Path) -> String {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    pathdiff::diff_paths(path, &cwd)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_to_wd_keeps_relative_paths() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(rel_to_wd(&cwd.join("drivers/foo.c")), "drivers/foo.c");
    }
}
