//! Output rendering for warnings, stage banners, and the tools report.
//!
//! Supports `human` (default) and `json` outputs. The JSON form emits one
//! object per warning line so workers can print immediately without
//! collecting results.

use crate::models::{Stage, Warning};
use crate::utils;
use owo_colors::OwoColorize;
use serde_json::{json, Value as JsonVal};

fn use_colors(output: &str) -> bool {
    output != "json" && utils::use_colors()
}

/// Print one surviving warning in the requested format.
pub fn print_warning(warning: &Warning, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string(&compose_warning_json(warning)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            let tag = format!("⟦{}⟧", warning.category.to_lowercase());
            let (icon, tag) = match warning.category.as_str() {
                "ERROR" => {
                    if color {
                        ("✖".red().to_string(), tag.red().bold().to_string())
                    } else {
                        ("✖".to_string(), tag)
                    }
                }
                "WARNING" => {
                    if color {
                        ("▲".yellow().to_string(), tag.yellow().bold().to_string())
                    } else {
                        ("▲".to_string(), tag)
                    }
                }
                _ => {
                    if color {
                        ("◆".blue().to_string(), tag.blue().bold().to_string())
                    } else {
                        ("◆".to_string(), tag)
                    }
                }
            };
            let loc = format!("{}:{}", warning.path, warning.line);
            let loc = if color { loc.bold().to_string() } else { loc };
            let site = match &warning.symbol {
                Some(sym) => format!(" ⟨{}⟩", sym),
                None => String::new(),
            };
            println!(
                "{} {} {} ❲{}❳ {}{}",
                icon, tag, loc, warning.kind, warning.message, site
            );
        }
    }
}

/// Banner printed before each stage (human output only).
pub fn stage_banner(stage: Stage, output: &str) {
    if output == "json" {
        return;
    }
    let banner = format!("== {} ==", stage.label());
    if use_colors(output) {
        println!("{}", banner.bold());
    } else {
        println!("{}", banner);
    }
}

/// Per-stage summary for the style stage.
pub fn style_summary(warnings: usize, failures: usize, files: usize, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string(&json!({
                "summary": {"warnings": warnings, "failures": failures, "files": files}
            }))
            .unwrap()
        ),
        _ => {
            let summary = format!(
                "— Summary — warnings={} failures={} files={}",
                warnings, failures, files
            );
            if use_colors(output) {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print the external-tool version report.
pub fn print_tool_report(report: &[(String, Option<String>)], output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_tools_json(report)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            let width = report.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            for (name, version) in report {
                match version {
                    Some(v) => println!("{:width$}  {}", name, v, width = width),
                    None => {
                        let missing = if color {
                            "not found".yellow().to_string()
                        } else {
                            "not found".to_string()
                        };
                        println!("{:width$}  {}", name, missing, width = width);
                    }
                }
            }
        }
    }
}

/// Compose warning JSON (pure) for testing purposes.
pub fn compose_warning_json(warning: &Warning) -> JsonVal {
    // Directly serialize Warning, keeping stable shape
    serde_json::to_value(warning).unwrap()
}

/// Compose tools-report JSON (pure) for testing purposes.
pub fn compose_tools_json(report: &[(String, Option<String>)]) -> JsonVal {
    let items: Vec<_> = report
        .iter()
        .map(|(name, version)| {
            json!({
                "name": name,
                "version": version,
                "found": version.is_some(),
            })
        })
        .collect();
    json!({ "tools": items })
}
