//! TypeScript compiler adapter.
//!
//! Runs `tsc --noEmit --pretty false` and parses diagnostics of the form
//! `file(line,col): error TSxxxx: message`.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use super::{path_args, ToolContext, ToolSpec};
use crate::check::files::is_typescript;
use crate::check::{CheckKind, CheckResult, Issue, Severity};
use crate::config::ProjectSettings;

const SPEC: ToolSpec = ToolSpec {
    check: CheckKind::Tsc,
    executable: "tsc",
    display_name: "TypeScript compiler",
    package: "typescript",
};

lazy_static! {
    static ref DIAGNOSTIC: Regex =
        Regex::new(r"^(.+?)\((\d+),(\d+)\):\s+(error|warning)\s+(TS\d+):\s+(.+)").unwrap();
}

/// Build the tsc argument list.
///
/// With a tsconfig the project drives file selection; without one the
/// given paths are checked with permissive JS support and strict typing.
pub fn build_args(paths: &[String], tsconfig: Option<&Path>) -> Vec<String> {
    let mut args: Vec<String> = ["--noEmit", "--pretty", "false"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    match tsconfig {
        Some(config) => {
            args.push("--project".to_string());
            args.push(config.to_string_lossy().to_string());
        }
        None => {
            args.extend(
                ["--allowJs", "--checkJs", "--strict"]
                    .iter()
                    .map(|s| s.to_string()),
            );
            args.extend(paths.iter().cloned());
        }
    }

    args
}

/// Parse `tsc --pretty false` output. Lines that aren't diagnostics are ignored.
pub fn parse_output(stdout: &str) -> Vec<Issue> {
    stdout
        .lines()
        .filter_map(|line| {
            let caps = DIAGNOSTIC.captures(line.trim())?;
            Some(Issue {
                file: caps[1].to_string(),
                line: caps[2].parse().unwrap_or(0),
                column: caps[3].parse().unwrap_or(0),
                code: caps[5].to_string(),
                message: caps[6].to_string(),
                severity: Severity::from_tool_label(&caps[4]),
                source: CheckKind::Tsc,
                suggestion: None,
                end_line: None,
                end_column: None,
            })
        })
        .collect()
}

/// True when type checking has something to look at: either a TypeScript
/// file among the arguments or a project tsconfig.
pub fn should_run<P: AsRef<Path>>(paths: &[P], settings: &ProjectSettings) -> bool {
    settings.has_typescript_config
        || paths.iter().any(|p| {
            let path = p.as_ref();
            path.is_file() && is_typescript(path)
        })
}

/// Run the TypeScript compiler.
pub fn run<P: AsRef<Path>>(ctx: &ToolContext<'_>, paths: &[P]) -> CheckResult {
    if !should_run(paths, ctx.settings) {
        return CheckResult::ran(CheckKind::Tsc);
    }

    let tsconfig = ctx.settings.tsconfig_path();
    let args = build_args(&path_args(paths), tsconfig.as_deref());

    match SPEC.invoke(ctx, &args) {
        Ok(output) => CheckResult::with_issues(CheckKind::Tsc, parse_output(&output.stdout)),
        Err(synthetic) => synthetic,
    }
}
