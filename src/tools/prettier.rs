//! Prettier adapter.
//!
//! `prettier --check` lists files that would change, either as
//! `[warn] path` lines or as bare paths. Any bare line ending in a
//! recognized source extension is treated as a file name; this is a
//! heuristic inherited from how Prettier versions have printed results.

use std::path::Path;

use super::{path_args, ToolContext, ToolSpec};
use crate::check::files::is_source;
use crate::check::{CheckKind, CheckResult, Issue, Severity};

const SPEC: ToolSpec = ToolSpec {
    check: CheckKind::Prettier,
    executable: "prettier",
    display_name: "Prettier",
    package: "prettier",
};

const WARN_PREFIX: &str = "[warn]";

/// Build the Prettier argument list.
pub fn build_args(paths: &[String], fix: bool) -> Vec<String> {
    let mode = if fix { "--write" } else { "--check" };
    std::iter::once(mode.to_string())
        .chain(paths.iter().cloned())
        .collect()
}

fn format_issue(file: &str) -> Issue {
    Issue {
        file: file.to_string(),
        line: 1,
        column: 1,
        code: "FORMAT".to_string(),
        message: "File would be reformatted".to_string(),
        severity: Severity::Warning,
        source: CheckKind::Prettier,
        suggestion: Some("Run with --fix to auto-format".to_string()),
        end_line: None,
        end_column: None,
    }
}

/// Extract the files reported by `prettier --check`.
pub fn parse_check_output(output: &str) -> Vec<Issue> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            if let Some(rest) = line.strip_prefix(WARN_PREFIX) {
                let file = rest.trim();
                // Trailing summary, e.g. "Code style issues found in 2 files."
                if file.is_empty() || file.starts_with("Code style issues") {
                    return None;
                }
                Some(format_issue(file))
            } else if !line.is_empty()
                && !line.starts_with("Checking")
                && is_source(Path::new(line))
            {
                Some(format_issue(line))
            } else {
                None
            }
        })
        .collect()
}

/// Run Prettier on the given paths.
///
/// In fix mode files are rewritten in place and nothing is reported.
pub fn run<P: AsRef<Path>>(ctx: &ToolContext<'_>, paths: &[P], fix: bool) -> CheckResult {
    let targets = path_args(paths);
    if targets.is_empty() {
        return CheckResult::ran(CheckKind::Prettier);
    }
    let args = build_args(&targets, fix);

    let output = match SPEC.invoke(ctx, &args) {
        Ok(output) => output,
        Err(synthetic) => return synthetic,
    };

    if fix || output.success() {
        return CheckResult::ran(CheckKind::Prettier);
    }

    let mut issues = parse_check_output(&output.stdout);
    issues.extend(parse_check_output(&output.stderr));
    CheckResult::with_issues(CheckKind::Prettier, issues)
}
