//! Report views and output formatting.
//!
//! Two views are derived from a [`CheckResult`]:
//! - [`ToolReport`]: counts, a one-line summary and the full issue list
//! - [`HookReport`]: a compact text digest suitable for injecting into an
//!   agent's context
//!
//! Both can be printed as JSON; the tool view also has a colored terminal
//! rendering.

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::check::{CheckKind, CheckResult, Issue, Severity};

// =============================================================================
// Views
// =============================================================================

/// Structured report returned by the tool surface and `tscheck check --format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReport {
    pub success: bool,
    pub clean: bool,
    pub summary: String,
    pub files_checked: usize,
    pub checks_run: BTreeSet<CheckKind>,
    pub issues: Vec<Issue>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl From<&CheckResult> for ToolReport {
    fn from(result: &CheckResult) -> Self {
        Self {
            success: result.success(),
            clean: result.clean(),
            summary: summary(result),
            files_checked: result.files_checked,
            checks_run: result.checks_run.clone(),
            issues: result.issues.clone(),
            error_count: result.count(Severity::Error),
            warning_count: result.count(Severity::Warning),
            info_count: result.count(Severity::Info),
        }
    }
}

/// Compact digest used by the hook surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookReport {
    pub summary: String,
    /// One `  file:line:column: [code] message` line per issue.
    pub issues_text: String,
    pub has_errors: bool,
}

impl From<&CheckResult> for HookReport {
    fn from(result: &CheckResult) -> Self {
        let issues_text = result
            .issues
            .iter()
            .map(issue_line)
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            summary: format!("Found {} issue(s)", result.issues.len()),
            issues_text,
            has_errors: !result.success(),
        }
    }
}

fn issue_line(i: &Issue) -> String {
    format!(
        "  {}:{}:{}: [{}] {}",
        i.file, i.line, i.column, i.code, i.message
    )
}

/// Human-readable one-line summary. Only non-zero counts are listed.
pub fn summary(result: &CheckResult) -> String {
    let parts: Vec<String> = [
        (result.count(Severity::Error), "error"),
        (result.count(Severity::Warning), "warning"),
        (result.count(Severity::Info), "info"),
    ]
    .iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{} {}(s)", n, label))
    .collect();

    if parts.is_empty() {
        format!("All checks passed. {} file(s) checked.", result.files_checked)
    } else {
        format!(
            "Found {} in {} file(s).",
            parts.join(", "),
            result.files_checked
        )
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Print any report view as pretty JSON on stdout.
pub fn write_json<T: Serialize>(report: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(target: &str, result: &CheckResult) {
    // Header
    println!();
    print!("  ");
    print!("{}", "tscheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Checking: ".dimmed());
    println!("{}", target);
    print!("  {}", "Checks:   ".dimmed());
    if result.checks_run.is_empty() {
        println!("{}", "(none)".dimmed());
    } else {
        let names: Vec<_> = result.checks_run.iter().map(CheckKind::as_str).collect();
        println!("{}", names.join(", "));
    }
    println!();

    if !result.issues.is_empty() {
        write_issues(&result.issues);
        println!();
    }

    write_final_status(result);
    println!();
}

fn write_issues(issues: &[Issue]) {
    println!("  {} ({}):", "Issues".bold(), issues.len());
    println!();

    for i in issues {
        write_severity_tag(&i.severity);
        print!("   ");
        print!("{:<22}", format!("{}/{}", i.source, i.code).dimmed());
        if i.file.is_empty() {
            print!("{}", "(tool)".dimmed());
        } else {
            print!("{}", i.file.blue());
            if i.line > 0 {
                print!("{}", format!(":{}:{}", i.line, i.column).dimmed());
            }
        }
        println!();

        // Message on next line, indented
        println!("            {}", i.message);
        if let Some(suggestion) = &i.suggestion {
            println!("            {}", format!("hint: {}", suggestion).dimmed());
        }
        println!();
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_final_status(result: &CheckResult) {
    print!("  {}  ", summary(result));

    if result.clean() {
        print!("{}", "✓ CLEAN".green().bold());
    } else if result.success() {
        print!("{}", "✓ PASSED".green());
    } else {
        print!("{}", "✗ FAILED".red());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(file: &str, code: &str, severity: Severity) -> Issue {
        Issue {
            file: file.to_string(),
            line: 7,
            column: 3,
            code: code.to_string(),
            message: "Unexpected any. Specify a different type.".to_string(),
            severity,
            source: CheckKind::Eslint,
            suggestion: None,
            end_line: None,
            end_column: None,
        }
    }

    fn result_with(issues: Vec<Issue>) -> CheckResult {
        CheckResult {
            issues,
            files_checked: 3,
            checks_run: BTreeSet::from([CheckKind::Eslint, CheckKind::StubCheck]),
        }
    }

    #[test]
    fn test_summary_clean() {
        assert_eq!(
            summary(&result_with(vec![])),
            "All checks passed. 3 file(s) checked."
        );
    }

    #[test]
    fn test_summary_lists_nonzero_counts() {
        let result = result_with(vec![
            issue("a.ts", "no-explicit-any", Severity::Error),
            issue("a.ts", "STUB", Severity::Info),
            issue("b.ts", "STUB", Severity::Info),
        ]);
        assert_eq!(summary(&result), "Found 1 error(s), 2 info(s) in 3 file(s).");
    }

    #[test]
    fn test_tool_report() {
        let result = result_with(vec![
            issue("a.ts", "no-explicit-any", Severity::Error),
            issue("b.ts", "FORMAT", Severity::Warning),
        ]);
        let report = ToolReport::from(&result);

        assert!(!report.success);
        assert!(!report.clean);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);
        assert_eq!(report.info_count, 0);
        assert_eq!(report.files_checked, 3);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checks_run"], serde_json::json!(["eslint", "stub-check"]));
        assert_eq!(json["issues"][0]["source"], "eslint");
        assert_eq!(json["issues"][0]["severity"], "error");
    }

    #[test]
    fn test_hook_report() {
        let result = result_with(vec![
            issue("src/a.ts", "no-explicit-any", Severity::Error),
            issue("src/b.ts", "FORMAT", Severity::Warning),
        ]);
        let report = HookReport::from(&result);

        assert_eq!(report.summary, "Found 2 issue(s)");
        assert!(report.has_errors);
        assert_eq!(
            report.issues_text,
            "  src/a.ts:7:3: [no-explicit-any] Unexpected any. Specify a different type.\n  src/b.ts:7:3: [FORMAT] Unexpected any. Specify a different type."
        );
    }

    #[test]
    fn test_hook_report_warnings_only() {
        let report = HookReport::from(&result_with(vec![issue("a.ts", "STUB", Severity::Warning)]));
        assert!(!report.has_errors);
    }
}
