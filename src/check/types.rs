//! Core types for check results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Severity levels for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Ordering used for level filtering: lower is more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    /// Map an ESLint numeric severity. Anything other than 2 or 1 is a warning.
    pub fn from_eslint_level(level: Option<i64>) -> Self {
        match level {
            Some(2) => Severity::Error,
            Some(1) => Severity::Warning,
            _ => Severity::Warning,
        }
    }

    /// Map a textual severity reported by an external tool.
    /// Unrecognized values become warnings.
    pub fn from_tool_label(label: &str) -> Self {
        label.parse().unwrap_or(Severity::Warning)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// The checks that can produce issues.
///
/// Ordering follows execution order, so a sorted set of checks reads
/// the same way the orchestrator runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CheckKind {
    #[serde(rename = "eslint")]
    Eslint,
    #[serde(rename = "prettier")]
    Prettier,
    #[serde(rename = "tsc")]
    Tsc,
    #[serde(rename = "stub-check", alias = "stubs")]
    StubCheck,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Eslint,
        CheckKind::Prettier,
        CheckKind::Tsc,
        CheckKind::StubCheck,
    ];

    /// Name used for issue sources and `checks_run`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Eslint => "eslint",
            CheckKind::Prettier => "prettier",
            CheckKind::Tsc => "tsc",
            CheckKind::StubCheck => "stub-check",
        }
    }

    /// Parse a check selector as accepted by the tool and hook surfaces.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eslint" => Some(CheckKind::Eslint),
            "prettier" => Some(CheckKind::Prettier),
            "tsc" => Some(CheckKind::Tsc),
            "stubs" | "stub-check" => Some(CheckKind::StubCheck),
            _ => None,
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CheckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckKind::parse(s).ok_or_else(|| {
            format!(
                "unknown check {:?}, expected one of: eslint, prettier, tsc, stubs",
                s
            )
        })
    }
}

/// A single normalized finding, independent of the check that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Empty for tool-level problems (missing executable, timeout).
    pub file: String,
    /// 1-based; 0 when not applicable.
    pub line: usize,
    /// 1-based; 0 when not applicable.
    pub column: usize,
    pub code: String,
    pub message: String,
    pub severity: Severity,
    pub source: CheckKind,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub end_line: Option<usize>,
    #[serde(default)]
    pub end_column: Option<usize>,
}

impl Issue {
    /// Issue not tied to any file location.
    pub fn tool_level(
        source: CheckKind,
        code: &str,
        message: String,
        severity: Severity,
    ) -> Self {
        Self {
            file: String::new(),
            line: 0,
            column: 0,
            code: code.to_string(),
            message,
            severity,
            source,
            suggestion: None,
            end_line: None,
            end_column: None,
        }
    }
}

/// Outcome of one check run, possibly merged from several checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// In check execution order, then emission order. Never re-sorted.
    pub issues: Vec<Issue>,
    /// Candidate files under the checked paths.
    pub files_checked: usize,
    pub checks_run: BTreeSet<CheckKind>,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty result recording that `check` ran.
    pub fn ran(check: CheckKind) -> Self {
        Self {
            checks_run: BTreeSet::from([check]),
            ..Self::default()
        }
    }

    /// Result carrying the given issues for `check`.
    pub fn with_issues(check: CheckKind, issues: Vec<Issue>) -> Self {
        Self {
            issues,
            ..Self::ran(check)
        }
    }

    /// Merge another result into this one.
    ///
    /// Issues concatenate, `files_checked` takes the maximum (files are
    /// counted once per run, not per check) and `checks_run` is a union.
    pub fn merge(mut self, other: CheckResult) -> CheckResult {
        self.issues.extend(other.issues);
        self.files_checked = self.files_checked.max(other.files_checked);
        self.checks_run.extend(other.checks_run);
        self
    }

    /// True if no issue has error severity. Warnings are fine.
    pub fn success(&self) -> bool {
        !self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// True if there are no issues at all.
    pub fn clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Drop issues less severe than `min_level`.
    pub fn retain_at_least(&mut self, min_level: Severity) {
        self.issues.retain(|i| i.severity.rank() <= min_level.rank());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(code: &str, severity: Severity, source: CheckKind) -> Issue {
        Issue {
            file: "src/app.ts".to_string(),
            line: 3,
            column: 1,
            code: code.to_string(),
            message: format!("{} message", code),
            severity,
            source,
            suggestion: None,
            end_line: None,
            end_column: None,
        }
    }

    fn sample_results() -> (CheckResult, CheckResult, CheckResult) {
        let a = CheckResult {
            issues: vec![issue("no-unused-vars", Severity::Error, CheckKind::Eslint)],
            files_checked: 4,
            checks_run: BTreeSet::from([CheckKind::Eslint]),
        };
        let b = CheckResult {
            issues: vec![issue("FORMAT", Severity::Warning, CheckKind::Prettier)],
            files_checked: 2,
            checks_run: BTreeSet::from([CheckKind::Prettier, CheckKind::Eslint]),
        };
        let c = CheckResult {
            issues: vec![
                issue("STUB", Severity::Warning, CheckKind::StubCheck),
                issue("STUB", Severity::Info, CheckKind::StubCheck),
            ],
            files_checked: 7,
            checks_run: BTreeSet::from([CheckKind::StubCheck]),
        };
        (a, b, c)
    }

    #[test]
    fn test_merge_concatenates_in_order() {
        let (a, b, _) = sample_results();
        let merged = a.clone().merge(b.clone());

        assert_eq!(merged.issues.len(), 2);
        assert_eq!(merged.issues[0].code, "no-unused-vars");
        assert_eq!(merged.issues[1].code, "FORMAT");
        assert_eq!(merged.files_checked, 4);
        assert_eq!(merged.checks_run.len(), 2);
    }

    #[test]
    fn test_merge_is_associative() {
        let (a, b, c) = sample_results();
        let left = a.clone().merge(b.clone()).merge(c.clone());
        let right = a.merge(b.merge(c));
        assert_eq!(left, right);
    }

    #[test]
    fn test_merge_identity() {
        let (a, _, _) = sample_results();
        assert_eq!(a.clone().merge(CheckResult::new()), a);
        assert_eq!(CheckResult::new().merge(a.clone()), a);
    }

    #[test]
    fn test_merge_keeps_duplicate_issues() {
        let (a, _, _) = sample_results();
        let merged = a.clone().merge(a);
        assert_eq!(merged.issues.len(), 2);
        assert_eq!(merged.checks_run.len(), 1);
    }

    #[test]
    fn test_success_and_clean() {
        let empty = CheckResult::new();
        assert!(empty.clean());
        assert!(empty.success());

        let warnings_only = CheckResult::with_issues(
            CheckKind::Prettier,
            vec![issue("FORMAT", Severity::Warning, CheckKind::Prettier)],
        );
        assert!(!warnings_only.clean());
        assert!(warnings_only.success());

        let (a, _, _) = sample_results();
        assert!(!a.success());
    }

    #[test]
    fn test_retain_at_least() {
        let (_, _, mut c) = sample_results();
        c.retain_at_least(Severity::Warning);
        assert_eq!(c.issues.len(), 1);
        assert_eq!(c.issues[0].severity, Severity::Warning);

        c.retain_at_least(Severity::Error);
        assert!(c.clean());
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(Severity::from_eslint_level(Some(2)), Severity::Error);
        assert_eq!(Severity::from_eslint_level(Some(1)), Severity::Warning);
        assert_eq!(Severity::from_eslint_level(Some(0)), Severity::Warning);
        assert_eq!(Severity::from_eslint_level(Some(7)), Severity::Warning);
        assert_eq!(Severity::from_eslint_level(None), Severity::Warning);

        assert_eq!(Severity::from_tool_label("error"), Severity::Error);
        assert_eq!(Severity::from_tool_label("fatal"), Severity::Warning);
    }

    #[test]
    fn test_check_kind_names() {
        assert_eq!(CheckKind::parse("stubs"), Some(CheckKind::StubCheck));
        assert_eq!(CheckKind::parse("stub-check"), Some(CheckKind::StubCheck));
        assert_eq!(CheckKind::parse("jshint"), None);
        assert_eq!(CheckKind::StubCheck.to_string(), "stub-check");

        let json = serde_json::to_string(&CheckResult::ran(CheckKind::StubCheck)).unwrap();
        assert!(json.contains(r#""checks_run":["stub-check"]"#));
    }
}
