//! ESLint adapter.
//!
//! Invoked with `--format=json`. The report is an array of per-file results,
//! each carrying a `messages` array.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use super::{path_args, ToolContext, ToolSpec};
use crate::check::{CheckKind, CheckResult, Issue, Severity};

const SPEC: ToolSpec = ToolSpec {
    check: CheckKind::Eslint,
    executable: "eslint",
    display_name: "ESLint",
    package: "eslint",
};

/// Environments used when the project has no ESLint config of its own.
const FALLBACK_ENV: &str = "browser,node,es2022";

#[derive(Debug, Deserialize)]
struct FileReport {
    #[serde(rename = "filePath", default)]
    file_path: String,
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(rename = "ruleId", default)]
    rule_id: Option<String>,
    #[serde(default)]
    severity: Option<serde_json::Value>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    line: Option<usize>,
    #[serde(default)]
    column: Option<usize>,
    #[serde(rename = "endLine", default)]
    end_line: Option<usize>,
    #[serde(rename = "endColumn", default)]
    end_column: Option<usize>,
    #[serde(default)]
    fix: Option<Fix>,
}

#[derive(Debug, Deserialize)]
struct Fix {
    #[serde(default)]
    text: Option<String>,
}

/// Build the ESLint argument list.
pub fn build_args(paths: &[String], fix: bool, has_config: bool) -> Vec<String> {
    let mut args = vec!["--format=json".to_string()];
    if fix {
        args.push("--fix".to_string());
    }
    if !has_config {
        args.extend([
            "--no-eslintrc".to_string(),
            "--env".to_string(),
            FALLBACK_ENV.to_string(),
        ]);
    }
    args.extend(paths.iter().cloned());
    args
}

/// Parse an ESLint JSON report. Unparseable output yields no issues.
pub fn parse_output(stdout: &str) -> Vec<Issue> {
    if stdout.trim().is_empty() {
        return Vec::new();
    }

    let reports: Vec<FileReport> = match serde_json::from_str(stdout) {
        Ok(r) => r,
        Err(e) => {
            debug!("unparseable eslint output: {}", e);
            return Vec::new();
        }
    };

    reports
        .into_iter()
        .flat_map(|report| {
            let file = report.file_path;
            report.messages.into_iter().map(move |msg| Issue {
                file: file.clone(),
                line: msg.line.unwrap_or(0),
                column: msg.column.unwrap_or(0),
                code: msg.rule_id.unwrap_or_else(|| "eslint".to_string()),
                message: msg.message,
                severity: Severity::from_eslint_level(
                    msg.severity.as_ref().and_then(|s| s.as_i64()),
                ),
                source: CheckKind::Eslint,
                suggestion: msg.fix.and_then(|f| f.text),
                end_line: msg.end_line,
                end_column: msg.end_column,
            })
        })
        .collect()
}

/// Run ESLint on the given paths.
pub fn run<P: AsRef<Path>>(ctx: &ToolContext<'_>, paths: &[P], fix: bool) -> CheckResult {
    let targets = path_args(paths);
    if targets.is_empty() {
        return CheckResult::ran(CheckKind::Eslint);
    }
    let args = build_args(&targets, fix, ctx.settings.has_eslint_config);

    match SPEC.invoke(ctx, &args) {
        Ok(output) => CheckResult::with_issues(CheckKind::Eslint, parse_output(&output.stdout)),
        Err(synthetic) => synthetic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectSettings;
    use crate::tools::testing::*;

    const REPORT: &str = r#"[
  {
    "filePath": "/work/web/src/app.ts",
    "messages": [
      {
        "ruleId": "no-unused-vars",
        "severity": 2,
        "message": "'user' is assigned a value but never used.",
        "line": 4,
        "column": 7,
        "nodeType": "Identifier",
        "endLine": 4,
        "endColumn": 11
      },
      {
        "ruleId": "prefer-const",
        "severity": 1,
        "message": "'count' is never reassigned. Use 'const' instead.",
        "line": 9,
        "column": 5,
        "fix": { "range": [120, 123], "text": "const" }
      }
    ],
    "errorCount": 1,
    "warningCount": 1
  },
  {
    "filePath": "/work/web/src/clean.ts",
    "messages": [],
    "errorCount": 0,
    "warningCount": 0
  },
  {
    "filePath": "/work/web/src/broken.ts",
    "messages": [
      {
        "ruleId": null,
        "fatal": true,
        "severity": 2,
        "message": "Parsing error: ';' expected.",
        "line": 2,
        "column": 14
      }
    ]
  }
]"#;

    #[test]
    fn test_parse_report() {
        let issues = parse_output(REPORT);
        assert_eq!(issues.len(), 3);

        assert_eq!(issues[0].file, "/work/web/src/app.ts");
        assert_eq!(issues[0].code, "no-unused-vars");
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!((issues[0].line, issues[0].column), (4, 7));
        assert_eq!((issues[0].end_line, issues[0].end_column), (Some(4), Some(11)));
        assert_eq!(issues[0].source, CheckKind::Eslint);

        assert_eq!(issues[1].severity, Severity::Warning);
        assert_eq!(issues[1].suggestion.as_deref(), Some("const"));

        assert_eq!(issues[2].code, "eslint");
        assert_eq!(issues[2].file, "/work/web/src/broken.ts");
    }

    #[test]
    fn test_parse_unknown_severity_is_warning() {
        let issues = parse_output(
            r#"[{"filePath": "a.js", "messages": [{"ruleId": "x", "severity": 5, "message": "m"}, {"ruleId": "y", "severity": "high", "message": "n"}]}]"#,
        );
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert_eq!((issues[0].line, issues[0].column), (0, 0));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_output("").is_empty());
        assert!(parse_output("Oops! Something went wrong!").is_empty());
        assert!(parse_output(r#"{"filePath": "a.js"}"#).is_empty());
    }

    #[test]
    fn test_build_args() {
        let paths = vec!["src".to_string()];
        assert_eq!(build_args(&paths, false, true), vec!["--format=json", "src"]);
        assert_eq!(
            build_args(&paths, true, false),
            vec![
                "--format=json",
                "--fix",
                "--no-eslintrc",
                "--env",
                "browser,node,es2022",
                "src"
            ]
        );
    }

    #[test]
    fn test_run_parses_stdout_regardless_of_exit_code() {
        let runner = ScriptedRunner::output(1, REPORT, "");
        let settings = ProjectSettings {
            has_eslint_config: true,
            ..Default::default()
        };
        let result = run(&context(&runner, &settings), &["src"], false);

        assert_eq!(result.issues.len(), 3);
        assert!(result.checks_run.contains(&CheckKind::Eslint));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, std::path::PathBuf::from("/usr/local/bin/eslint"));
        assert_eq!(calls[0].1, vec!["--format=json", "src"]);
    }

    #[test]
    fn test_run_missing_tool() {
        let runner = ScriptedRunner::new(Script::Missing);
        let settings = ProjectSettings::default();
        let result = run(&context(&runner, &settings), &["src"], false);

        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].code, "TOOL-NOT-FOUND");
        assert_eq!(result.issues[0].severity, Severity::Warning);
        assert_eq!(result.checks_run.iter().collect::<Vec<_>>(), vec![&CheckKind::Eslint]);
    }

    #[test]
    fn test_run_malformed_output_still_records_check() {
        let runner = ScriptedRunner::output(2, "not json", "crash");
        let settings = ProjectSettings::default();
        let result = run(&context(&runner, &settings), &["src"], false);

        assert!(result.clean());
        assert!(result.checks_run.contains(&CheckKind::Eslint));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_skips_when_no_usable_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let runner = ScriptedRunner::output(0, "[]", "");
        let settings = ProjectSettings::default();
        let bad = Path::new(OsStr::from_bytes(b"caf\xe9.ts"));
        let result = run(&context(&runner, &settings), &[bad], false);

        assert!(result.clean());
        assert!(result.checks_run.contains(&CheckKind::Eslint));
        assert!(runner.calls().is_empty());
    }
}
