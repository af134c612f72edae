//! Line-oriented detection of placeholder code.
//!
//! Each configured pattern is searched case-insensitively on every line of
//! every candidate file. Matches in places where such code is expected
//! (tests, tool configs, type declarations, debug output in scripts) are
//! suppressed.

use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::exclude::{build_filter, PathFilter};
use super::files::{is_source, walk_sources};
use super::{CheckKind, CheckResult, Issue, Severity};
use crate::config::{CheckConfig, StubPattern};

/// Code used for every stub finding.
pub const STUB_CODE: &str = "STUB";

const STUB_SUGGESTION: &str = "Remove placeholder or implement functionality";

/// Maximum number of characters of the offending line quoted in messages.
const SNIPPET_CHARS: usize = 60;

/// Build/test tool configs that routinely log to the console.
const TOOL_CONFIG_FILES: &[&str] = &["jest.config.js", "webpack.config.js", "vite.config.ts"];

const DECLARATION_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];

/// Pre-compiled pattern with metadata.
struct CompiledPattern {
    regex: Regex,
    description: String,
}

fn compile_patterns(patterns: &[StubPattern]) -> Vec<CompiledPattern> {
    patterns
        .iter()
        .filter_map(|p| {
            match RegexBuilder::new(&p.pattern).case_insensitive(true).build() {
                Ok(regex) => Some(CompiledPattern {
                    regex,
                    description: p.description.clone(),
                }),
                Err(e) => {
                    warn!("skipping invalid stub pattern {:?}: {}", p.pattern, e);
                    None
                }
            }
        })
        .collect()
}

/// Scan the given files and directories for stub patterns.
///
/// File arguments are scanned directly; directories are walked and filtered
/// through the configured exclude patterns. Unreadable files are skipped.
pub fn detect_stubs<P: AsRef<Path>>(paths: &[P], config: &CheckConfig) -> CheckResult {
    let compiled = compile_patterns(&config.stub_patterns);
    let filter = build_filter(config);
    let files = candidate_files(paths, filter.as_ref());

    let issues: Vec<Issue> = files
        .par_iter()
        .map(|file| scan_file(file, &compiled))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    CheckResult::with_issues(CheckKind::StubCheck, issues)
}

fn candidate_files<P: AsRef<Path>>(paths: &[P], filter: &dyn PathFilter) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for p in paths {
        let path = p.as_ref();
        if path.is_file() {
            if is_source(path) {
                files.push(path.to_path_buf());
            }
        } else if path.is_dir() {
            files.extend(
                walk_sources(path)
                    .into_iter()
                    .filter(|f| !filter.is_excluded(f)),
            );
        }
    }

    files
}

/// Scan a single file. Returns nothing if the file can't be read as UTF-8.
fn scan_file(file_path: &Path, patterns: &[CompiledPattern]) -> Vec<Issue> {
    let content = match fs::read_to_string(file_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("skipping {}: {}", file_path.display(), e);
            return Vec::new();
        }
    };

    let file_str = file_path.to_string_lossy().to_string();
    let mut issues = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        for p in patterns {
            if !p.regex.is_match(line) || is_expected_here(file_path, line) {
                continue;
            }

            issues.push(Issue {
                file: file_str.clone(),
                line: line_num + 1,
                column: 1,
                code: STUB_CODE.to_string(),
                message: format!("{}: {}", p.description, snippet(line)),
                severity: Severity::Warning,
                source: CheckKind::StubCheck,
                suggestion: Some(STUB_SUGGESTION.to_string()),
                end_line: None,
                end_column: None,
            });
        }
    }

    issues
}

fn snippet(line: &str) -> String {
    line.trim().chars().take(SNIPPET_CHARS).collect()
}

/// Check if a matched line is legitimate where it appears.
///
/// Rules are checked in order and the first match wins.
fn is_expected_here(file_path: &Path, line: &str) -> bool {
    let path_str = file_path.to_string_lossy().to_lowercase().replace('\\', "/");

    // Tests are allowed to have mocks and stubs
    if path_str.contains("test") || path_str.contains("spec") || path_str.contains("__tests__") {
        return true;
    }

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if TOOL_CONFIG_FILES.contains(&file_name.as_str()) {
        return true;
    }

    // Declaration files may use `any` legitimately
    if DECLARATION_SUFFIXES.iter().any(|s| file_name.ends_with(s)) {
        return true;
    }

    // Console output is the point of scripts and tools
    if (path_str.contains("/scripts/") || path_str.contains("/tools/")) && line.contains("console.")
    {
        return true;
    }

    false
}
