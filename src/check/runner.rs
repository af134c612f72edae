//! Orchestrates the enabled checks and merges their results.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::files::count_sources;
use super::{detect_stubs, CheckResult};
use crate::config::{load_config, CheckConfig, ProjectSettings};
use crate::tools::{
    eslint, prettier, tsc, ProcessRunner, SystemRunner, ToolContext, DEFAULT_TIMEOUT,
};

/// Virtual file name used for inline content when the caller gives none.
pub const DEFAULT_CONTENT_FILENAME: &str = "stdin.ts";

const TEMP_PREFIX: &str = "tscheck-";

/// Runs ESLint, Prettier, tsc and the stub scanner, in that order.
///
/// A checker is an immutable snapshot of configuration and project
/// settings; build a new one to pick up manifest changes.
pub struct Checker {
    config: CheckConfig,
    settings: ProjectSettings,
    runner: Arc<dyn ProcessRunner>,
    timeout: Duration,
}

impl Checker {
    /// Create a checker with an explicit configuration. Project settings are
    /// discovered from the current directory.
    pub fn new(config: CheckConfig) -> Self {
        Self::with_settings(config, ProjectSettings::from_cwd())
    }

    /// Create a checker for an already discovered project.
    pub fn with_settings(config: CheckConfig, settings: ProjectSettings) -> Self {
        Self {
            config,
            settings,
            runner: Arc::new(SystemRunner),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a checker configured from the project around the current
    /// directory.
    pub fn discover() -> Self {
        let settings = ProjectSettings::from_cwd();
        let config = load_config(settings.root.as_deref());
        Self::with_settings(config, settings)
    }

    /// Use a different process runner.
    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Set the per-tool timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    pub fn project(&self) -> &ProjectSettings {
        &self.settings
    }

    /// Check files and directories. An empty list means the current directory.
    ///
    /// `fix` is passed to ESLint and Prettier only.
    pub fn check_paths<P: AsRef<Path>>(&self, paths: &[P], fix: bool) -> CheckResult {
        let paths: Vec<PathBuf> = if paths.is_empty() {
            vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
        } else {
            paths.iter().map(|p| p.as_ref().to_path_buf()).collect()
        };

        let mut result = CheckResult {
            files_checked: count_sources(&paths),
            ..CheckResult::default()
        };
        debug!("checking {} file(s) under {:?}", result.files_checked, paths);

        let ctx = ToolContext {
            runner: self.runner.as_ref(),
            settings: &self.settings,
            timeout: self.timeout,
        };

        if self.config.enable_eslint {
            result = result.merge(eslint::run(&ctx, &paths, fix));
        }
        if self.config.enable_prettier {
            result = result.merge(prettier::run(&ctx, &paths, fix));
        }
        if self.config.enable_tsc {
            result = result.merge(tsc::run(&ctx, &paths));
        }
        if self.config.enable_stub_check {
            result = result.merge(detect_stubs(&paths, &self.config));
        }

        result
    }

    /// Check a snippet of source as if it were a file named `filename`.
    ///
    /// The content is written to a temporary file carrying the same
    /// extension (`.ts` if `filename` has none). Reported paths are mapped
    /// back to `filename`, and the temporary file is removed on return.
    pub fn check_content(&self, content: &str, filename: &str) -> io::Result<CheckResult> {
        let suffix = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_else(|| ".ts".to_string());

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile()?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;

        let temp_path = temp.path().to_path_buf();
        let mut result = self.check_paths(&[&temp_path], false);

        for issue in &mut result.issues {
            if refers_to(&issue.file, &temp_path) {
                issue.file = filename.to_string();
            }
        }

        Ok(result)
    }
}

/// True if a reported path names the temporary file, either verbatim or by
/// its unique file name (tools may print it relative to their cwd).
fn refers_to(reported: &str, temp_path: &Path) -> bool {
    if reported.is_empty() {
        return false;
    }
    let reported = Path::new(reported);
    reported == temp_path
        || (reported.file_name().is_some() && reported.file_name() == temp_path.file_name())
}
