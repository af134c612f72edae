//! Post-write hook: check a TS/JS file right after an agent writes it.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use super::parse_checks;
use crate::check::files::is_source;
use crate::check::{Checker, Severity};
use crate::config::{CheckConfig, ProjectSettings};
use crate::report::HookReport;
use crate::tools::{ProcessRunner, SystemRunner};

/// Tool names that write files.
pub const WRITE_TOOLS: &[&str] = &["write_file", "edit_file", "Write", "Edit", "MultiEdit"];

/// Hook configuration. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    pub enabled: bool,
    /// Matched against the file name and the full path.
    pub file_patterns: Vec<String>,
    /// Least severe level still reported.
    pub report_level: Severity,
    /// Inject findings into the agent's context rather than only
    /// reporting a summary.
    pub auto_inject: bool,
    pub checks: Vec<String>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_patterns: ["*.ts", "*.tsx", "*.js", "*.jsx", "*.mts", "*.mjs", "*.cts", "*.cjs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            report_level: Severity::Warning,
            auto_inject: true,
            checks: ["eslint", "prettier", "tsc", "stubs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// A tool-use event as delivered by the host after a tool ran.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolEvent {
    pub tool_name: String,
    pub tool_input: serde_json::Value,
}

impl ToolEvent {
    /// The written file: `file_path`, falling back to `path`.
    pub fn file_path(&self) -> Option<&str> {
        self.tool_input
            .get("file_path")
            .or_else(|| self.tool_input.get("path"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// What the host should do after the hook ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HookOutcome {
    Continue {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_message_level: Option<Severity>,
    },
    InjectContext {
        context_injection: String,
        context_injection_role: String,
        user_message: String,
        user_message_level: Severity,
    },
}

impl HookOutcome {
    pub fn proceed() -> Self {
        HookOutcome::Continue {
            user_message: None,
            user_message_level: None,
        }
    }
}

/// Handles post-write events.
pub struct CheckHook {
    config: HookConfig,
    patterns: GlobSet,
    check_config: CheckConfig,
    runner: Arc<dyn ProcessRunner>,
    settings: Option<ProjectSettings>,
}

impl CheckHook {
    pub fn new(config: HookConfig) -> Self {
        let patterns = compile_patterns(&config.file_patterns);
        let check_config = CheckConfig::only(&parse_checks(&config.checks));
        Self {
            config,
            patterns,
            check_config,
            runner: Arc::new(SystemRunner),
            settings: None,
        }
    }

    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use fixed project settings instead of discovering them per event.
    pub fn settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// True if the path has a source extension or matches a configured pattern.
    pub fn matches(&self, file_path: &str) -> bool {
        let path = Path::new(file_path);
        is_source(path)
            || path
                .file_name()
                .is_some_and(|name| self.patterns.is_match(name))
            || self.patterns.is_match(path)
    }

    /// Handle one post-tool event.
    pub fn handle_tool_post(&self, event: &ToolEvent) -> HookOutcome {
        if !self.config.enabled || !WRITE_TOOLS.contains(&event.tool_name.as_str()) {
            return HookOutcome::proceed();
        }

        let Some(file_path) = event.file_path() else {
            return HookOutcome::proceed();
        };

        if !self.matches(file_path) || !Path::new(file_path).exists() {
            debug!("hook skipping {}", file_path);
            return HookOutcome::proceed();
        }

        let settings = self
            .settings
            .clone()
            .unwrap_or_else(ProjectSettings::from_cwd);
        let checker = Checker::with_settings(self.check_config.clone(), settings)
            .runner(self.runner.clone());

        let mut result = checker.check_paths(&[file_path], false);
        result.retain_at_least(self.config.report_level);

        if result.clean() {
            return HookOutcome::proceed();
        }

        let report = HookReport::from(&result);
        let level = if result.success() {
            Severity::Warning
        } else {
            Severity::Error
        };

        if self.config.auto_inject {
            HookOutcome::InjectContext {
                context_injection: format!(
                    "TS/JS check found issues in {}:\n{}",
                    file_path, report.issues_text
                ),
                context_injection_role: "system".to_string(),
                user_message: format!("Found {} issue(s) in {}", result.issues.len(), file_path),
                user_message_level: level,
            }
        } else {
            HookOutcome::Continue {
                user_message: Some(report.summary),
                user_message_level: Some(level),
            }
        }
    }
}

fn compile_patterns(patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("skipping invalid file pattern {:?}: {}", pattern, e),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("failed to build file patterns: {}", e);
        GlobSet::empty()
    })
}
