//! The `ts_check` tool: check paths or inline content on request.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::parse_checks;
use crate::check::{Checker, DEFAULT_CONTENT_FILENAME};
use crate::config::{load_config, CheckConfig, ProjectSettings};
use crate::report::ToolReport;
use crate::tools::{ProcessRunner, SystemRunner};

/// Name under which hosts register the tool.
pub const TOOL_NAME: &str = "ts_check";

/// Description shown to agents.
pub const DESCRIPTION: &str = r#"Check TypeScript/JavaScript code for quality issues.

Runs ESLint (linting), Prettier (formatting), tsc (type checking), and stub detection
on TypeScript/JavaScript files or code content.

Input options:
- paths: List of file paths or directories to check
- content: TypeScript/JavaScript code as a string to check
- fix: If true, auto-fix issues where possible (only works with paths)
- checks: Subset of checks to run (eslint, prettier, tsc, stubs)

Examples:
- Check a file: {"paths": ["src/main.ts"]}
- Check a directory: {"paths": ["src/"]}
- Check code string: {"content": "const x: any = 1;"}
- Auto-fix issues: {"paths": ["src/"], "fix": true}

Returns:
- success: True if no errors (warnings are OK)
- clean: True if no issues at all
- summary: Human-readable summary
- issues: List of issues with file, line, code, message, severity"#;

/// JSON schema of [`CheckRequest`].
pub fn input_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "paths": {
                "type": "array",
                "items": {"type": "string"},
                "description": "List of file paths or directories to check"
            },
            "content": {
                "type": "string",
                "description": "TypeScript/JavaScript code as a string to check (alternative to paths)"
            },
            "fix": {
                "type": "boolean",
                "description": "Auto-fix issues where possible",
                "default": false
            },
            "checks": {
                "type": "array",
                "items": {"type": "string", "enum": ["eslint", "prettier", "tsc", "stubs"]},
                "description": "Specific checks to run (default: all)"
            }
        }
    })
}

/// Tool call input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckRequest {
    pub paths: Vec<String>,
    pub content: Option<String>,
    pub fix: bool,
    pub checks: Option<Vec<String>>,
}

/// Tool call output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub success: bool,
    pub output: ToolReport,
}

/// Executes [`CheckRequest`]s.
#[derive(Clone)]
pub struct CheckTool {
    runner: Arc<dyn ProcessRunner>,
    settings: Option<ProjectSettings>,
}

impl Default for CheckTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckTool {
    pub fn new() -> Self {
        Self {
            runner: Arc::new(SystemRunner),
            settings: None,
        }
    }

    pub fn runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use fixed project settings instead of discovering them per call.
    pub fn settings(mut self, settings: ProjectSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Run the requested checks.
    ///
    /// An explicit `checks` list starts from defaults with only those checks
    /// enabled; otherwise the project's manifest configuration applies.
    /// Non-empty `content` takes precedence over `paths`, and with neither
    /// the current directory is checked.
    pub fn execute(&self, request: &CheckRequest) -> std::io::Result<ToolResponse> {
        let settings = self
            .settings
            .clone()
            .unwrap_or_else(ProjectSettings::from_cwd);

        let config = match &request.checks {
            Some(names) if !names.is_empty() => CheckConfig::only(&parse_checks(names)),
            _ => load_config(settings.root.as_deref()),
        };

        let checker = Checker::with_settings(config, settings).runner(self.runner.clone());

        let result = match request.content.as_deref() {
            Some(content) if !content.is_empty() => {
                checker.check_content(content, DEFAULT_CONTENT_FILENAME)?
            }
            _ => checker.check_paths(&request.paths, request.fix),
        };

        Ok(ToolResponse {
            success: result.success(),
            output: ToolReport::from(&result),
        })
    }
}
