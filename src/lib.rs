//! tscheck - TypeScript/JavaScript quality checks behind one interface.
//!
//! tscheck runs ESLint, Prettier and the TypeScript compiler as external
//! processes, scans sources for placeholder code, and normalizes every
//! finding into a single [`Issue`] model merged into one [`CheckResult`].
//!
//! # Architecture
//!
//! - `check`: issue model, orchestration and the stub scanner
//! - `tools`: adapters for the external checkers and the process runner
//! - `config`: project discovery and `package.json` configuration
//! - `report`: report views and output formatting (pretty, JSON)
//! - `surface`: tool and hook entry points for agent hosts
//!
//! Tool failures never abort a run: a missing executable, a timeout or
//! unparseable output each degrade to a synthetic issue or no issues.

pub mod check;
pub mod cli;
pub mod config;
pub mod report;
pub mod surface;
pub mod tools;

pub use check::{CheckKind, CheckResult, Checker, Issue, Severity};
pub use config::{load_config, CheckConfig, ProjectSettings};
pub use report::{HookReport, ToolReport};
pub use tools::{ProcessOutput, ProcessRunner, RunError, SystemRunner};

/// Check paths with the configuration of the project around the current
/// directory. An empty list checks the current directory.
pub fn check_files<P: AsRef<std::path::Path>>(paths: &[P], fix: bool) -> CheckResult {
    Checker::discover().check_paths(paths, fix)
}

/// Check inline source as if it were a file named `filename`.
pub fn check_content(content: &str, filename: &str) -> std::io::Result<CheckResult> {
    Checker::discover().check_content(content, filename)
}
