//! Adapters for the external checkers.
//!
//! Each adapter locates its executable, invokes it through a
//! [`ProcessRunner`] and maps the tool's native output onto [`Issue`]s:
//!
//! - `eslint`: JSON report (`--format=json`)
//! - `prettier`: `--check` file listing
//! - `tsc`: `file(line,col): error TSxxxx: message` lines
//!
//! Tool problems never abort a run. A missing executable becomes one
//! warning, a timeout one error, and unparseable output zero issues.

pub mod eslint;
mod process;
pub mod prettier;
pub mod tsc;

pub use process::SystemRunner;

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::check::{CheckKind, CheckResult, Issue, Severity};
use crate::config::ProjectSettings;

/// Upper bound for a single external invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors that can occur when invoking an external tool.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("executable not found: {0}")]
    NotFound(String),
    #[error("timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external programs. Swapped out in tests.
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args`, waiting at most `timeout`.
    fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput, RunError>;

    /// Locate an executable, preferring the project's `node_modules/.bin`.
    fn locate(&self, name: &str, project_root: Option<&Path>) -> Option<PathBuf> {
        find_executable(name, project_root)
    }
}

/// Find `name` in `<root>/node_modules/.bin`, then on `PATH`.
pub fn find_executable(name: &str, project_root: Option<&Path>) -> Option<PathBuf> {
    if let Some(root) = project_root {
        let local = root.join("node_modules").join(".bin").join(name);
        if local.exists() {
            return Some(local);
        }
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        executable_names(name)
            .into_iter()
            .map(|n| dir.join(n))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(windows)]
fn executable_names(name: &str) -> Vec<String> {
    vec![
        format!("{}.cmd", name),
        format!("{}.exe", name),
        name.to_string(),
    ]
}

#[cfg(not(windows))]
fn executable_names(name: &str) -> Vec<String> {
    vec![name.to_string()]
}

/// Everything an adapter needs to invoke its tool.
pub struct ToolContext<'a> {
    pub runner: &'a dyn ProcessRunner,
    pub settings: &'a ProjectSettings,
    pub timeout: Duration,
}

/// Static description of one external tool.
pub(crate) struct ToolSpec {
    pub check: CheckKind,
    pub executable: &'static str,
    pub display_name: &'static str,
    pub package: &'static str,
}

impl ToolSpec {
    fn not_found(&self) -> CheckResult {
        CheckResult::with_issues(
            self.check,
            vec![Issue::tool_level(
                self.check,
                "TOOL-NOT-FOUND",
                format!(
                    "{} not found. Install with: npm install -D {}",
                    self.executable, self.package
                ),
                Severity::Warning,
            )],
        )
    }

    fn timed_out(&self, timeout: Duration) -> CheckResult {
        CheckResult::with_issues(
            self.check,
            vec![Issue::tool_level(
                self.check,
                "TIMEOUT",
                format!(
                    "{} timed out after {} seconds",
                    self.display_name,
                    timeout.as_secs()
                ),
                Severity::Error,
            )],
        )
    }

    fn failed(&self, err: &std::io::Error) -> CheckResult {
        CheckResult::with_issues(
            self.check,
            vec![Issue::tool_level(
                self.check,
                "TOOL-ERROR",
                format!("failed to run {}: {}", self.executable, err),
                Severity::Error,
            )],
        )
    }

    /// Locate and run the tool. On failure, returns the synthetic result
    /// the adapter should hand back unchanged.
    pub(crate) fn invoke(
        &self,
        ctx: &ToolContext<'_>,
        args: &[String],
    ) -> Result<ProcessOutput, CheckResult> {
        let Some(program) = ctx
            .runner
            .locate(self.executable, ctx.settings.root.as_deref())
        else {
            debug!("{} not found", self.executable);
            return Err(self.not_found());
        };

        debug!("running {} {:?}", program.display(), args);
        match ctx.runner.run(&program, args, ctx.timeout) {
            Ok(output) => {
                debug!("{} exited with {:?}", self.executable, output.exit_code);
                Ok(output)
            }
            Err(RunError::NotFound(_)) => Err(self.not_found()),
            Err(RunError::Timeout(_)) => Err(self.timed_out(ctx.timeout)),
            Err(RunError::Io(e)) => Err(self.failed(&e)),
        }
    }
}

/// Convert paths into the string arguments handed to the tools. Paths that
/// are not valid UTF-8 are skipped; a lossy rendering would name a file
/// that does not exist.
pub(crate) fn path_args<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| {
            let path = p.as_ref();
            let arg = path.to_str().map(str::to_string);
            if arg.is_none() {
                warn!("skipping non UTF-8 path {}", path.display());
            }
            arg
        })
        .collect()
}
