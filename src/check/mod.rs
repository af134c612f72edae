//! Check orchestration, the issue model and the in-process stub scanner.

pub mod exclude;
pub mod files;
mod runner;
mod stubs;
mod types;

pub use exclude::{build_filter, GlobFilter, LegacyFilter, PathFilter};
pub use runner::{Checker, DEFAULT_CONTENT_FILENAME};
pub use stubs::{detect_stubs, STUB_CODE};
pub use types::{CheckKind, CheckResult, Issue, Severity};
