//! Command-line interface for tscheck.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use crate::check::{CheckKind, Checker, DEFAULT_CONTENT_FILENAME};
use crate::config::{CheckConfig, ProjectSettings};
use crate::report::{self, ToolReport};
use crate::surface::hook::{CheckHook, HookConfig, ToolEvent};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// TypeScript/JavaScript quality checks in one pass.
///
/// Runs ESLint, Prettier, the TypeScript compiler and a placeholder-code
/// scanner, and reports their findings as one normalized list.
#[derive(Parser)]
#[command(name = "tscheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check files, directories or inline content
    Check(CheckArgs),
    /// Handle one post-tool event read as JSON from stdin
    Hook(HookArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Files or directories to check (default: current directory)
    pub paths: Vec<PathBuf>,

    /// Let ESLint and Prettier fix what they can
    #[arg(long)]
    pub fix: bool,

    /// Only run these checks: eslint, prettier, tsc, stubs
    #[arg(long, value_delimiter = ',')]
    pub checks: Vec<CheckKind>,

    /// Check this source text instead of paths
    #[arg(long, conflicts_with = "stdin")]
    pub content: Option<String>,

    /// Read the source text to check from stdin
    #[arg(long)]
    pub stdin: bool,

    /// File name the inline content is reported under
    #[arg(long, default_value = DEFAULT_CONTENT_FILENAME)]
    pub filename: String,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the hook command.
#[derive(Parser)]
pub struct HookArgs {
    /// Hook configuration JSON file (default: built-in defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let checker = if args.checks.is_empty() {
        Checker::discover()
    } else {
        Checker::with_settings(CheckConfig::only(&args.checks), ProjectSettings::from_cwd())
    };

    let content = if args.stdin {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading content from stdin")?;
        Some(buf)
    } else {
        args.content.clone()
    };

    let (target, result) = match content {
        Some(text) => {
            let result = checker
                .check_content(&text, &args.filename)
                .context("writing content to a temporary file")?;
            (args.filename.clone(), result)
        }
        None => {
            let target = if args.paths.is_empty() {
                ".".to_string()
            } else {
                args.paths
                    .iter()
                    .map(|p| p.to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            (target, checker.check_paths(&args.paths, args.fix))
        }
    };

    match args.format.as_str() {
        "json" => report::write_json(&ToolReport::from(&result))?,
        _ => report::write_pretty(&target, &result),
    }

    if result.success() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the hook command.
pub fn run_hook(args: &HookArgs) -> anyhow::Result<i32> {
    let config = match &args.config {
        Some(path) => load_hook_config(path)?,
        None => HookConfig::default(),
    };

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading event from stdin")?;
    let event: ToolEvent = serde_json::from_str(&input).context("parsing event JSON")?;

    let outcome = CheckHook::new(config).handle_tool_post(&event);
    report::write_json(&outcome)?;

    Ok(EXIT_SUCCESS)
}

fn load_hook_config(path: &std::path::Path) -> anyhow::Result<HookConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading hook config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing hook config {}", path.display()))
}
