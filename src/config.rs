//! Project discovery and check configuration.
//!
//! Configuration lives in the project's `package.json` under the
//! `"amplifier-ts-dev"` key. Any key left out keeps its default value, and a
//! missing or malformed manifest means "all defaults".

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::check::CheckKind;

/// Project manifest file name.
pub const MANIFEST_FILE: &str = "package.json";

/// TypeScript compiler config file name.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

/// Manifest key holding the checker configuration.
pub const CONFIG_KEY: &str = "amplifier-ts-dev";

const ESLINT_CONFIG_FILES: &[&str] = &[
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".eslintrc.yaml",
    ".eslintrc.yml",
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.cjs",
];

const PRETTIER_CONFIG_FILES: &[&str] = &[
    ".prettierrc",
    ".prettierrc.js",
    ".prettierrc.cjs",
    ".prettierrc.json",
    ".prettierrc.yaml",
    ".prettierrc.yml",
    ".prettierrc.toml",
    "prettier.config.js",
    "prettier.config.cjs",
];

/// Errors reading the project manifest.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// How exclude patterns are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeMode {
    /// `dir/**` = directory anywhere in the path, `*.ext` = suffix,
    /// anything else = substring.
    #[default]
    Legacy,
    /// Real glob semantics via globset.
    Glob,
}

/// A regex that flags placeholder code, with a human description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubPattern {
    pub pattern: String,
    pub description: String,
}

impl StubPattern {
    pub fn new(pattern: &str, description: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            description: description.to_string(),
        }
    }
}

/// Configuration governing one check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub enable_eslint: bool,
    pub enable_prettier: bool,
    pub enable_tsc: bool,
    pub enable_stub_check: bool,
    /// Paths to skip while walking directories.
    pub exclude_patterns: Vec<String>,
    pub exclude_mode: ExcludeMode,
    pub stub_patterns: Vec<StubPattern>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enable_eslint: true,
            enable_prettier: true,
            enable_tsc: true,
            enable_stub_check: true,
            exclude_patterns: default_exclude_patterns(),
            exclude_mode: ExcludeMode::default(),
            stub_patterns: default_stub_patterns(),
        }
    }
}

impl CheckConfig {
    /// Defaults with only the given checks enabled.
    pub fn only(checks: &[CheckKind]) -> Self {
        Self {
            enable_eslint: checks.contains(&CheckKind::Eslint),
            enable_prettier: checks.contains(&CheckKind::Prettier),
            enable_tsc: checks.contains(&CheckKind::Tsc),
            enable_stub_check: checks.contains(&CheckKind::StubCheck),
            ..Self::default()
        }
    }

    /// Defaults with every check disabled.
    pub fn none() -> Self {
        Self::only(&[])
    }

    /// Whether the given check is toggled on.
    pub fn is_enabled(&self, check: CheckKind) -> bool {
        match check {
            CheckKind::Eslint => self.enable_eslint,
            CheckKind::Prettier => self.enable_prettier,
            CheckKind::Tsc => self.enable_tsc,
            CheckKind::StubCheck => self.enable_stub_check,
        }
    }
}

/// Default exclude patterns.
pub fn default_exclude_patterns() -> Vec<String> {
    [
        "node_modules/**",
        "dist/**",
        "build/**",
        ".next/**",
        "coverage/**",
        "*.min.js",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Default stub detection rules.
pub fn default_stub_patterns() -> Vec<StubPattern> {
    vec![
        StubPattern::new(r"//\s*TODO:", "TODO comment"),
        StubPattern::new(r"//\s*FIXME:", "FIXME comment"),
        StubPattern::new(r"//\s*HACK:", "HACK comment"),
        StubPattern::new(r"//\s*XXX:", "XXX comment"),
        StubPattern::new(
            r#"throw\s+new\s+Error\s*\(\s*["']not\s+implemented"#,
            "Not implemented error",
        ),
        StubPattern::new(r#"throw\s+new\s+Error\s*\(\s*["']TODO"#, "TODO error"),
        StubPattern::new(
            r"console\.(log|debug|info)\s*\(",
            "Console statement (debugging)",
        ),
        StubPattern::new(r":\s*any\s*[;,\)\}=]", "Explicit 'any' type"),
        StubPattern::new(r"as\s+any\s*[;,\)\}]", "Type assertion to 'any'"),
    ]
}

/// What was discovered about the project around the checked files.
///
/// These flags only shape how tools are invoked; whether a check runs is
/// decided by [`CheckConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSettings {
    pub root: Option<PathBuf>,
    pub has_eslint_config: bool,
    pub has_prettier_config: bool,
    pub has_typescript_config: bool,
}

impl ProjectSettings {
    /// Discover settings starting from `start` and walking up.
    pub fn discover(start: &Path) -> Self {
        let root = find_project_root(start);
        let probe = root.clone().unwrap_or_else(|| start.to_path_buf());

        let settings = Self {
            has_eslint_config: has_eslint_config(&probe),
            has_prettier_config: has_prettier_config(&probe),
            has_typescript_config: has_typescript_config(&probe),
            root,
        };
        debug!("project settings: {:?}", settings);
        settings
    }

    /// Discover settings from the current working directory.
    pub fn from_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::discover(&cwd)
    }

    /// Path to the project's tsconfig, if the project has one.
    pub fn tsconfig_path(&self) -> Option<PathBuf> {
        match &self.root {
            Some(root) if self.has_typescript_config => Some(root.join(TSCONFIG_FILE)),
            _ => None,
        }
    }
}

/// Find the nearest directory, starting at `start`, that contains a
/// `package.json` or `tsconfig.json`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).exists() || dir.join(TSCONFIG_FILE).exists())
        .map(Path::to_path_buf)
}

/// Read and parse `package.json` in `root`.
pub fn read_manifest(root: &Path) -> Result<serde_json::Value, ConfigError> {
    let path = root.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json { path, source })
}

/// Load the check configuration for a project.
///
/// Falls back to defaults when there is no root, no manifest, or the
/// manifest (or its config section) cannot be parsed.
pub fn load_config(project_root: Option<&Path>) -> CheckConfig {
    let Some(root) = project_root else {
        return CheckConfig::default();
    };

    if !root.join(MANIFEST_FILE).exists() {
        return CheckConfig::default();
    }

    let manifest = match read_manifest(root) {
        Ok(m) => m,
        Err(e) => {
            debug!("using default config: {}", e);
            return CheckConfig::default();
        }
    };

    match manifest.get(CONFIG_KEY) {
        Some(section) => serde_json::from_value(section.clone()).unwrap_or_else(|e| {
            debug!("invalid {:?} section, using defaults: {}", CONFIG_KEY, e);
            CheckConfig::default()
        }),
        None => CheckConfig::default(),
    }
}

fn manifest_has_key(root: &Path, key: &str) -> bool {
    read_manifest(root)
        .map(|m| m.get(key).is_some())
        .unwrap_or(false)
}

/// True if the project has an ESLint configuration.
pub fn has_eslint_config(root: &Path) -> bool {
    ESLINT_CONFIG_FILES.iter().any(|f| root.join(f).exists())
        || manifest_has_key(root, "eslintConfig")
}

/// True if the project has a Prettier configuration.
pub fn has_prettier_config(root: &Path) -> bool {
    PRETTIER_CONFIG_FILES.iter().any(|f| root.join(f).exists())
        || manifest_has_key(root, "prettier")
}

/// True if the project has a tsconfig.json.
pub fn has_typescript_config(root: &Path) -> bool {
    root.join(TSCONFIG_FILE).exists()
}
