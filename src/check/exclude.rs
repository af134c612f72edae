//! Exclude pattern matching for directory walks.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::warn;

use crate::config::{CheckConfig, ExcludeMode};

/// Decides whether a walked path should be skipped.
pub trait PathFilter: Send + Sync {
    fn is_excluded(&self, path: &Path) -> bool;
}

/// Approximate matcher kept for compatibility with existing configs.
///
/// - `dir/**` matches when `dir` occurs anywhere in the path
/// - `*.ext` matches when the path ends with `.ext`
/// - anything else matches by substring
pub struct LegacyFilter {
    patterns: Vec<String>,
}

impl LegacyFilter {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.to_vec(),
        }
    }
}

impl PathFilter for LegacyFilter {
    fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");

        self.patterns.iter().any(|pattern| {
            if let Some(dir) = pattern.strip_suffix("/**") {
                path_str.contains(dir)
            } else if let Some(suffix) = pattern.strip_prefix('*').filter(|s| s.starts_with('.')) {
                path_str.ends_with(suffix)
            } else {
                path_str.contains(pattern.as_str())
            }
        })
    }
}

/// Glob matcher. Relative patterns also match at any depth.
pub struct GlobFilter {
    set: GlobSet,
}

impl GlobFilter {
    /// Build from patterns, skipping (and logging) any that fail to compile.
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let mut variants = vec![pattern.clone()];
            if !pattern.starts_with('/') && !pattern.starts_with("**/") {
                variants.push(format!("**/{}", pattern));
            }
            for variant in variants {
                match Glob::new(&variant) {
                    Ok(glob) => {
                        builder.add(glob);
                    }
                    Err(e) => warn!("invalid exclude pattern {:?}: {}", pattern, e),
                }
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            warn!("failed to build exclude set: {}", e);
            GlobSet::empty()
        });
        Self { set }
    }
}

impl PathFilter for GlobFilter {
    fn is_excluded(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }
}

/// Build the filter selected by the configuration.
pub fn build_filter(config: &CheckConfig) -> Box<dyn PathFilter> {
    match config.exclude_mode {
        ExcludeMode::Legacy => Box::new(LegacyFilter::new(&config.exclude_patterns)),
        ExcludeMode::Glob => Box::new(GlobFilter::new(&config.exclude_patterns)),
    }
}
