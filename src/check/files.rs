//! Source file discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// TypeScript source extensions.
pub const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// JavaScript source extensions.
pub const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

/// True if the path has a TypeScript extension.
pub fn is_typescript(path: &Path) -> bool {
    extension(path).is_some_and(|e| TS_EXTENSIONS.contains(&e))
}

/// True if the path has a TypeScript or JavaScript extension.
pub fn is_source(path: &Path) -> bool {
    extension(path).is_some_and(|e| TS_EXTENSIONS.contains(&e) || JS_EXTENSIONS.contains(&e))
}

/// Recursively collect source files under `dir`, sorted by path.
///
/// Unreadable entries are skipped.
pub fn walk_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_source(e.path()))
        .map(|e| e.into_path())
        .collect()
}

/// Count candidate files under the given paths.
///
/// Directory arguments are expanded recursively; file arguments count if
/// they carry a recognized extension. Exclude patterns are not applied.
pub fn count_sources<P: AsRef<Path>>(paths: &[P]) -> usize {
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            if path.is_file() {
                usize::from(is_source(path))
            } else if path.is_dir() {
                walk_sources(path).len()
            } else {
                0
            }
        })
        .sum()
}
