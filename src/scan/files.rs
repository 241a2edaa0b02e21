//! Source file discovery
//!
//! Walks the scan root with `ignore`, yielding files with the configured
//! extension. Entries that cannot be read are logged and skipped.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

/// Options for [`scan_sources`]
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Extension to match, without the dot
    pub extension: String,
    /// Directories never descended into (e.g. the destination root)
    pub exclude: Vec<PathBuf>,
    /// Directory names skipped directly under the root only
    pub skip_dirs: Vec<String>,
    /// Honour `.gitignore` files
    pub respect_gitignore: bool,
}

/// Lazily yield every source file under `root`, sorted by name per directory.
pub fn scan_sources(root: &Path, options: &ScanOptions) -> impl Iterator<Item = PathBuf> {
    let exclude = options.exclude.clone();
    let skip_dirs = options.skip_dirs.clone();
    let extension = options.extension.clone();

    WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .git_global(false)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let path = entry.path();
            entry.depth() == 0
                || (!should_skip_path(path, entry.depth(), &skip_dirs)
                    && !exclude.iter().any(|ex| path.starts_with(ex)))
        })
        .build()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                let is_file = entry.file_type().is_some_and(|t| t.is_file());
                let matches = entry
                    .path()
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == extension);
                (is_file && matches).then(|| entry.into_path())
            }
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
}

/// Path of `dest` as seen from a walk of `root`, when `dest` lies under `root`.
///
/// Used to keep generated files out of the scan when the destination tree is
/// nested inside the source tree.
pub fn nested_exclude(root: &Path, dest: &Path) -> Option<PathBuf> {
    let root_abs = root.canonicalize().ok()?;
    let dest_abs = dest.canonicalize().ok()?;
    let relative = dest_abs.strip_prefix(&root_abs).ok()?;
    Some(root.join(relative))
}

/// Check if a path should be skipped during file collection.
///
/// Hidden entries (leading `.`, which covers relocation temp files) are
/// skipped at any depth. Names in `skip_dirs` are skipped only at depth 1, so
/// a module directory such as `src/net/build/` is still scanned.
pub fn should_skip_path(path: &Path, depth: usize, skip_dirs: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with('.') || (depth == 1 && skip_dirs.iter().any(|dir| dir == name))
}
