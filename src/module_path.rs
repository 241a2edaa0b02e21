//! Module path resolution
//!
//! Maps a source file's path relative to the scan root to the module it
//! defines (`math/utils.rs` → `math::utils`, `migration/mod.rs` → `migration`)
//! and to the mirrored destination file (`tests/math/utils_tests.rs`).

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

/// Namespaced module identifier derived from a file's location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Resolve the module defined by `relative`.
    ///
    /// The extension is dropped; a base name listed in `index_names` stands
    /// for its parent directory and contributes no segment.
    pub fn from_relative(relative: &Path, index_names: &[String]) -> Self {
        let mut segments: Vec<String> = relative
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if let Some(stem) = relative.file_stem().map(|s| s.to_string_lossy()) {
            if !index_names.iter().any(|name| name.as_str() == stem) {
                segments.push(stem.into_owned());
            }
        }

        Self { segments }
    }

    /// Parse a joined namespace string (`a::b`) back into a path
    pub fn from_namespace(namespace: &str, separator: &str) -> Self {
        let segments = namespace
            .split(separator)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for the crate root (`lib.rs`, top-level `mod.rs`)
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Join segments with the language's namespace separator
    pub fn to_namespace(&self, separator: &str) -> String {
        self.segments.join(separator)
    }

    /// The enclosing module (the root's parent is the root)
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Whether this module is `prefix` or nested inside it
    pub fn starts_with(&self, prefix: &ModulePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.to_namespace("::"))
        }
    }
}

/// Destination file for a source file.
///
/// The module path is mirrored under `dest_root`: parent segments become
/// directories and the last segment gets `suffix` appended. The crate root
/// keeps the source file's own base name (`lib.rs` → `lib_tests.rs`).
pub fn destination_for(
    relative: &Path,
    module: &ModulePath,
    dest_root: &Path,
    suffix: &str,
    extension: &str,
) -> PathBuf {
    let mut dest = dest_root.to_path_buf();
    let base = match module.segments().split_last() {
        Some((last, parents)) => {
            dest.extend(parents);
            last.clone()
        }
        None => relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    dest.push(format!("{base}{suffix}.{extension}"));
    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelocatorConfig;

    fn index() -> Vec<String> {
        RelocatorConfig::default().index_names
    }

    fn resolve(path: &str) -> ModulePath {
        ModulePath::from_relative(Path::new(path), &index())
    }

    #[test]
    fn test_plain_file() {
        let module = resolve("math/utils.rs");
        assert_eq!(module.segments(), &["math", "utils"]);
        assert_eq!(module.to_namespace("::"), "math::utils");
    }

    #[test]
    fn test_index_file_uses_directory() {
        assert_eq!(resolve("migration/mod.rs").to_namespace("::"), "migration");
        assert!(resolve("lib.rs").is_root());
        assert!(resolve("mod.rs").is_root());
    }

    #[test]
    fn test_binary_root_is_index() {
        let module = resolve("main.rs");
        assert!(module.is_root());
        let dest = destination_for(Path::new("main.rs"), &module, Path::new("tests"), "_tests", "rs");
        assert_eq!(dest, PathBuf::from("tests/main_tests.rs"));
        assert_eq!(resolve("bin/main.rs").to_namespace("::"), "bin");
    }

    #[test]
    fn test_index_name_only_matches_whole_stem() {
        assert_eq!(resolve("a/module.rs").to_namespace("::"), "a::module");
        assert_eq!(resolve("a/libs.rs").to_namespace("::"), "a::libs");
    }

    #[test]
    fn test_namespace_round_trip() {
        let module = resolve("amm/pmamm/math.rs");
        let parsed = ModulePath::from_namespace(&module.to_namespace("::"), "::");
        assert_eq!(parsed, module);
        assert_eq!(resolve("amm/pmamm/math.rs"), module);
    }

    #[test]
    fn test_parent_and_prefix() {
        let module = resolve("amm/pmamm/math.rs");
        assert_eq!(module.parent().to_namespace("::"), "amm::pmamm");
        assert!(module.starts_with(&ModulePath::from_namespace("amm", "::")));
        assert!(!module.starts_with(&ModulePath::from_namespace("am", "::")));
        assert_eq!(ModulePath::default().parent(), ModulePath::default());
    }

    #[test]
    fn test_destination_mirrors_module() {
        let rel = Path::new("feature/widget.rs");
        let dest = destination_for(rel, &resolve("feature/widget.rs"), Path::new("tests"), "_tests", "rs");
        assert_eq!(dest, PathBuf::from("tests/feature/widget_tests.rs"));
    }

    #[test]
    fn test_destination_for_root_keeps_base_name() {
        let rel = Path::new("lib.rs");
        let dest = destination_for(rel, &resolve("lib.rs"), Path::new("tests"), "_tests", "rs");
        assert_eq!(dest, PathBuf::from("tests/lib_tests.rs"));
    }

    #[test]
    fn test_index_ambiguity_collides() {
        let a = destination_for(Path::new("a/mod.rs"), &resolve("a/mod.rs"), Path::new("t"), "_tests", "rs");
        let b = destination_for(Path::new("a.rs"), &resolve("a.rs"), Path::new("t"), "_tests", "rs");
        assert_eq!(a, b);
        assert_eq!(a, PathBuf::from("t/a_tests.rs"));
    }

    #[test]
    fn test_display() {
        assert_eq!(resolve("a/b.rs").to_string(), "a::b");
        assert_eq!(resolve("lib.rs").to_string(), "<root>");
    }
}
