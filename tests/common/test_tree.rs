//! Temporary source tree builder

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use test_relocator::{Relocator, RelocatorConfig, RunReport};

/// A temporary crate layout: `src/` for sources, `tests/` for output
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(dir.path().join("src")).expect("create src");
        Self { dir }
    }

    /// Add a file under `src/`
    pub fn with_source(self, relative: &str, contents: &str) -> Self {
        self.write(&format!("src/{relative}"), contents);
        self
    }

    /// Write a file relative to the tree root
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, contents).expect("write file");
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.dir.path().join(relative).exists()
    }

    pub fn config(&self) -> RelocatorConfig {
        RelocatorConfig {
            source_root: self.dir.path().join("src"),
            dest_root: self.dir.path().join("tests"),
            crate_name: Some("demo".to_string()),
            ..RelocatorConfig::default()
        }
    }

    pub fn run(&self) -> RunReport {
        self.run_with(self.config())
    }

    pub fn run_with(&self, config: RelocatorConfig) -> RunReport {
        Relocator::new(config)
            .expect("valid config")
            .run()
            .expect("run completes")
    }

    /// Every file in the tree, keyed by path relative to the root
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        let mut files = BTreeMap::new();
        collect(self.dir.path(), self.dir.path(), &mut files);
        files
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, String>) {
    for entry in fs::read_dir(dir).expect("read dir").flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).expect("under root").to_path_buf();
            files.insert(relative, fs::read_to_string(&path).expect("read file"));
        }
    }
}
