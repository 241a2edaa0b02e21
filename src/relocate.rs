//! Relocation orchestrator
//!
//! Drives scan → detect → match → extract → {resolve, rewrite, re-indent} →
//! write for every file under the scan root, one file at a time. Per-file
//! failures become outcomes in the returned [`RunReport`]; only a bad
//! configuration or a missing root aborts the run.
//!
//! Per file:
//!
//! ```text
//! Scanning ─┬─ NoBlockFound
//!           ├─ MatchFailed ── SkippedMalformed
//!           └─ BlockMatched ─┬─ Written
//!                            └─ Skipped (collision, write failure)
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::block::{detect_blocks, split_blocks, Delimiters};
use crate::config::RelocatorConfig;
use crate::error::{RelocateError, Result};
use crate::imports::{build_header, ImportContext, ImportTable};
use crate::module_path::{destination_for, ModulePath};
use crate::reindent::{collect_fragments, FragmentKind, FragmentOptions, Fragments};
use crate::scan::{nested_exclude, scan_sources, ScanOptions};
use crate::utils::split_lines;
use crate::writer::{write_destination, write_remainder, DestinationFile};

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Blocks moved to `destination`, original truncated
    Relocated {
        destination: PathBuf,
        blocks: usize,
        tests: usize,
        support: usize,
    },
    /// No annotated block; file untouched
    NoBlockFound,
    /// A block never balanced; file untouched
    Malformed { line: usize, reason: String },
    /// Not processed (unreadable, collision, write failure)
    Skipped { kind: String, reason: String },
}

/// Outcome for one scanned file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the scan root
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Result of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub written: usize,
    pub no_block: usize,
    pub malformed: usize,
    pub skipped: usize,
    pub files: Vec<FileReport>,
}

impl RunReport {
    fn record(&mut self, path: PathBuf, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Relocated { .. } => self.written += 1,
            FileOutcome::NoBlockFound => self.no_block += 1,
            FileOutcome::Malformed { .. } => self.malformed += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
        }
        self.files.push(FileReport { path, outcome });
    }

    pub fn scanned(&self) -> usize {
        self.files.len()
    }

    /// Paths of files left untouched because a block was unbalanced
    pub fn malformed_paths(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Malformed { .. }))
            .map(|f| f.path.as_path())
    }

    /// Paths of files skipped for other reasons
    pub fn skipped_paths(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Skipped { .. }))
            .map(|f| f.path.as_path())
    }

    pub fn outcome_for(&self, path: &Path) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| &f.outcome)
    }

    /// True when no file was malformed or skipped
    pub fn is_clean(&self) -> bool {
        self.malformed == 0 && self.skipped == 0
    }

    /// 0 for a clean run, 1 when some files were malformed or skipped
    pub fn exit_code(&self) -> ExitCode {
        if self.is_clean() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }
    }
}

/// Moves inline test blocks into a mirrored test tree
#[derive(Debug, Clone)]
pub struct Relocator {
    config: RelocatorConfig,
    crate_name: String,
    delimiters: Delimiters,
    imports: ImportTable,
}

impl Relocator {
    /// Validate `config` and resolve the crate name used in imports
    pub fn new(config: RelocatorConfig) -> Result<Self> {
        config.validate()?;
        let crate_name = config.resolve_crate_name()?;
        let delimiters = Delimiters::new(&config.markers, config.delimiters);
        let imports = ImportTable::new(&config.imports, &config.namespace_separator);
        Ok(Self {
            config,
            crate_name,
            delimiters,
            imports,
        })
    }

    pub fn config(&self) -> &RelocatorConfig {
        &self.config
    }

    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    /// Process every source file under the scan root.
    pub fn run(&self) -> Result<RunReport> {
        let root = &self.config.source_root;
        if !root.is_dir() {
            return Err(RelocateError::FileNotFound {
                path: root.display().to_string(),
            });
        }

        if !self.config.dry_run {
            fs::create_dir_all(&self.config.dest_root).map_err(|source| {
                RelocateError::WriteFailure {
                    path: self.config.dest_root.clone(),
                    source,
                }
            })?;
        }

        let options = ScanOptions {
            extension: self.config.extension.clone(),
            exclude: nested_exclude(root, &self.config.dest_root)
                .into_iter()
                .collect(),
            skip_dirs: self.config.skip_dirs.clone(),
            respect_gitignore: true,
        };

        info!(
            root = %root.display(),
            dest = %self.config.dest_root.display(),
            crate_name = %self.crate_name,
            dry_run = self.config.dry_run,
            "relocating test blocks"
        );

        let mut report = RunReport {
            dry_run: self.config.dry_run,
            ..RunReport::default()
        };
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for path in scan_sources(root, &options) {
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            let outcome = match self.process_file(&path, &relative, &mut claimed) {
                Ok(outcome) => outcome,
                Err(err) => downgrade(&relative, err),
            };
            report.record(relative, outcome);
        }

        info!(
            written = report.written,
            no_block = report.no_block,
            malformed = report.malformed,
            skipped = report.skipped,
            "run complete"
        );
        Ok(report)
    }

    /// Process one file. Errors leave the file untouched; when rewriting the
    /// original fails, the destination written just before is removed again.
    pub fn process_file(
        &self,
        path: &Path,
        relative: &Path,
        claimed: &mut HashMap<PathBuf, PathBuf>,
    ) -> Result<FileOutcome> {
        let text = fs::read_to_string(path).map_err(|source| RelocateError::UnreadableFile {
            path: relative.to_path_buf(),
            source,
        })?;
        let source = split_lines(&text);

        let detection = detect_blocks(&source.lines, &self.config.markers, &self.delimiters);
        if let Some(failure) = detection.failure {
            return Err(RelocateError::UnbalancedBlock {
                path: relative.to_path_buf(),
                line: failure.marker_line + 1,
            });
        }
        if detection.spans.is_empty() {
            debug!(path = %relative.display(), "no test block");
            return Ok(FileOutcome::NoBlockFound);
        }

        let module = ModulePath::from_relative(relative, &self.config.index_names);
        let destination = destination_for(
            relative,
            &module,
            &self.config.dest_root,
            &self.config.dest_suffix,
            &self.config.extension,
        );
        self.check_collision(&destination, relative, claimed)?;

        let split = split_blocks(&source.lines, &detection.spans);
        let options = FragmentOptions {
            markers: &self.config.markers,
            delimiters: &self.delimiters,
            keep_support: self.config.keep_support,
            indent_width: self.config.indent_width,
        };
        let mut fragments = Fragments::default();
        for block in &split.blocks {
            fragments.merge(collect_fragments(block, &options));
        }

        let ctx = ImportContext {
            crate_name: &self.crate_name,
            module: &module,
            separator: &self.config.namespace_separator,
        };
        let header = build_header(&ctx, &self.imports, &fragments.uses);
        let tests = fragments.test_count();
        let support = fragments
            .items
            .iter()
            .filter(|f| f.kind == FragmentKind::Support)
            .count();
        let dest_file = DestinationFile {
            path: destination.clone(),
            header,
            fragments: fragments.items,
        };

        if !self.config.dry_run {
            // destination first: a failure here leaves the original intact
            write_destination(&dest_file, source.line_ending)?;
            if let Err(err) = write_remainder(
                path,
                &split.remainder,
                source.line_ending,
                source.trailing_newline,
            ) {
                // the tests still live in the original; drop the copy
                if let Err(cleanup) = fs::remove_file(&destination) {
                    warn!(dest = %destination.display(), error = %cleanup, "cannot remove destination");
                }
                return Err(err);
            }
        }
        claimed.insert(destination.clone(), relative.to_path_buf());

        info!(
            path = %relative.display(),
            dest = %destination.display(),
            module = %module,
            blocks = split.blocks.len(),
            tests,
            "relocated test block"
        );

        Ok(FileOutcome::Relocated {
            destination,
            blocks: split.blocks.len(),
            tests,
            support,
        })
    }

    fn check_collision(
        &self,
        destination: &Path,
        relative: &Path,
        claimed: &HashMap<PathBuf, PathBuf>,
    ) -> Result<()> {
        if let Some(previous) = claimed.get(destination) {
            return Err(RelocateError::DestinationCollision {
                destination: destination.to_path_buf(),
                claimed_by: previous.display().to_string(),
            });
        }
        if destination.exists() {
            debug!(path = %relative.display(), "destination exists on disk");
            return Err(RelocateError::DestinationCollision {
                destination: destination.to_path_buf(),
                claimed_by: "an existing file".to_string(),
            });
        }
        Ok(())
    }
}

/// Turn a per-file error into a recorded outcome
fn downgrade(relative: &Path, err: RelocateError) -> FileOutcome {
    match err {
        RelocateError::UnbalancedBlock { line, .. } => {
            warn!(path = %relative.display(), line, "unbalanced test block, file left untouched");
            FileOutcome::Malformed {
                line,
                reason: err.to_string(),
            }
        }
        other => {
            warn!(path = %relative.display(), error = %other, "skipping file");
            FileOutcome::Skipped {
                kind: other.kind().to_string(),
                reason: other.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relocator(root: &Path, dry_run: bool) -> Relocator {
        Relocator::new(RelocatorConfig {
            source_root: root.join("src"),
            dest_root: root.join("tests"),
            crate_name: Some("demo".to_string()),
            dry_run,
            ..RelocatorConfig::default()
        })
        .unwrap()
    }

    const WIDGET: &str = "pub fn double(x: u64) -> u64 {
    x * 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles() {
        assert_eq!(double(2), 4);
    }
}
";

    #[test]
    fn test_run_relocates_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/widget.rs"), WIDGET).unwrap();

        let report = relocator(dir.path(), false).run().unwrap();

        assert_eq!(report.written, 1);
        assert!(report.is_clean());
        assert_eq!(
            fs::read_to_string(dir.path().join("src/widget.rs")).unwrap(),
            "pub fn double(x: u64) -> u64 {\n    x * 2\n}\n"
        );
        let generated = fs::read_to_string(dir.path().join("tests/widget_tests.rs")).unwrap();
        assert!(generated.starts_with("use demo::widget::*;\n"));
        assert!(generated.contains("#[test]\nfn doubles() {\n    assert_eq!(double(2), 4);\n}\n"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/widget.rs"), WIDGET).unwrap();

        let report = relocator(dir.path(), true).run().unwrap();

        assert!(report.dry_run);
        assert_eq!(report.written, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("src/widget.rs")).unwrap(),
            WIDGET
        );
        assert!(!dir.path().join("tests").exists());
    }

    #[test]
    fn test_failed_rewrite_removes_destination() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/widget.rs"), WIDGET).unwrap();
        // a directory where the rewrite's temp file should go
        fs::create_dir_all(dir.path().join("src/.widget.rs.relocate.tmp")).unwrap();

        let report = relocator(dir.path(), false).run().unwrap();

        assert!(matches!(
            report.outcome_for(Path::new("widget.rs")),
            Some(FileOutcome::Skipped { kind, .. }) if kind == "write_failure"
        ));
        assert!(!dir.path().join("tests/widget_tests.rs").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("src/widget.rs")).unwrap(),
            WIDGET
        );

        // nothing left behind to collide with on the next run
        fs::remove_dir(dir.path().join("src/.widget.rs.relocate.tmp")).unwrap();
        let report = relocator(dir.path(), false).run().unwrap();
        assert_eq!(report.written, 1);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = relocator(dir.path(), false).run();
        assert!(matches!(result, Err(RelocateError::FileNotFound { .. })));
    }

    #[test]
    fn test_downgrade() {
        let outcome = downgrade(
            Path::new("a.rs"),
            RelocateError::UnbalancedBlock {
                path: PathBuf::from("a.rs"),
                line: 3,
            },
        );
        assert!(matches!(outcome, FileOutcome::Malformed { line: 3, .. }));

        let outcome = downgrade(
            Path::new("a.rs"),
            RelocateError::DestinationCollision {
                destination: PathBuf::from("tests/a_tests.rs"),
                claimed_by: "a/mod.rs".to_string(),
            },
        );
        assert!(
            matches!(outcome, FileOutcome::Skipped { ref kind, .. } if kind == "destination_collision")
        );
    }

    #[test]
    fn test_report_counts() {
        let mut report = RunReport::default();
        report.record(PathBuf::from("a.rs"), FileOutcome::NoBlockFound);
        report.record(
            PathBuf::from("b.rs"),
            FileOutcome::Malformed {
                line: 1,
                reason: "x".to_string(),
            },
        );
        assert_eq!(report.scanned(), 2);
        assert_eq!(report.no_block, 1);
        assert!(!report.is_clean());
        assert_eq!(report.malformed_paths().collect::<Vec<_>>(), vec![Path::new("b.rs")]);
        assert_eq!(report.skipped_paths().count(), 0);
        assert_eq!(report.outcome_for(Path::new("a.rs")), Some(&FileOutcome::NoBlockFound));
    }
}
