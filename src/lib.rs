//! test-relocator: move inline test blocks into a mirrored test tree
//!
//! This library finds annotation-marked test blocks (`#[cfg(test)] mod tests
//! { ... }`) in a tree of source files, lifts each one out with a
//! delimiter-aware matcher, and writes its test functions to
//! `tests/<module path>_tests.rs` with the imports they need. The original file
//! keeps everything but the removed block.
//!
//! The engine works on lines and delimiter balance, not on a full grammar.
//!
//! # Pipeline
//!
//! - `scan`: lazy directory walk by extension
//! - `block`: marker detection, balanced-block matching, extraction
//! - `module_path`: relative path → module path and destination path
//! - `imports`: header of wildcard, ambient and rewritten imports
//! - `reindent`: test/helper fragments with one indent level removed
//! - `writer`: atomic writes of destination and remainder
//! - `relocate`: per-file orchestration and the run report
//!
//! # Example
//!
//! ```ignore
//! use test_relocator::{Relocator, RelocatorConfig};
//!
//! let config = RelocatorConfig {
//!     crate_name: Some("betting_platform".into()),
//!     ..RelocatorConfig::default()
//! };
//! let report = Relocator::new(config)?.run()?;
//! println!("{} files relocated", report.written);
//! ```

pub mod block;
pub mod cli;
pub mod config;
pub mod error;
pub mod imports;
pub mod module_path;
pub mod reindent;
pub mod relocate;
pub mod report;
pub mod scan;
pub mod utils;
pub mod writer;

// Re-export commonly used types
pub use block::{detect_blocks, split_blocks, BlockSpan, Delimiters, ExtractedBlock};
pub use cli::{Cli, OutputFormat};
pub use config::{DelimiterMode, ImportProfile, Markers, RelocatorConfig};
pub use error::{RelocateError, Result};
pub use module_path::{destination_for, ModulePath};
pub use reindent::{collect_fragments, Fragment, FragmentKind, IndentUnit};
pub use relocate::{FileOutcome, FileReport, Relocator, RunReport};
pub use report::format_report;
