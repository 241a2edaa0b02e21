//! Source scanning
//!
//! File discovery for the relocator. The walk is lazy and single-threaded;
//! the orchestrator processes each file as it is yielded.
//!
//! # Example
//!
//! ```ignore
//! use test_relocator::scan::{scan_sources, ScanOptions};
//!
//! let options = ScanOptions { extension: "rs".into(), ..Default::default() };
//! for path in scan_sources(Path::new("src"), &options) {
//!     println!("{}", path.display());
//! }
//! ```

mod files;

pub use files::{nested_exclude, scan_sources, should_skip_path, ScanOptions};
