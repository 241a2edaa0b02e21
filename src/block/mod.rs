//! Annotated test block detection and extraction
//!
//! # Architecture
//!
//! - `delimiters`: per-line delimiter counting (raw or lexical)
//! - `matcher`: balanced-block matching from a declaration line
//! - `detector`: marker + container detection over a whole file
//!
//! This module holds the span types and the pure split of a file's lines into
//! extracted blocks and remainder.

pub mod delimiters;
pub mod detector;
pub mod matcher;

use serde::Serialize;

use crate::utils::is_blank;

pub use delimiters::{DelimiterCounter, Delimiters, LineCount};
pub use detector::{detect_blocks, Detection, DetectionFailure};
pub use matcher::{match_block, BlockBounds, MatchError};

/// One matched block: marker line, opening line and closing line (0-indexed, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockSpan {
    pub start_line: usize,
    pub open_line: usize,
    pub end_line: usize,
}

impl BlockSpan {
    /// Create a span.
    ///
    /// # Panics
    ///
    /// Panics unless `start_line <= open_line <= end_line`; a span violating
    /// this can only come from a matcher bug.
    pub fn new(start_line: usize, open_line: usize, end_line: usize) -> Self {
        assert!(
            start_line <= open_line && open_line <= end_line,
            "invalid block span {start_line}..{open_line}..{end_line}"
        );
        Self {
            start_line,
            open_line,
            end_line,
        }
    }

    /// Number of lines covered
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Lines copied out of one span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    pub span: BlockSpan,
    pub lines: Vec<String>,
}

impl ExtractedBlock {
    /// The line holding the container's opening delimiter
    pub fn container_line(&self) -> &str {
        &self.lines[self.span.open_line - self.span.start_line]
    }

    /// Lines strictly between the opening and closing lines
    pub fn body(&self) -> &[String] {
        let open = self.span.open_line - self.span.start_line;
        let end = self.span.end_line - self.span.start_line;
        if end <= open + 1 {
            &[]
        } else {
            &self.lines[open + 1..end]
        }
    }
}

/// Result of splitting a file around its blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub blocks: Vec<ExtractedBlock>,
    /// Remaining lines, trailing blank lines removed
    pub remainder: Vec<String>,
}

/// Split `lines` into the blocks covered by `spans` and everything else.
///
/// # Panics
///
/// Panics if spans are out of order, overlap, or run past the end of `lines`.
pub fn split_blocks(lines: &[String], spans: &[BlockSpan]) -> Split {
    let mut blocks = Vec::with_capacity(spans.len());
    let mut remainder = Vec::with_capacity(lines.len());
    let mut cursor = 0;

    for span in spans {
        assert!(
            span.start_line >= cursor && span.end_line < lines.len(),
            "block span {span:?} out of order or out of range"
        );
        remainder.extend_from_slice(&lines[cursor..span.start_line]);
        blocks.push(ExtractedBlock {
            span: *span,
            lines: lines[span.start_line..=span.end_line].to_vec(),
        });
        cursor = span.end_line + 1;
    }
    remainder.extend_from_slice(&lines[cursor..]);

    while remainder.last().is_some_and(|line| is_blank(line)) {
        remainder.pop();
    }

    Split { blocks, remainder }
}
