//! Annotation detector
//!
//! Finds every block marker that is followed, within the lookahead window, by
//! the test container declaration with only attributes or comments in between,
//! and resolves each one with the matcher.

use super::delimiters::Delimiters;
use super::matcher::{match_block, MatchError};
use super::BlockSpan;
use crate::config::Markers;
use crate::utils::contains_token;

/// A marker whose container could not be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionFailure {
    /// Line of the block marker
    pub marker_line: usize,
    pub error: MatchError,
}

/// Everything found in one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    /// Matched blocks in file order, non-overlapping
    pub spans: Vec<BlockSpan>,
    /// Set when a block could not be balanced; detection stops there
    pub failure: Option<DetectionFailure>,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && self.failure.is_none()
    }
}

/// Whether `text` may sit between a marker and the item it annotates
fn is_attribute_or_comment(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.starts_with("#[") || text.starts_with("//") || text.starts_with("/*")
}

/// Index of the container declaration annotated by the marker at `marker_line`.
///
/// Only attributes, comments and blank lines may separate the two. Any other
/// line means the marker annotates a different item.
fn find_container(lines: &[String], marker_line: usize, markers: &Markers) -> Option<usize> {
    let line = &lines[marker_line];
    let tail = line
        .find(markers.block.as_str())
        .map(|pos| &line[pos + markers.block.len()..])?;
    if contains_token(tail, &markers.container) {
        return Some(marker_line);
    }
    if !is_attribute_or_comment(tail) {
        return None;
    }

    let last = (marker_line + markers.lookahead).min(lines.len().saturating_sub(1));
    for idx in marker_line + 1..=last {
        if contains_token(&lines[idx], &markers.container) {
            return Some(idx);
        }
        if !is_attribute_or_comment(&lines[idx]) {
            return None;
        }
    }
    None
}

/// Detect all annotated test blocks in `lines`.
pub fn detect_blocks(lines: &[String], markers: &Markers, delimiters: &Delimiters) -> Detection {
    let mut detection = Detection::default();
    let mut idx = 0;

    while idx < lines.len() {
        if !lines[idx].contains(markers.block.as_str()) {
            idx += 1;
            continue;
        }

        let Some(decl_line) = find_container(lines, idx, markers) else {
            idx += 1;
            continue;
        };

        match match_block(lines, decl_line, delimiters) {
            Ok(bounds) => {
                detection
                    .spans
                    .push(BlockSpan::new(idx, bounds.open_line, bounds.end_line));
                idx = bounds.end_line + 1;
            }
            Err(MatchError::NoBody) => idx = decl_line + 1,
            Err(error) => {
                detection.failure = Some(DetectionFailure {
                    marker_line: idx,
                    error,
                });
                break;
            }
        }
    }

    detection
}
