//! Balanced-block matcher
//!
//! Starting from a container declaration, finds the line holding the first
//! opening delimiter and the line where the delimiter balance returns to zero.

use super::delimiters::Delimiters;

/// Lines delimiting one matched container, as indices into the file's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockBounds {
    /// Line holding the first opening delimiter
    pub open_line: usize,
    /// Line on which the balance returns to zero
    pub end_line: usize,
}

/// Reasons a declaration could not be matched to a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// The declaration ends with `;` before any opening delimiter (`mod tests;`)
    NoBody,
    /// End of file reached while the balance was still positive
    Unterminated { open_line: Option<usize> },
    /// More closing than opening delimiters: the block closed mid-line
    NegativeBalance { line: usize },
}

/// Find the bounds of the block declared at `decl_line`.
pub fn match_block(
    lines: &[String],
    decl_line: usize,
    delimiters: &Delimiters,
) -> Result<BlockBounds, MatchError> {
    let mut counter = delimiters.counter();
    let mut balance: i64 = 0;
    let mut open_line = None;

    for (idx, line) in lines.iter().enumerate().skip(decl_line) {
        let count = counter.count_line(line);

        if open_line.is_none() {
            if count.opens == 0 {
                if !counter.in_literal() && line.trim_end().ends_with(';') {
                    return Err(MatchError::NoBody);
                }
                continue;
            }
            open_line = Some(idx);
        }

        balance += count.delta();
        if balance == 0 {
            return Ok(BlockBounds {
                open_line: open_line.unwrap_or(idx),
                end_line: idx,
            });
        }
        if balance < 0 {
            return Err(MatchError::NegativeBalance { line: idx });
        }
    }

    Err(MatchError::Unterminated { open_line })
}
