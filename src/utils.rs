//! Line-oriented text helpers
//!
//! Source files are handled as vectors of lines. These helpers split and
//! re-join text without losing the file's line ending convention, and match
//! marker tokens without accepting partial identifiers.

use serde::Serialize;

/// Line ending convention detected in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Detect from the first line break in `text` (LF when there is none)
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => Self::CrLf,
            _ => Self::Lf,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Text split into lines, remembering how to put it back together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitText {
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
    /// Whether the text ended with a line ending
    pub trailing_newline: bool,
}

/// Split `text` into lines.
///
/// Unlike `str::lines`, this records whether the final line was terminated so
/// that [`join_lines`] reproduces the input exactly.
pub fn split_lines(text: &str) -> SplitText {
    let line_ending = LineEnding::detect(text);
    if text.is_empty() {
        return SplitText {
            lines: Vec::new(),
            line_ending,
            trailing_newline: false,
        };
    }

    let trailing_newline = text.ends_with('\n');
    let body = if trailing_newline {
        &text[..text.len() - 1]
    } else {
        text
    };

    let lines = body
        .split('\n')
        .map(|line| match line_ending {
            LineEnding::CrLf => line.strip_suffix('\r').unwrap_or(line).to_string(),
            LineEnding::Lf => line.to_string(),
        })
        .collect();

    SplitText {
        lines,
        line_ending,
        trailing_newline,
    }
}

/// Join lines with `ending`, optionally terminating the last line
pub fn join_lines(lines: &[String], ending: LineEnding, trailing_newline: bool) -> String {
    let mut out = lines.join(ending.as_str());
    if trailing_newline && !lines.is_empty() {
        out.push_str(ending.as_str());
    }
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check whether `line` contains `token` as a whole token.
///
/// When the token starts (or ends) with an identifier character, the
/// neighbouring character in `line` must not be one, so `mod tests` does not
/// match `mod tests_support` and `#[test]` still matches anywhere.
pub fn contains_token(line: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let first_is_ident = token.chars().next().is_some_and(is_ident_char);
    let last_is_ident = token.chars().next_back().is_some_and(is_ident_char);

    line.match_indices(token).any(|(idx, _)| {
        let before_ok = !first_is_ident
            || line[..idx]
                .chars()
                .next_back()
                .map_or(true, |c| !is_ident_char(c));
        let after_ok = !last_is_ident
            || line[idx + token.len()..]
                .chars()
                .next()
                .map_or(true, |c| !is_ident_char(c));
        before_ok && after_ok
    })
}

/// Leading whitespace (spaces and tabs) of a line
pub fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_join_lf() {
        let text = "fn a() {}\n\nfn b() {}\n";
        let split = split_lines(text);
        assert_eq!(split.lines, vec!["fn a() {}", "", "fn b() {}"]);
        assert!(split.trailing_newline);
        assert_eq!(
            join_lines(&split.lines, split.line_ending, split.trailing_newline),
            text
        );
    }

    #[test]
    fn test_split_join_crlf_without_trailing_newline() {
        let text = "a\r\nb\r\nc";
        let split = split_lines(text);
        assert_eq!(split.line_ending, LineEnding::CrLf);
        assert_eq!(split.lines, vec!["a", "b", "c"]);
        assert!(!split.trailing_newline);
        assert_eq!(
            join_lines(&split.lines, split.line_ending, split.trailing_newline),
            text
        );
    }

    #[test]
    fn test_split_empty() {
        let split = split_lines("");
        assert!(split.lines.is_empty());
        assert_eq!(join_lines(&split.lines, split.line_ending, false), "");
    }

    #[test]
    fn test_contains_token_rejects_partial_identifier() {
        assert!(contains_token("mod tests {", "mod tests"));
        assert!(contains_token("pub mod tests{", "mod tests"));
        assert!(!contains_token("mod tests_support {", "mod tests"));
        assert!(!contains_token("mod integration_tests {", "tests"));
    }

    #[test]
    fn test_contains_token_punctuation() {
        assert!(contains_token("    #[test]", "#[test]"));
        assert!(!contains_token("    #[tokio::test]", "#[test]"));
        assert!(contains_token("#[cfg(test)] mod tests {", "#[cfg(test)]"));
    }

    #[test]
    fn test_leading_whitespace() {
        assert_eq!(leading_whitespace("    fn a()"), "    ");
        assert_eq!(leading_whitespace("\t\tx"), "\t\t");
        assert_eq!(leading_whitespace("x"), "");
        assert!(is_blank("   \t"));
    }
}
