//! Delimiter counting, line by line
//!
//! In raw mode every opening/closing character counts. In lexical mode a
//! small lexer carried across lines skips comments, string literals, raw
//! string literals and char literals, so `"{"` or `// }` do not move the
//! balance. Lifetimes (`'a`) are told apart from char literals by looking for
//! the closing quote.

use crate::config::{DelimiterMode, Markers};

/// Delimiter characters plus the counting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: char,
    pub close: char,
    pub mode: DelimiterMode,
}

impl Delimiters {
    pub fn new(markers: &Markers, mode: DelimiterMode) -> Self {
        Self {
            open: markers.open,
            close: markers.close,
            mode,
        }
    }

    /// Start a counter with fresh lexer state
    pub fn counter(&self) -> DelimiterCounter {
        DelimiterCounter {
            delimiters: *self,
            state: LexState::Code,
            last_code: None,
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: '{',
            close: '}',
            mode: DelimiterMode::Lexical,
        }
    }
}

/// Opening and closing delimiters found on one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCount {
    pub opens: usize,
    pub closes: usize,
}

impl LineCount {
    pub fn delta(&self) -> i64 {
        self.opens as i64 - self.closes as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Code,
    BlockComment(u32),
    Str,
    RawStr(usize),
}

/// Stateful per-line delimiter counter
#[derive(Debug, Clone)]
pub struct DelimiterCounter {
    delimiters: Delimiters,
    state: LexState,
    last_code: Option<char>,
}

impl DelimiterCounter {
    /// Count delimiters on `line`, updating lexer state for the next line
    pub fn count_line(&mut self, line: &str) -> LineCount {
        match self.delimiters.mode {
            DelimiterMode::Raw => {
                self.last_code = line
                    .split("//")
                    .next()
                    .and_then(|code| code.trim_end().chars().next_back());
                LineCount {
                    opens: line.matches(self.delimiters.open).count(),
                    closes: line.matches(self.delimiters.close).count(),
                }
            }
            DelimiterMode::Lexical => self.count_lexical(line),
        }
    }

    /// Whether the previous line ended inside a string or block comment
    pub fn in_literal(&self) -> bool {
        self.state != LexState::Code
    }

    /// Last non-whitespace character of code on the previous line, ignoring
    /// comments. `None` when that line held no code.
    pub fn last_code_char(&self) -> Option<char> {
        self.last_code
    }

    fn count_lexical(&mut self, line: &str) -> LineCount {
        let chars: Vec<char> = line.chars().collect();
        let mut count = LineCount::default();
        let mut last = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            match self.state {
                LexState::BlockComment(depth) => {
                    if c == '/' && next == Some('*') {
                        self.state = LexState::BlockComment(depth + 1);
                        i += 2;
                    } else if c == '*' && next == Some('/') {
                        self.state = if depth <= 1 {
                            LexState::Code
                        } else {
                            LexState::BlockComment(depth - 1)
                        };
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                LexState::Str => {
                    if c == '\\' {
                        i += 2;
                    } else {
                        if c == '"' {
                            self.state = LexState::Code;
                            last = Some(c);
                        }
                        i += 1;
                    }
                }
                LexState::RawStr(hashes) => {
                    if c == '"' && closes_raw_string(&chars[i + 1..], hashes) {
                        self.state = LexState::Code;
                        last = Some(chars[i + hashes]);
                        i += 1 + hashes;
                    } else {
                        i += 1;
                    }
                }
                LexState::Code => {
                    if c == '/' && next == Some('/') {
                        break;
                    } else if c == '/' && next == Some('*') {
                        self.state = LexState::BlockComment(1);
                        i += 2;
                    } else if c == '"' {
                        self.state = LexState::Str;
                        i += 1;
                    } else if c == 'r' && starts_raw_string(&chars, i) {
                        let hashes = chars[i + 1..].iter().take_while(|&&h| h == '#').count();
                        self.state = LexState::RawStr(hashes);
                        i += 2 + hashes;
                    } else if c == '\'' {
                        let len = char_literal_len(&chars[i..]);
                        last = chars.get(i + len - 1).copied();
                        i += len;
                    } else {
                        if !c.is_whitespace() {
                            last = Some(c);
                        }
                        if c == self.delimiters.open {
                            count.opens += 1;
                        } else if c == self.delimiters.close {
                            count.closes += 1;
                        }
                        i += 1;
                    }
                }
            }
        }

        self.last_code = last;
        count
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `r"`, `r#"`, `br"` ... but not the tail of an identifier like `bar"`
fn starts_raw_string(chars: &[char], i: usize) -> bool {
    let prefix_ok = match i.checked_sub(1).map(|p| chars[p]) {
        None => true,
        Some('b') => i < 2 || !is_ident_char(chars[i - 2]),
        Some(p) => !is_ident_char(p),
    };
    if !prefix_ok {
        return false;
    }
    let hashes = chars[i + 1..].iter().take_while(|&&h| h == '#').count();
    chars.get(i + 1 + hashes) == Some(&'"')
}

fn closes_raw_string(rest: &[char], hashes: usize) -> bool {
    rest.len() >= hashes && rest[..hashes].iter().all(|&h| h == '#')
}

/// Length to skip for a quote in code: a whole char literal, or 1 for a lifetime
fn char_literal_len(chars: &[char]) -> usize {
    match chars.get(1) {
        Some('\\') => chars[2..]
            .iter()
            .position(|&c| c == '\'')
            .map_or(1, |p| p + 3),
        Some(_) if chars.get(2) == Some(&'\'') => 3,
        _ => 1,
    }
}
