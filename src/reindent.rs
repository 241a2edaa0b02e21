//! Fragment isolation and re-indentation
//!
//! Walks the body of an extracted block and cuts it into fragments:
//! annotated test functions, `use` declarations (handed to the import
//! rewriter) and, optionally, unannotated helper items the tests depend on.
//! Each fragment loses the one indentation level the removed container added.

use serde::Serialize;

use crate::block::{DelimiterCounter, Delimiters, ExtractedBlock};
use crate::config::Markers;
use crate::utils::{contains_token, is_blank, leading_whitespace};

/// One level of indentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndentUnit {
    Tab,
    Spaces(usize),
}

impl IndentUnit {
    /// Detect the unit from the container line and the first indented body line.
    ///
    /// The unit is whatever the body adds on top of the container's own
    /// indentation; `fallback` spaces when the body gives no hint.
    pub fn detect(container_line: &str, body: &[String], fallback: usize) -> Self {
        let base = leading_whitespace(container_line);
        body.iter()
            .filter(|line| !is_blank(line))
            .map(|line| leading_whitespace(line))
            .find_map(|indent| {
                let extra = indent.strip_prefix(base)?;
                if extra.starts_with('\t') {
                    Some(Self::Tab)
                } else if extra.is_empty() {
                    None
                } else {
                    Some(Self::Spaces(extra.chars().take_while(|&c| c == ' ').count()))
                }
            })
            .unwrap_or(Self::Spaces(fallback))
    }

    /// Remove one unit from the start of `line`, if present
    pub fn strip<'a>(&self, line: &'a str) -> &'a str {
        match self {
            Self::Tab => line.strip_prefix('\t').unwrap_or(line),
            Self::Spaces(n) => {
                let spaces = line.bytes().take_while(|&b| b == b' ').count();
                if spaces >= *n {
                    &line[*n..]
                } else {
                    line
                }
            }
        }
    }

    pub fn to_indent_string(&self) -> String {
        match self {
            Self::Tab => "\t".to_string(),
            Self::Spaces(n) => " ".repeat(*n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    /// A function carrying a function-level test marker
    Test,
    /// An unannotated helper item (fn, struct, const, impl ...)
    Support,
}

/// A contiguous, re-indented piece of a block body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    /// Index of the fragment's first line within the block body
    pub body_offset: usize,
    pub lines: Vec<String>,
}

/// Everything collected from one block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    /// Test and support fragments, in source order
    pub items: Vec<Fragment>,
    /// `use` declarations, one entry per declaration
    pub uses: Vec<Vec<String>>,
    pub indent: Option<IndentUnit>,
}

impl Fragments {
    pub fn test_count(&self) -> usize {
        self.items
            .iter()
            .filter(|f| f.kind == FragmentKind::Test)
            .count()
    }

    /// Append another block's fragments
    pub fn merge(&mut self, other: Fragments) {
        self.items.extend(other.items);
        self.uses.extend(other.uses);
        self.indent = self.indent.or(other.indent);
    }
}

/// Options controlling fragment collection
#[derive(Debug, Clone, Copy)]
pub struct FragmentOptions<'a> {
    pub markers: &'a Markers,
    pub delimiters: &'a Delimiters,
    pub keep_support: bool,
    pub indent_width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Fragment(FragmentKind),
    Use,
}

struct Pending {
    kind: PendingKind,
    start: usize,
    lines: Vec<String>,
    counter: DelimiterCounter,
    balance: i64,
    opened: bool,
}

impl Pending {
    fn push(&mut self, line: &str) {
        let count = self.counter.count_line(line);
        self.opened |= count.opens > 0;
        self.balance += count.delta();
        self.lines.push(line.to_string());
    }

    fn is_complete(&self, options: &FragmentOptions<'_>) -> bool {
        if self.balance > 0 || self.counter.in_literal() {
            return false;
        }
        let last = self.counter.last_code_char();
        match self.kind {
            PendingKind::Fragment(FragmentKind::Test) => {
                self.opened
                    && self
                        .lines
                        .iter()
                        .any(|l| l.contains(options.markers.function_keyword.as_str()))
            }
            PendingKind::Use => last == Some(';'),
            PendingKind::Fragment(FragmentKind::Support) => {
                last == Some(';') || (self.opened && last == Some(options.delimiters.close))
            }
        }
    }

    /// A function marker at balance zero ends an item that never reached a
    /// recognised end, so the next test is never folded into it.
    fn yields_to(&self, line: &str, markers: &Markers) -> bool {
        self.balance <= 0
            && !self.counter.in_literal()
            && (self.opened || self.kind == PendingKind::Use)
            && has_function_marker(line, markers)
    }
}

fn has_function_marker(line: &str, markers: &Markers) -> bool {
    markers
        .function
        .iter()
        .filter(|m| !m.is_empty())
        .any(|m| contains_token(line, m))
}

fn is_use_declaration(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("use ") || trimmed.starts_with("pub use ")
}

/// Cut a block body into fragments and strip one indentation level.
pub fn collect_fragments(block: &ExtractedBlock, options: &FragmentOptions<'_>) -> Fragments {
    let body = block.body();
    let indent = IndentUnit::detect(block.container_line(), body, options.indent_width);
    let mut fragments = Fragments {
        indent: Some(indent),
        ..Fragments::default()
    };
    let mut pending: Option<Pending> = None;

    for (idx, line) in body.iter().enumerate() {
        if pending
            .as_ref()
            .is_some_and(|p| p.yields_to(line, options.markers))
        {
            if let Some(done) = pending.take() {
                finish(done, indent, options, &mut fragments);
            }
        }

        if pending.is_none() {
            if is_blank(line) {
                continue;
            }
            let kind = if has_function_marker(line, options.markers) {
                PendingKind::Fragment(FragmentKind::Test)
            } else if is_use_declaration(line) {
                PendingKind::Use
            } else {
                PendingKind::Fragment(FragmentKind::Support)
            };
            pending = Some(Pending {
                kind,
                start: idx,
                lines: Vec::new(),
                counter: options.delimiters.counter(),
                balance: 0,
                opened: false,
            });
        }
        let Some(current) = pending.as_mut() else {
            continue;
        };

        // attributes and comments above a test marker belong to the test
        if current.kind == PendingKind::Fragment(FragmentKind::Support)
            && !current.opened
            && current.balance == 0
            && has_function_marker(line, options.markers)
        {
            current.kind = PendingKind::Fragment(FragmentKind::Test);
        }

        current.push(line);

        if current.is_complete(options) {
            if let Some(done) = pending.take() {
                finish(done, indent, options, &mut fragments);
            }
        }
    }

    if let Some(mut rest) = pending.take() {
        if rest.kind == PendingKind::Fragment(FragmentKind::Test) && !rest.opened {
            rest.kind = PendingKind::Fragment(FragmentKind::Support);
        }
        finish(rest, indent, options, &mut fragments);
    }

    fragments
}

fn finish(
    mut pending: Pending,
    indent: IndentUnit,
    options: &FragmentOptions<'_>,
    fragments: &mut Fragments,
) {
    while pending.lines.last().is_some_and(|l| is_blank(l)) {
        pending.lines.pop();
    }
    let lines: Vec<String> = pending
        .lines
        .iter()
        .map(|line| indent.strip(line).to_string())
        .collect();

    match pending.kind {
        PendingKind::Use => fragments.uses.push(lines),
        PendingKind::Fragment(FragmentKind::Support) if !options.keep_support => {}
        PendingKind::Fragment(kind) => fragments.items.push(Fragment {
            kind,
            body_offset: pending.start,
            lines,
        }),
    }
}
