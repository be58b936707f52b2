//! Text/math segmentation
//!
//! Splits raw text into an ordered sequence of [`TextSegment`]s. Four math
//! delimiter families are recognized, tried in this order at every scan
//! position:
//!
//! 1. `$$...$$` (display)
//! 2. `\[...\]` (display)
//! 3. `\(...\)` (inline)
//! 4. `$...$` (inline, opener not preceded by `\`)
//!
//! Every span closes at the nearest matching closer. Anything that does not
//! form a complete span stays in the surrounding text verbatim, so the
//! partition is lossless: [`reconstruct`] of [`segment`] gives the input back.
//!
//! ## Example
//!
//! ```rust
//! use texdocx::segment::{segment, SegmentKind};
//!
//! let segments = segment("Ans: $x^2$ done");
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1].kind, SegmentKind::Math);
//! assert_eq!(segments[1].content, "x^2");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Segment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SegmentKind {
    Text,
    Math,
}

/// The delimiter family a math segment was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MathDelimiter {
    /// `$$...$$`
    DoubleDollar,
    /// `\[...\]`
    Bracket,
    /// `\(...\)`
    Paren,
    /// `$...$`
    Dollar,
}

impl MathDelimiter {
    /// Scan priority order
    pub const PRIORITY: [MathDelimiter; 4] = [
        MathDelimiter::DoubleDollar,
        MathDelimiter::Bracket,
        MathDelimiter::Paren,
        MathDelimiter::Dollar,
    ];

    pub fn open(self) -> &'static str {
        match self {
            MathDelimiter::DoubleDollar => "$$",
            MathDelimiter::Bracket => "\\[",
            MathDelimiter::Paren => "\\(",
            MathDelimiter::Dollar => "$",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            MathDelimiter::DoubleDollar => "$$",
            MathDelimiter::Bracket => "\\]",
            MathDelimiter::Paren => "\\)",
            MathDelimiter::Dollar => "$",
        }
    }

    /// Whether the family renders as a block
    pub fn is_display(self) -> bool {
        matches!(self, MathDelimiter::DoubleDollar | MathDelimiter::Bracket)
    }

    fn index(self) -> usize {
        match self {
            MathDelimiter::DoubleDollar => 0,
            MathDelimiter::Bracket => 1,
            MathDelimiter::Paren => 2,
            MathDelimiter::Dollar => 3,
        }
    }
}

/// One contiguous run of the input
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TextSegment {
    pub kind: SegmentKind,
    /// Raw substring; delimiters are stripped for math
    pub content: String,
    /// Block-level math. Always `false` for text.
    pub display_mode: bool,
    /// Delimiter family for math, `None` for text
    pub delimiter: Option<MathDelimiter>,
}

impl TextSegment {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.into(),
            display_mode: false,
            delimiter: None,
        }
    }

    pub fn math(content: impl Into<String>, delimiter: MathDelimiter) -> Self {
        Self {
            kind: SegmentKind::Math,
            content: content.into(),
            display_mode: delimiter.is_display(),
            delimiter: Some(delimiter),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == SegmentKind::Text
    }

    pub fn is_math(&self) -> bool {
        self.kind == SegmentKind::Math
    }

    /// The segment as it appeared in the source, delimiters included
    pub fn original_form(&self) -> String {
        match self.delimiter {
            Some(d) => {
                let mut out =
                    String::with_capacity(self.content.len() + d.open().len() + d.close().len());
                out.push_str(d.open());
                out.push_str(&self.content);
                out.push_str(d.close());
                out
            }
            None => self.content.clone(),
        }
    }
}

/// Split raw text into text and math segments.
///
/// Total: never fails and never panics. The empty string yields an empty
/// sequence.
pub fn segment(raw: &str) -> Vec<TextSegment> {
    let segments = Scanner::new(raw).run();
    log::debug!(
        "segmented {} bytes into {} segments ({} math)",
        raw.len(),
        segments.len(),
        segments.iter().filter(|s| s.is_math()).count()
    );
    segments
}

/// Concatenate the original delimited forms of a segment sequence
pub fn reconstruct(segments: &[TextSegment]) -> String {
    segments.iter().map(TextSegment::original_form).collect()
}

/// Single-pass scanner over byte positions.
///
/// Delimiters are ASCII, and UTF-8 continuation bytes never equal `$` or
/// `\`, so every position the scanner slices at is a char boundary.
struct Scanner<'a> {
    input: &'a str,
    /// Start of the pending text run
    text_start: usize,
    /// Set once a closer search for a family has failed; a search from a
    /// later position cannot succeed either
    exhausted: [bool; 4],
    segments: Vec<TextSegment>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            text_start: 0,
            exhausted: [false; 4],
            segments: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<TextSegment> {
        let input = self.input;
        let bytes = input.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            if bytes[pos] != b'$' && bytes[pos] != b'\\' {
                pos += 1;
                continue;
            }

            match self.match_at(pos) {
                Some((delimiter, content_end)) => {
                    let content_start = pos + delimiter.open().len();
                    let end = content_end + delimiter.close().len();
                    self.flush_text(pos);
                    self.segments.push(TextSegment::math(
                        &self.input[content_start..content_end],
                        delimiter,
                    ));
                    self.text_start = end;
                    pos = end;
                }
                None => pos += 1,
            }
        }

        self.flush_text(bytes.len());
        self.segments
    }

    /// Try every delimiter family at `pos`, in priority order.
    /// Returns the family and the byte offset where its closer starts.
    fn match_at(&mut self, pos: usize) -> Option<(MathDelimiter, usize)> {
        for delimiter in MathDelimiter::PRIORITY {
            if !self.opens_at(delimiter, pos) {
                continue;
            }
            if let Some(close) = self.find_close(delimiter, pos + delimiter.open().len()) {
                return Some((delimiter, close));
            }
        }
        None
    }

    fn opens_at(&self, delimiter: MathDelimiter, pos: usize) -> bool {
        if !self.input[pos..].starts_with(delimiter.open()) {
            return false;
        }
        match delimiter {
            // An escaped dollar is literal text
            MathDelimiter::Dollar => pos == 0 || self.input.as_bytes()[pos - 1] != b'\\',
            _ => true,
        }
    }

    fn find_close(&mut self, delimiter: MathDelimiter, from: usize) -> Option<usize> {
        let slot = delimiter.index();
        if self.exhausted[slot] {
            return None;
        }
        match self.input[from..].find(delimiter.close()) {
            Some(offset) => Some(from + offset),
            None => {
                self.exhausted[slot] = true;
                None
            }
        }
    }

    fn flush_text(&mut self, end: usize) {
        if end > self.text_start {
            self.segments
                .push(TextSegment::text(&self.input[self.text_start..end]));
        }
    }
}
