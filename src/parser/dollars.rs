//! The dollar-math tokenizer.
//!
//! Splits a unit of prose into text, inline math (`$...$`) and display math (`$$...$$`, or a
//! canonical `.. math::` block) in one left-to-right pass.  Heuristics for telling a currency
//! dollar from a delimiter follow <https://pandoc.org/MANUAL.html#extension-tex_math_dollars>.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::Error;
use crate::scanners;
use crate::strings::is_blank;

/// What a segment of scanned text is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum SegmentKind {
    /// Literal prose.
    Text,
    /// Math rendered within a line of text.
    InlineMath,
    /// Math rendered as its own block.
    DisplayMath,
}

impl SegmentKind {
    /// The name of this kind: `text`, `inline-math` or `display-math`.
    pub fn name(self) -> &'static str {
        match self {
            SegmentKind::Text => "text",
            SegmentKind::InlineMath => "inline-math",
            SegmentKind::DisplayMath => "display-math",
        }
    }

    /// Whether this kind is inline or display math.
    pub fn is_math(self) -> bool {
        !matches!(self, SegmentKind::Text)
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SegmentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SegmentKind::Text),
            "inline-math" => Ok(SegmentKind::InlineMath),
            "display-math" => Ok(SegmentKind::DisplayMath),
            _ => Err(Error::UnrecognizedSegmentKind(s.to_string())),
        }
    }
}

/// A recognized pair of math delimiters.
#[derive(Debug, PartialEq, Eq)]
pub struct DelimiterRule {
    /// The token that opens a span.
    pub open: &'static str,
    /// The token that closes a span.
    pub close: &'static str,
    /// The kind of segment the span becomes.
    pub kind: SegmentKind,
    /// Whether a closing token inside an open `{...}` group is content rather than a closer.
    pub balanced: bool,
}

/// The delimiter table, longest opener first.
pub static DELIMITERS: [DelimiterRule; 2] = [
    DelimiterRule {
        open: "$$",
        close: "$$",
        kind: SegmentKind::DisplayMath,
        balanced: true,
    },
    DelimiterRule {
        open: "$",
        close: "$",
        kind: SegmentKind::InlineMath,
        balanced: true,
    },
];

/// One classified span of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'i> {
    /// What the span is.
    pub kind: SegmentKind,

    /// For math, the source between the delimiters.  For text, the span with the backslash of
    /// every `\$` removed.
    pub content: Cow<'i, str>,

    /// The byte range of the span in the input, delimiters included.  The spans of all
    /// segments of an input are contiguous and cover it exactly.
    pub span: Range<usize>,
}

impl<'i> Segment<'i> {
    /// The original text of this segment.
    pub fn source<'s>(&self, input: &'s str) -> &'s str {
        &input[self.span.clone()]
    }

    /// Whether this segment is inline or display math.
    pub fn is_math(&self) -> bool {
        self.kind.is_math()
    }
}

/// Why an opened math span fell back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFailure {
    /// The input ended before the closing delimiter.
    Unterminated,
    /// Inline math reached a blank line before its closing delimiter.
    BlankLine,
    /// Inline math reached a `$` that cannot close it: one preceded by whitespace or followed
    /// by a digit.  Scanning resumes at that `$`.
    Interrupted,
}

/// A math span that was opened but never closed, and so was kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDiagnostic {
    /// Byte offset of the opening delimiter.
    pub offset: usize,
    /// The opening delimiter.
    pub delimiter: &'static str,
    pub reason: ScanFailure,
}

impl fmt::Display for ScanDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ScanFailure::Unterminated => write!(
                f,
                "unterminated `{}` opened at byte {}",
                self.delimiter, self.offset
            ),
            ScanFailure::BlankLine => write!(
                f,
                "`{}` opened at byte {} not closed before a blank line",
                self.delimiter, self.offset
            ),
            ScanFailure::Interrupted => write!(
                f,
                "`{}` opened at byte {} interrupted by a `$` that cannot close it",
                self.delimiter, self.offset
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenMath {
    rule: &'static DelimiterRule,
    start: usize,
    content_start: usize,
    last_newline: Option<usize>,
    // Escaped dollars recorded before the span opened.
    unescaped: usize,
}

#[derive(Debug, Default)]
struct ScanState {
    open: Option<OpenMath>,
    depth: usize,
}

/// Split `input` into segments.
///
/// ```
/// use mathdollar::{scan, SegmentKind};
///
/// let kinds: Vec<(SegmentKind, String)> = scan("cost is $x+1$ dollars")
///     .map(|s| (s.kind, s.content.into_owned()))
///     .collect();
/// assert_eq!(kinds, vec![
///     (SegmentKind::Text, "cost is ".to_string()),
///     (SegmentKind::InlineMath, "x+1".to_string()),
///     (SegmentKind::Text, " dollars".to_string()),
/// ]);
/// ```
pub fn scan(input: &str) -> Segments<'_> {
    Segments::new(input)
}

/// The lazy segment sequence of one input.  See [`scan`].
#[derive(Debug)]
pub struct Segments<'i> {
    input: &'i str,
    pos: usize,
    text_start: usize,
    unescaped: Vec<usize>,
    state: ScanState,
    queued: Option<Segment<'i>>,
    diagnostics: Vec<ScanDiagnostic>,
}

impl<'i> Segments<'i> {
    /// Start scanning `input`.  Nothing is scanned until the first call to `next`.
    pub fn new(input: &'i str) -> Self {
        Segments {
            input,
            pos: 0,
            text_start: 0,
            unescaped: vec![],
            state: ScanState::default(),
            queued: None,
            diagnostics: vec![],
        }
    }

    /// The input being scanned.
    pub fn input(&self) -> &'i str {
        self.input
    }

    /// Math spans that fell back to text so far.  Complete once the iterator is exhausted.
    pub fn diagnostics(&self) -> &[ScanDiagnostic] {
        &self.diagnostics
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.input.as_bytes()[self.pos - 1] == b'\n'
    }

    fn scan_text(&mut self) -> Option<Segment<'i>> {
        if self.at_line_start() {
            if let Some(block) = scanners::math_directive(self.input, self.pos) {
                let span = self.pos..block.end;
                self.pos = block.end;
                return Some(Segment {
                    kind: SegmentKind::DisplayMath,
                    content: Cow::Owned(block.content),
                    span,
                });
            }
        }

        let bytes = self.input.as_bytes();
        let matcher = jetscii::bytes!(b'$', b'\\', b'\n');
        match matcher.find(&bytes[self.pos..]) {
            Some(offset) => self.pos += offset,
            None => {
                self.pos = bytes.len();
                return None;
            }
        }

        match bytes[self.pos] {
            b'\\' => self.skip_escape(),
            b'$' => self.open(),
            _ => self.pos += 1,
        }
        None
    }

    fn scan_math(&mut self, open: OpenMath) -> Option<Segment<'i>> {
        let bytes = self.input.as_bytes();
        let matcher = jetscii::bytes!(b'$', b'\\', b'{', b'}', b'\n');
        match matcher.find(&bytes[self.pos..]) {
            Some(offset) => self.pos += offset,
            None => {
                self.pos = bytes.len();
                return None;
            }
        }

        match bytes[self.pos] {
            b'\\' => self.skip_escape(),
            b'{' if open.rule.balanced => {
                self.state.depth += 1;
                self.pos += 1;
            }
            b'}' if open.rule.balanced => {
                self.state.depth = self.state.depth.saturating_sub(1);
                self.pos += 1;
            }
            b'\n' => {
                if open.rule.kind == SegmentKind::InlineMath {
                    if let Some(previous) = open.last_newline {
                        if is_blank(&self.input[previous + 1..self.pos]) {
                            // Resume as text at this newline.
                            self.abandon(ScanFailure::BlankLine);
                            return None;
                        }
                    }
                }
                self.state.open = Some(OpenMath {
                    last_newline: Some(self.pos),
                    ..open
                });
                self.pos += 1;
            }
            b'$' => {
                if self.state.depth == 0 {
                    if let Some(end) = self.closer_end(&open) {
                        return self.close(open, end);
                    }
                    if open.rule.kind == SegmentKind::InlineMath {
                        // Resume as text at this `$`, which may open math of its own.
                        self.abandon(ScanFailure::Interrupted);
                        return None;
                    }
                }
                self.pos += 1;
            }
            _ => self.pos += 1,
        }
        None
    }

    // The backslash at `pos` and the character it escapes are consumed together.  Escaped
    // dollars are recorded inside math too, in case the span falls back to text.
    fn skip_escape(&mut self) {
        match self.input[self.pos + 1..].chars().next() {
            None | Some('\n') => self.pos += 1,
            Some(c) => {
                if c == '$' {
                    self.unescaped.push(self.pos);
                }
                self.pos += 1 + c.len_utf8();
            }
        }
    }

    fn open(&mut self) {
        let start = self.pos;
        let rest = &self.input[start..];
        let rule = match DELIMITERS.iter().find(|rule| rest.starts_with(rule.open)) {
            Some(rule) => rule,
            None => {
                self.pos += 1;
                return;
            }
        };

        // space not allowed after initial $
        if rule.kind == SegmentKind::InlineMath
            && rest[rule.open.len()..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace)
        {
            self.pos += 1;
            return;
        }

        self.state = ScanState {
            open: Some(OpenMath {
                rule,
                start,
                content_start: start + rule.open.len(),
                last_newline: None,
                unescaped: self.unescaped.len(),
            }),
            depth: 0,
        };
        self.pos = start + rule.open.len();
    }

    fn closer_end(&self, open: &OpenMath) -> Option<usize> {
        let rest = &self.input[self.pos..];
        if !rest.starts_with(open.rule.close) {
            return None;
        }

        if open.rule.kind == SegmentKind::InlineMath {
            // space not allowed before ending $
            if self.input[..self.pos]
                .chars()
                .next_back()
                .map_or(false, char::is_whitespace)
            {
                return None;
            }

            // ending $ can't be followed by a digit
            if rest[open.rule.close.len()..]
                .chars()
                .next()
                .map_or(false, |c| c.is_ascii_digit())
            {
                return None;
            }
        }

        Some(self.pos + open.rule.close.len())
    }

    fn close(&mut self, open: OpenMath, end: usize) -> Option<Segment<'i>> {
        self.state = ScanState::default();
        self.unescaped.truncate(open.unescaped);
        let content = &self.input[open.content_start..self.pos];
        self.pos = end;

        // `$$$$` stays text.
        if content.is_empty() {
            return None;
        }

        Some(Segment {
            kind: open.rule.kind,
            content: Cow::Borrowed(content),
            span: open.start..end,
        })
    }

    // The open span rejoins the pending text run as-is.
    fn abandon(&mut self, reason: ScanFailure) {
        if let Some(open) = self.state.open.take() {
            self.diagnostics.push(ScanDiagnostic {
                offset: open.start,
                delimiter: open.rule.open,
                reason,
            });
        }
        self.state.depth = 0;
    }

    fn flush_text(&mut self, end: usize) -> Option<Segment<'i>> {
        let start = self.text_start;
        self.text_start = end;
        if start >= end {
            self.unescaped.clear();
            return None;
        }

        let content = if self.unescaped.is_empty() {
            Cow::Borrowed(&self.input[start..end])
        } else {
            let mut owned = String::with_capacity(end - start);
            let mut from = start;
            for &backslash in &self.unescaped {
                owned.push_str(&self.input[from..backslash]);
                from = backslash + 1;
            }
            owned.push_str(&self.input[from..end]);
            self.unescaped.clear();
            Cow::Owned(owned)
        };

        Some(Segment {
            kind: SegmentKind::Text,
            content,
            span: start..end,
        })
    }
}

impl<'i> Iterator for Segments<'i> {
    type Item = Segment<'i>;

    fn next(&mut self) -> Option<Segment<'i>> {
        if let Some(segment) = self.queued.take() {
            return Some(segment);
        }

        while self.pos < self.input.len() {
            let math = match self.state.open {
                Some(open) => self.scan_math(open),
                None => self.scan_text(),
            };

            if let Some(math) = math {
                let text = self.flush_text(math.span.start);
                self.text_start = math.span.end;
                return match text {
                    Some(text) => {
                        self.queued = Some(math);
                        Some(text)
                    }
                    None => Some(math),
                };
            }
        }

        self.abandon(ScanFailure::Unterminated);
        self.flush_text(self.input.len())
    }
}

impl std::iter::FusedIterator for Segments<'_> {}
