use crate::nodes::LineColumn;

/// Number of leading `' '` bytes.
pub fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Number of leading space or tab bytes.
pub fn indentation(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ' || b == b'\t').count()
}

pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r'))
}

/// Iterate the lines of `text` together with the byte offset each starts at.  Lines do not
/// include their terminating `\n`; a trailing `\n` does not produce an empty final line.
pub fn line_spans(text: &str) -> LineSpans<'_> {
    LineSpans { text, pos: 0 }
}

pub struct LineSpans<'t> {
    text: &'t str,
    pos: usize,
}

impl<'t> Iterator for LineSpans<'t> {
    type Item = (usize, &'t str);

    fn next(&mut self) -> Option<(usize, &'t str)> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.text[start..];
        let line = match rest.find('\n') {
            Some(nl) => {
                self.pos = start + nl + 1;
                &rest[..nl]
            }
            None => {
                self.pos = self.text.len();
                rest
            }
        };
        Some((start, line))
    }
}

/// Strip `width` bytes of indentation from each non-blank line and trailing whitespace from
/// every line, then join with `\n`.
pub fn dedent(lines: &[&str], width: usize) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !is_blank(line) {
            out.push_str(line[width.min(indentation(line))..].trim_end());
        }
    }
    out
}

/// Maps byte offsets to 1-based line and column numbers.
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { starts }
    }

    pub fn position(&self, offset: usize) -> LineColumn {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        LineColumn {
            line: line + 1,
            column: offset - self.starts[line] + 1,
        }
    }
}

/// A lookup table answering "is this byte one of `bytes`?".
pub const fn byte_set(bytes: &[u8]) -> [bool; 256] {
    let mut set = [false; 256];
    let mut i = 0;
    while i < bytes.len() {
        set[bytes[i] as usize] = true;
        i += 1;
    }
    set
}
