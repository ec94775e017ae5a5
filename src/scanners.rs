//! Line recognizers shared by the tokenizer and the host parser.

use crate::strings::{self, dedent, indentation, is_blank, leading_spaces};

/// The marker that introduces a canonical display-math block.
pub const MATH_DIRECTIVE: &str = ".. math::";

/// A canonical display-math block: a `.. math::` marker line, optional field lines, and the
/// indented body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathDirective {
    /// Byte offset just past the last line belonging to the block, excluding its newline.
    pub end: usize,
    /// The math source: the marker's argument, if any, followed by the dedented body.
    pub content: String,
    /// Set by a `:nowrap:` field.
    pub nowrap: bool,
    /// Set by a `:label:` field.
    pub label: Option<String>,
}

/// Recognize a canonical display-math block whose marker line starts at `pos`.
///
/// Body lines are those indented deeper than the marker; interior blank lines are kept and
/// trailing ones are not part of the block.  A marker with neither an argument nor a body is
/// not a block.
pub fn math_directive(input: &str, pos: usize) -> Option<MathDirective> {
    let mut lines = strings::line_spans(&input[pos..]);
    let (_, marker) = lines.next()?;
    let indent = indentation(marker);
    let argument = marker[indent..].trim_end().strip_prefix(MATH_DIRECTIVE)?;
    if !argument.is_empty() && !argument.starts_with(char::is_whitespace) {
        return None;
    }
    let argument = argument.trim();

    let mut end = pos + marker.len();
    let mut nowrap = false;
    let mut label = None;
    let mut fields_open = true;
    let mut body: Vec<&str> = vec![];
    let mut kept = 0;

    for (start, line) in lines {
        if is_blank(line) {
            fields_open = false;
            if !body.is_empty() {
                body.push(line);
            }
            continue;
        }
        if indentation(line) <= indent {
            break;
        }
        if fields_open {
            if let Some((name, value)) = field(line.trim()) {
                match name {
                    "nowrap" => nowrap = true,
                    "label" if !value.is_empty() => label = Some(value.to_string()),
                    _ => {}
                }
                end = pos + start + line.len();
                continue;
            }
            fields_open = false;
        }
        body.push(line);
        kept = body.len();
        end = pos + start + line.len();
    }
    body.truncate(kept);

    if argument.is_empty() && body.is_empty() {
        return None;
    }

    let width = body
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| indentation(line))
        .min()
        .unwrap_or(0);
    let mut content = argument.to_string();
    if !body.is_empty() {
        if !content.is_empty() {
            content.push('\n');
        }
        content.push_str(&dedent(&body, width));
    }

    Some(MathDirective {
        end,
        content,
        nowrap,
        label,
    })
}

// `:name: value` or `:name:`.
fn field(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(':')?;
    let colon = rest.find(':')?;
    let name = &rest[..colon];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, rest[colon + 1..].trim()))
}

/// An opening code fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence {
    pub fence_char: u8,
    pub fence_length: usize,
    pub info: String,
}

pub fn open_code_fence(line: &str) -> Option<Fence> {
    let indent = leading_spaces(line);
    if indent > 3 {
        return None;
    }
    let rest = &line[indent..];
    let fence_char = *rest.as_bytes().first()?;
    if fence_char != b'`' && fence_char != b'~' {
        return None;
    }
    let fence_length = rest.bytes().take_while(|&b| b == fence_char).count();
    if fence_length < 3 {
        return None;
    }
    let info = rest[fence_length..].trim();
    if fence_char == b'`' && info.contains('`') {
        return None;
    }
    Some(Fence {
        fence_char,
        fence_length,
        info: info.to_string(),
    })
}

pub fn close_code_fence(line: &str, fence: &Fence) -> bool {
    let indent = leading_spaces(line);
    if indent > 3 {
        return false;
    }
    let rest = &line[indent..];
    let run = rest.bytes().take_while(|&b| b == fence.fence_char).count();
    run >= fence.fence_length && is_blank(&rest[run..])
}
