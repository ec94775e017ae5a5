//! Rewrites `\[ ... \]` display blocks into canonical `.. math::` blocks before the host
//! parses the document.
//!
//! A block opens with `\[` at the start of a line, after any number of spaces (its
//! indentation), and closes at the first `\]` preceded by at least that many spaces.  Blocks
//! that never close are left alone.  Nested `\[`/`\]` pairs inside a block are not balanced.

use std::borrow::Cow;

use crate::scanners::MATH_DIRECTIVE;
use crate::strings::leading_spaces;

/// The indentation added to the interior of a rewritten block.
pub const INDENT: &str = "   ";

const OPEN: &str = "\\[";
const CLOSE: &str = "\\]";

#[derive(Debug, Clone, Copy)]
struct Closer {
    at: usize,
    spaces: usize,
}

/// Rewrite every balanced `\[ ... \]` block in `input`.
///
/// ```
/// use mathdollar::normalize_display_blocks;
///
/// let out = normalize_display_blocks("Area:\n\\[\n  a < b\n\n  c\n\\]\n");
/// assert_eq!(out, "Area:\n\n.. math::\n\n   a \\lt  b\n   c\n\n\n");
/// ```
pub fn normalize_display_blocks(input: &str) -> Cow<'_, str> {
    let closers: Vec<Closer> = input
        .match_indices(CLOSE)
        .map(|(at, _)| Closer {
            at,
            spaces: input[..at].bytes().rev().take_while(|&b| b == b' ').count(),
        })
        .collect();
    if closers.is_empty() {
        return Cow::Borrowed(input);
    }

    // latest[k] is the position of the last closer preceded by at least k spaces.
    let widest = closers.iter().map(|c| c.spaces).max().unwrap_or(0);
    let mut latest: Vec<Option<usize>> = vec![None; widest + 1];
    for closer in &closers {
        latest[closer.spaces] = Some(closer.at);
    }
    for k in (0..widest).rev() {
        latest[k] = latest[k].max(latest[k + 1]);
    }

    let mut out = String::new();
    let mut copied = 0;
    let mut cursor = 0;
    let mut pos = 0;

    while pos < input.len() {
        let line_end = input[pos..].find('\n').map_or(input.len(), |i| pos + i);
        let indent = leading_spaces(&input[pos..line_end]);

        if input[pos + indent..line_end].starts_with(OPEN) {
            let interior = pos + indent + OPEN.len();
            let reachable = latest
                .get(indent)
                .copied()
                .flatten()
                .map_or(false, |at| at >= interior + indent);

            if reachable {
                while closers[cursor].at < interior {
                    cursor += 1;
                }
                let closer = closers[cursor..]
                    .iter()
                    .find(|c| c.spaces >= indent && c.at >= interior + indent);

                if let Some(closer) = closer {
                    let tab = &input[pos..pos + indent];
                    if let Some(block) = display_block(tab, &input[interior..closer.at - indent]) {
                        out.push_str(&input[copied..pos]);
                        out.push_str(&block);
                        copied = closer.at + CLOSE.len();
                        pos = input[copied..]
                            .find('\n')
                            .map_or(input.len(), |i| copied + i + 1);
                        continue;
                    }
                }
            }
        }

        pos = line_end + 1;
    }

    if copied == 0 {
        return Cow::Borrowed(input);
    }
    out.push_str(&input[copied..]);
    Cow::Owned(out)
}

fn display_block(tab: &str, interior: &str) -> Option<String> {
    let lines: Vec<&str> = interior
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    let mut body = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            body.push('\n');
        }
        body.push_str(tab);
        body.push_str(INDENT);
        body.push_str(line);
    }
    // The interior ends up in markup that treats angle brackets specially.
    let body = body.replace('<', "\\lt ").replace('>', "\\gt ");

    Some(format!("\n{}{}\n\n{}\n\n", tab, MATH_DIRECTIVE, body))
}
