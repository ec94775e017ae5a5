pub mod display;
pub mod dollars;
pub mod options;

use std::borrow::Cow;

use rustc_hash::FxHashSet;

use crate::nodes::{Ast, Node, NodeCodeBlock, NodeMathBlock, NodeValue, Sourcepos};
use crate::parser::display::normalize_display_blocks;
use crate::parser::options::Options;
use crate::scanners::{self, Fence, MathDirective};
use crate::strings::{is_blank, LineIndex};
use crate::Arena;

/// Parse a document into a host tree.  The tree contains no math nodes besides the
/// `.. math::` blocks found in the source; see [`replace_math`](crate::replace_math).
///
/// When `options.parse.display_blocks` is set, `\[ ... \]` blocks are rewritten first, and
/// source positions refer to the rewritten text.
pub fn parse_document<'a>(arena: &'a Arena<'a>, text: &str, options: &Options) -> Node<'a> {
    let text = if options.parse.display_blocks {
        normalize_display_blocks(text)
    } else {
        Cow::Borrowed(text)
    };
    let root = arena.alloc(Ast::new(NodeValue::Document, (1, 1, 1, 1).into()).into());
    Parser::new(arena, root, &text).parse()
}

pub struct Parser<'a, 't> {
    arena: &'a Arena<'a>,
    root: Node<'a>,
    text: &'t str,
    line_index: LineIndex,
}

impl<'a, 't> Parser<'a, 't> {
    fn new(arena: &'a Arena<'a>, root: Node<'a>, text: &'t str) -> Self {
        Parser {
            arena,
            root,
            text,
            line_index: LineIndex::new(text),
        }
    }

    fn parse(self) -> Node<'a> {
        let text = self.text;
        let mut pos = 0;
        // Byte range of the open paragraph, excluding the final newline.
        let mut paragraph: Option<(usize, usize)> = None;

        while pos < text.len() {
            let line_end = find_line_end(text, pos);
            let line = &text[pos..line_end];

            if is_blank(line) {
                self.finish_paragraph(paragraph.take());
                pos = line_end + 1;
                continue;
            }

            if let Some(fence) = scanners::open_code_fence(line) {
                self.finish_paragraph(paragraph.take());
                pos = self.code_block(pos, line_end, fence);
                continue;
            }

            // A directive cannot interrupt a paragraph; inside one, it is left for the
            // tokenizer to find.
            if paragraph.is_none() {
                if let Some(block) = scanners::math_directive(text, pos) {
                    let next = block.end + 1;
                    self.math_block(pos, block);
                    pos = next;
                    continue;
                }
            }

            paragraph = match paragraph {
                Some((start, _)) => Some((start, line_end)),
                None => Some((pos, line_end)),
            };
            pos = line_end + 1;
        }
        self.finish_paragraph(paragraph);

        self.root.data_mut().sourcepos = self.sourcepos(0, text.len());
        self.root
    }

    fn sourcepos(&self, start: usize, end: usize) -> Sourcepos {
        let last = if end > start { end - 1 } else { start };
        Sourcepos {
            start: self.line_index.position(start),
            end: self.line_index.position(last),
        }
    }

    fn add_child(&self, parent: Node<'a>, value: NodeValue, start: usize, end: usize) -> Node<'a> {
        let node = self
            .arena
            .alloc(Ast::new(value, self.sourcepos(start, end)).into());
        parent.append(node);
        node
    }

    fn add_text(&self, parent: Node<'a>, start: usize, end: usize) {
        let content = self.text[start..end].to_string();
        self.add_child(parent, NodeValue::Text(content), start, end);
    }

    fn finish_paragraph(&self, paragraph: Option<(usize, usize)>) {
        if let Some((start, end)) = paragraph {
            let node = self.add_child(self.root, NodeValue::Paragraph, start, end);
            self.parse_inlines(node, start, end);
        }
    }

    // Returns the offset of the line following the block.
    fn code_block(&self, start: usize, opener_end: usize, fence: Fence) -> usize {
        let text = self.text;
        let content_start = (opener_end + 1).min(text.len());
        let mut pos = content_start;
        let mut content_end = content_start;
        let mut block_end = opener_end;

        while pos < text.len() {
            let end = find_line_end(text, pos);
            if scanners::close_code_fence(&text[pos..end], &fence) {
                block_end = end;
                pos = end + 1;
                break;
            }
            content_end = (end + 1).min(text.len());
            block_end = end;
            pos = end + 1;
        }
        let value = NodeValue::CodeBlock(NodeCodeBlock {
            fence_char: fence.fence_char,
            fence_length: fence.fence_length,
            info: fence.info,
        });
        let node = self.add_child(self.root, value, start, block_end);
        if content_end > content_start {
            self.add_text(node, content_start, content_end);
        }
        pos
    }

    fn math_block(&self, start: usize, block: MathDirective) {
        let value = NodeValue::MathBlock(NodeMathBlock {
            literal: block.content.clone(),
            nowrap: block.nowrap,
            number: block.label,
        });
        let node = self.add_child(self.root, value, start, block.end);
        self.add_child(node, NodeValue::Text(block.content), start, block.end);
    }

    // Backtick runs delimit literals: a run of N backticks closes at the next run of exactly
    // N.  Everything else is text.
    fn parse_inlines(&self, parent: Node<'a>, start: usize, end: usize) {
        let bytes = self.text.as_bytes();
        let mut unmatched: FxHashSet<usize> = FxHashSet::default();
        let mut text_from = start;
        let mut pos = start;

        while let Some(offset) = self.text[pos..end].find('`') {
            let open = pos + offset;
            let run = backtick_run(bytes, open, end);
            pos = open + run;
            if unmatched.contains(&run) {
                continue;
            }

            match self.closing_run(pos, end, run) {
                Some(close) => {
                    if open > text_from {
                        self.add_text(parent, text_from, open);
                    }
                    let literal = self.add_child(parent, NodeValue::Literal, open, close + run);
                    if close > pos {
                        self.add_text(literal, pos, close);
                    }
                    pos = close + run;
                    text_from = pos;
                }
                None => {
                    unmatched.insert(run);
                }
            }
        }

        if end > text_from {
            self.add_text(parent, text_from, end);
        }
    }

    fn closing_run(&self, from: usize, end: usize, run: usize) -> Option<usize> {
        let bytes = self.text.as_bytes();
        let mut pos = from;
        while let Some(offset) = self.text[pos..end].find('`') {
            let at = pos + offset;
            let len = backtick_run(bytes, at, end);
            if len == run {
                return Some(at);
            }
            pos = at + len;
        }
        None
    }
}

fn find_line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}

fn backtick_run(bytes: &[u8], at: usize, end: usize) -> usize {
    bytes[at..end].iter().take_while(|&&b| b == b'`').count()
}
