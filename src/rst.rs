//! reStructuredText output.
//!
//! Inline math is written as the `:math:` role and display math as the `.. math::` directive,
//! so the result can be handed to any reST toolchain that renders math.

use std::fmt::{self, Write};

use crate::nodes::{Node, NodeMath, NodeMathBlock, NodeValue};
use crate::parser::display::INDENT;
use crate::scanners::MATH_DIRECTIVE;

/// Formats an AST as reStructuredText.  Blocks are separated by blank lines.
pub fn format_document<'a>(root: Node<'a>, output: &mut dyn Write) -> fmt::Result {
    let mut formatter = RstFormatter { blocks: vec![] };
    formatter.block(root);

    for (i, block) in formatter.blocks.iter().enumerate() {
        if i > 0 {
            output.write_str("\n\n")?;
        }
        output.write_str(block)?;
    }
    if !formatter.blocks.is_empty() {
        output.write_str("\n")?;
    }
    Ok(())
}

struct RstFormatter {
    blocks: Vec<String>,
}

impl RstFormatter {
    fn block<'a>(&mut self, node: Node<'a>) {
        match node.data().value {
            NodeValue::Document => {
                for child in node.children() {
                    self.block(child);
                }
            }
            NodeValue::Paragraph => self.paragraph(node),
            NodeValue::CodeBlock(ref ncb) => {
                let mut out = if ncb.info.is_empty() {
                    "::".to_string()
                } else {
                    format!(".. code-block:: {}", ncb.info)
                };
                let mut content = String::new();
                for child in node.children() {
                    inline(child, &mut content);
                }
                indented_body(&mut out, &content);
                self.blocks.push(out);
            }
            NodeValue::MathBlock(ref nmb) => self.blocks.push(math_directive(nmb)),
            NodeValue::Literal | NodeValue::Math(..) | NodeValue::Text(..) => {
                let mut out = String::new();
                inline(node, &mut out);
                self.push_paragraph(&out);
            }
        }
    }

    // Display math splits the paragraph it was found in.
    fn paragraph<'a>(&mut self, node: Node<'a>) {
        let mut current = String::new();
        for child in node.children() {
            if matches!(child.data().value, NodeValue::MathBlock(..)) {
                self.push_paragraph(&current);
                current.clear();
                self.block(child);
            } else {
                inline(child, &mut current);
            }
        }
        self.push_paragraph(&current);
    }

    fn push_paragraph(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.blocks.push(text.to_string());
        }
    }
}

fn inline<'a>(node: Node<'a>, out: &mut String) {
    match node.data().value {
        NodeValue::Text(ref text) => out.push_str(text),
        NodeValue::Literal => {
            out.push_str("``");
            for child in node.children() {
                inline(child, out);
            }
            out.push_str("``");
        }
        NodeValue::Math(NodeMath { ref literal })
        | NodeValue::MathBlock(NodeMathBlock { ref literal, .. }) => {
            out.push_str(":math:`");
            out.push_str(&literal.trim().replace('`', "\\`"));
            out.push('`');
        }
        NodeValue::Document | NodeValue::Paragraph | NodeValue::CodeBlock(..) => {
            for child in node.children() {
                inline(child, out);
            }
        }
    }
}

fn math_directive(nmb: &NodeMathBlock) -> String {
    let mut out = MATH_DIRECTIVE.to_string();
    if nmb.nowrap {
        out.push('\n');
        out.push_str(INDENT);
        out.push_str(":nowrap:");
    }
    if let Some(ref number) = nmb.number {
        out.push('\n');
        out.push_str(INDENT);
        out.push_str(":label: ");
        out.push_str(number);
    }
    indented_body(&mut out, &nmb.literal);
    out
}

// Appends a blank line and `content`, indented, unless `content` is blank.  Leading and
// trailing blank lines of `content` are dropped.
fn indented_body(out: &mut String, content: &str) {
    let lines: Vec<&str> = content.lines().map(str::trim_end).collect();
    let first = lines.iter().position(|line| !line.is_empty());
    let last = lines.iter().rposition(|line| !line.is_empty());
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => return,
    };

    out.push('\n');
    for line in &lines[first..=last] {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(INDENT);
            out.push_str(line);
        }
    }
}
