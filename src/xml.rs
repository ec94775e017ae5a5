//! A pseudo-XML dump of a document tree, for inspecting what the parser and the math
//! replacer produced.

use std::cmp;
use std::fmt::{self, Write};

use crate::nodes::{Node, NodeValue};
use crate::parser::options::Options;
use crate::strings::byte_set;

const MAX_INDENT: u32 = 40;

/// Formats an AST as pseudo-XML.
pub fn format_document<'a>(
    root: Node<'a>,
    options: &Options,
    output: &mut dyn Write,
) -> fmt::Result {
    output.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    XmlFormatter::new(options, output).format(root)
}

struct XmlFormatter<'o> {
    output: &'o mut dyn Write,
    options: &'o Options,
    indent: u32,
}

impl<'o> XmlFormatter<'o> {
    fn new(options: &'o Options, output: &'o mut dyn Write) -> Self {
        XmlFormatter {
            options,
            output,
            indent: 0,
        }
    }

    fn escape(&mut self, buffer: &str) -> fmt::Result {
        const XML_UNSAFE: [bool; 256] = byte_set(b"&<>\"\0");

        let bytes = buffer.as_bytes();
        let mut offset = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            if XML_UNSAFE[byte as usize] {
                let esc = match byte {
                    b'"' => "&quot;",
                    b'&' => "&amp;",
                    b'<' => "&lt;",
                    b'>' => "&gt;",
                    _ => "\u{fffd}",
                };
                self.output.write_str(&buffer[offset..i])?;
                self.output.write_str(esc)?;
                offset = i + 1;
            }
        }
        self.output.write_str(&buffer[offset..])
    }

    fn format<'a>(&mut self, root: Node<'a>) -> fmt::Result {
        // Opening tags are written on the way down; each node is pushed back for its closing
        // tag before its children.
        enum Phase {
            Pre,
            Post,
        }
        let mut stack = vec![(root, Phase::Pre)];

        while let Some((node, phase)) = stack.pop() {
            match phase {
                Phase::Pre => {
                    self.format_node(node, true)?;
                    stack.push((node, Phase::Post));
                    let mut children: Vec<Node<'a>> = node.children().collect();
                    while let Some(child) = children.pop() {
                        stack.push((child, Phase::Pre));
                    }
                }
                Phase::Post => self.format_node(node, false)?,
            }
        }

        Ok(())
    }

    fn indent(&mut self) -> fmt::Result {
        for _ in 0..cmp::min(self.indent, MAX_INDENT) {
            self.output.write_str(" ")?;
        }
        Ok(())
    }

    fn format_node<'a>(&mut self, node: Node<'a>, entering: bool) -> fmt::Result {
        let ast = node.data();
        let name = ast.value.xml_node_name();

        if !entering {
            if node.first_child().is_some() {
                self.indent -= 2;
                self.indent()?;
                writeln!(self.output, "</{}>", name)?;
            }
            return Ok(());
        }

        self.indent()?;
        write!(self.output, "<{}", name)?;

        if self.options.render.sourcepos && ast.sourcepos.start.line != 0 {
            write!(self.output, " sourcepos=\"{}\"", ast.sourcepos)?;
        }

        match ast.value {
            NodeValue::Text(ref literal) => {
                self.output.write_str(" xml:space=\"preserve\">")?;
                self.escape(literal)?;
                return writeln!(self.output, "</{}>", name);
            }
            NodeValue::CodeBlock(ref ncb) => {
                if !ncb.info.is_empty() {
                    self.output.write_str(" info=\"")?;
                    self.escape(&ncb.info)?;
                    self.output.write_str("\"")?;
                }
            }
            NodeValue::MathBlock(ref nmb) => {
                write!(self.output, " nowrap=\"{}\"", nmb.nowrap)?;
                if let Some(ref number) = nmb.number {
                    self.output.write_str(" number=\"")?;
                    self.escape(number)?;
                    self.output.write_str("\"")?;
                }
            }
            NodeValue::Document
            | NodeValue::Paragraph
            | NodeValue::Literal
            | NodeValue::Math(..) => {}
        }

        if node.first_child().is_some() {
            self.indent += 2;
        } else {
            self.output.write_str(" /")?;
        }
        self.output.write_str(">\n")
    }
}
