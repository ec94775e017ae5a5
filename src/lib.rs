//! A scanner for math written with dollar signs in prose.
//!
//! Text like `the cost is $x+1$ per unit` or `$$\sum_i x_i$$` is split into text, inline
//! math and display math, telling apart the dollars that delimit math from the dollars that
//! are just currency.  `\[ ... \]` display blocks are rewritten into `.. math::` blocks
//! beforehand.
//!
//! The tokenizer works on plain strings:
//!
//! ```
//! use mathdollar::{split_dollars, SegmentKind};
//!
//! let segments = split_dollars("Let $x$ be $5.");
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[1].kind, SegmentKind::InlineMath);
//! assert_eq!(segments[1].content, "x");
//! assert_eq!(segments[2].content, " be $5.");
//! ```
//!
//! Whole documents are parsed into a tree, whose eligible text is then replaced by math
//! nodes.  Text inside code blocks, literals and existing math is left alone.
//!
//! ```
//! use mathdollar::{dollars_to_rst, Options};
//!
//! assert_eq!(dollars_to_rst("Euler: $e^{i\\pi} = -1$.\n", &Options::default()),
//!            "Euler: :math:`e^{i\\pi} = -1`.\n");
//! ```
//!
//! Or step by step:
//!
//! ```
//! use mathdollar::{parse_document, replace_math, Arena, Options};
//! use mathdollar::nodes::NodeValue;
//! use mathdollar::transform::ArenaHost;
//!
//! let arena = Arena::new();
//! let options = Options::default();
//! let root = parse_document(&arena, "Price $p$, not `$q$`.\n", &options);
//!
//! let report = replace_math(&ArenaHost::new(&arena, root), &options.transform);
//! assert_eq!(report.replaced, 1);
//! assert_eq!(report.skipped, 1);
//!
//! let math = root
//!     .descendants()
//!     .filter(|node| matches!(node.data().value, NodeValue::Math(..)))
//!     .count();
//! assert_eq!(math, 1);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod adapters;
pub mod arena_tree;
mod error;
pub mod nodes;
pub mod parser;
pub mod rst;
mod scanners;
mod strings;
#[cfg(test)]
mod tests;
pub mod transform;
pub mod xml;

pub use error::Error;
pub use parser::display::normalize_display_blocks;
pub use parser::dollars::{scan, Segment, SegmentKind, Segments};
pub use parser::options::{ExclusionSet, Options, Parse, Render, Transform};
pub use parser::parse_document;
pub use transform::{replace_math, Report};

/// Convenience type alias for arena used to hold nodes.
pub type Arena<'a> = typed_arena::Arena<nodes::AstNode<'a>>;

/// Split `text` into segments, collected.  See [`scan`] for the lazy form.
pub fn split_dollars(text: &str) -> Vec<Segment<'_>> {
    scan(text).collect()
}

/// Parse a document, replace its math, and render it as reStructuredText.
pub fn dollars_to_rst(text: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = convert(&arena, text, options);
    let mut out = String::new();
    rst::format_document(root, &mut out).unwrap();
    out
}

/// Parse a document, replace its math, and render the tree as pseudo-XML.
pub fn dollars_to_xml(text: &str, options: &Options) -> String {
    let arena = Arena::new();
    let root = convert(&arena, text, options);
    let mut out = String::new();
    xml::format_document(root, options, &mut out).unwrap();
    out
}

fn convert<'a>(arena: &'a Arena<'a>, text: &str, options: &Options) -> nodes::Node<'a> {
    let root = parse_document(arena, text, options);
    replace_math(&transform::ArenaHost::new(arena, root), &options.transform);
    root
}
