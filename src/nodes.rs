//! The host document tree.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::str::FromStr;

use crate::arena_tree;
use crate::error::Error;
use crate::parser::options::ExclusionSet;

/// The core AST node enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    /// The root of every document.  Contains **blocks**.
    Document,

    /// **Block**. A paragraph of prose.  Contains **inlines**; may also contain `MathBlock`s
    /// produced from `$$` display math found in its text.
    Paragraph,

    /// **Block**. A fenced code block.  Its content is held in a single `Text` child, which is
    /// never scanned for math under the default exclusion set.
    CodeBlock(NodeCodeBlock),

    /// **Block**. Display math: a `.. math::` block in the source, or `$$` display math found
    /// in text.  The math source is held in `literal` and repeated in a single `Text` child.
    MathBlock(NodeMathBlock),

    /// **Inline**. A backtick literal.  Its content is held in a single `Text` child.
    Literal,

    /// **Inline**. Inline math found between `$` delimiters.  The math source is held in
    /// `literal` and repeated in a single `Text` child.
    Math(NodeMath),

    /// **Inline**. Textual content.  All text in a document is contained in a `Text` node.
    Text(String),
}

/// The metadata and data of a fenced code block.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct NodeCodeBlock {
    /// The fence character itself (`` ` `` or `~`).
    pub fence_char: u8,

    /// The length of the fence.
    pub fence_length: usize,

    /// The info string after the opening fence, if any.
    pub info: String,
}

/// An inline math span.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct NodeMath {
    /// The raw math source, delimiters stripped.
    pub literal: String,
}

/// A display math block.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct NodeMathBlock {
    /// The raw math source.
    pub literal: String,

    /// Whether the renderer should leave the source unwrapped (`:nowrap:`).
    pub nowrap: bool,

    /// The equation label used for numbering (`:label:`), if any.
    pub number: Option<String>,
}

/// The kind of a node, without its data.
///
/// Kinds have stable snake_case names, which are how they are spelled in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum NodeKind {
    /// [`NodeValue::Document`].
    Document,
    /// [`NodeValue::Paragraph`].
    Paragraph,
    /// [`NodeValue::CodeBlock`].
    CodeBlock,
    /// [`NodeValue::MathBlock`].
    MathBlock,
    /// [`NodeValue::Literal`].
    Literal,
    /// [`NodeValue::Math`].
    Math,
    /// [`NodeValue::Text`].
    Text,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Document,
        NodeKind::Paragraph,
        NodeKind::CodeBlock,
        NodeKind::MathBlock,
        NodeKind::Literal,
        NodeKind::Math,
        NodeKind::Text,
    ];

    /// The configuration name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::CodeBlock => "code_block",
            NodeKind::MathBlock => "math_block",
            NodeKind::Literal => "literal",
            NodeKind::Math => "math",
            NodeKind::Text => "text",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnrecognizedNodeKind(s.to_string()))
    }
}

/// How the math replacer sees a node.
///
/// This is the closed set of distinctions the replacer cares about; everything about the
/// concrete node beyond it is the host's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// Plain text, eligible for scanning unless an ancestor is excluded.
    Text,
    /// Inline math.
    InlineMath,
    /// Display math.
    DisplayMath,
    /// A node whose kind is in the exclusion set; nothing beneath it is scanned.
    Excluded,
    /// Any other structural node.
    Other,
}

impl NodeValue {
    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match *self {
            NodeValue::Document => NodeKind::Document,
            NodeValue::Paragraph => NodeKind::Paragraph,
            NodeValue::CodeBlock(..) => NodeKind::CodeBlock,
            NodeValue::MathBlock(..) => NodeKind::MathBlock,
            NodeValue::Literal => NodeKind::Literal,
            NodeValue::Math(..) => NodeKind::Math,
            NodeValue::Text(..) => NodeKind::Text,
        }
    }

    /// Classify this node against an exclusion set.  Exclusion takes precedence over every
    /// other class.
    pub fn class(&self, exclude: &ExclusionSet) -> NodeClass {
        let kind = self.kind();
        if exclude.contains(kind) {
            return NodeClass::Excluded;
        }
        match kind {
            NodeKind::Text => NodeClass::Text,
            NodeKind::Math => NodeClass::InlineMath,
            NodeKind::MathBlock => NodeClass::DisplayMath,
            _ => NodeClass::Other,
        }
    }

    /// Indicates whether this node is a block node or inline node.
    pub fn block(&self) -> bool {
        matches!(
            *self,
            NodeValue::Document
                | NodeValue::Paragraph
                | NodeValue::CodeBlock(..)
                | NodeValue::MathBlock(..)
        )
    }

    /// Return a reference to the text of a `Text` inline, if this node is one.
    ///
    /// Convenience method.
    pub fn text(&self) -> Option<&String> {
        match *self {
            NodeValue::Text(ref t) => Some(t),
            _ => None,
        }
    }

    pub(crate) fn xml_node_name(&self) -> &'static str {
        self.kind().name()
    }
}

/// A single node in the host tree.
///
/// The struct contains metadata about the node's position in the source document, and the
/// core enum, `NodeValue`.
#[derive(Debug, Clone)]
pub struct Ast {
    /// The node value itself.
    pub value: NodeValue,

    /// The positions in the source document this node comes from.
    pub sourcepos: Sourcepos,

    /// Set on text the math replacer produced.  Escapes have been removed from it, so it is
    /// never scanned again.
    pub materialized: bool,
}

impl Ast {
    /// Create a new AST node with the given value.
    pub fn new(value: NodeValue, sourcepos: Sourcepos) -> Self {
        Ast {
            value,
            sourcepos,
            materialized: false,
        }
    }
}

/// Represents the position in the source this node was parsed from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sourcepos {
    /// The line and column of the first character of this node.
    pub start: LineColumn,
    /// The line and column of the last character of this node.
    pub end: LineColumn,
}

impl fmt::Display for Sourcepos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column,
        )
    }
}

impl From<(usize, usize, usize, usize)> for Sourcepos {
    fn from(sp: (usize, usize, usize, usize)) -> Sourcepos {
        Sourcepos {
            start: LineColumn {
                line: sp.0,
                column: sp.1,
            },
            end: LineColumn {
                line: sp.2,
                column: sp.3,
            },
        }
    }
}

/// Represents the 1-based line and column positions of a given character.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineColumn {
    /// The 1-based line number of the character.
    pub line: usize,
    /// The 1-based column number of the character.
    pub column: usize,
}

/// The type of a node within the document.
///
/// It is bound by the lifetime `'a`, which corresponds to the `Arena` nodes are allocated in.
/// Child `Ast`s are wrapped in `RefCell` for interior mutability.
pub type AstNode<'a> = arena_tree::Node<'a, RefCell<Ast>>;

/// A reference to a node in an arena.
pub type Node<'a> = &'a AstNode<'a>;

impl<'a> From<Ast> for AstNode<'a> {
    fn from(ast: Ast) -> Self {
        arena_tree::Node::new(RefCell::new(ast))
    }
}

impl<'a> AstNode<'a> {
    /// Borrow the node's `Ast`.
    pub fn data(&self) -> Ref<'_, Ast> {
        self.data.borrow()
    }

    /// Mutably borrow the node's `Ast`.
    pub fn data_mut(&self) -> RefMut<'_, Ast> {
        self.data.borrow_mut()
    }
}
