//! Adapter traits for document trees.
//!
//! The math replacer never touches a tree directly: it asks a [`MathHost`] for the text in
//! the document and hands back the segments each piece of text splits into.

use crate::nodes::{NodeKind, Sourcepos};
use crate::parser::dollars::Segment;
use crate::parser::options::ExclusionSet;

/// A text node of a host document, as presented to the replacer.
#[derive(Clone, Debug)]
pub struct TextUnit<N> {
    /// The host's handle on the node.
    pub node: N,

    /// The node's text.
    pub text: String,

    /// Where the node came from.  Nodes made from this unit's segments inherit it.
    pub sourcepos: Sourcepos,

    /// The kind of the nearest node, the text node itself included, that is in the exclusion
    /// set.  Units with an excluded ancestor are never scanned.
    pub excluded_by: Option<NodeKind>,
}

impl<N> TextUnit<N> {
    /// Whether the unit may be scanned for math.
    pub fn eligible(&self) -> bool {
        self.excluded_by.is_none()
    }
}

/// Implement this adapter to run [`replace_math`](crate::replace_math) over a document tree.
pub trait MathHost {
    /// A cheap handle on a node of the tree.
    type Node: Copy;

    /// Every text node of the document, in document order, classified against `exclude`.
    /// Text produced by an earlier [`substitute`](MathHost::substitute) is left out: its
    /// escapes are gone, so scanning it again could find math that was never there.
    fn text_units(&self, exclude: &ExclusionSet) -> Vec<TextUnit<Self::Node>>;

    /// Replace `node` in place by one node per segment: text segments become text nodes, and
    /// math segments become inline or display math nodes carrying the segment's content.
    fn substitute(&self, node: Self::Node, segments: &[Segment<'_>]);
}
