//! The math replacer: finds dollar math in the text of a document tree and turns it into
//! math nodes.

use std::fmt;

use smallvec::SmallVec;

use crate::adapters::{MathHost, TextUnit};
use crate::nodes::{
    Ast, Node, NodeClass, NodeKind, NodeMath, NodeMathBlock, NodeValue, Sourcepos,
};
use crate::parser::dollars::{scan, ScanDiagnostic, Segment, SegmentKind};
use crate::parser::options::{ExclusionSet, Transform};
use crate::Arena;

/// A [`MathHost`] over a tree built by [`parse_document`](crate::parse_document).
pub struct ArenaHost<'a> {
    arena: &'a Arena<'a>,
    root: Node<'a>,
}

impl<'a> ArenaHost<'a> {
    /// New nodes are allocated in `arena`.
    pub fn new(arena: &'a Arena<'a>, root: Node<'a>) -> Self {
        ArenaHost { arena, root }
    }

    fn alloc(&self, value: NodeValue, sourcepos: Sourcepos) -> Node<'a> {
        self.arena.alloc(Ast::new(value, sourcepos).into())
    }

    fn materialize(&self, segment: &Segment<'_>, sourcepos: Sourcepos) -> Node<'a> {
        let content = segment.content.to_string();
        let value = match segment.kind {
            SegmentKind::Text => {
                let node = self.alloc(NodeValue::Text(content), sourcepos);
                node.data_mut().materialized = true;
                return node;
            }
            SegmentKind::InlineMath => NodeValue::Math(NodeMath {
                literal: content.clone(),
            }),
            SegmentKind::DisplayMath => NodeValue::MathBlock(NodeMathBlock {
                literal: content.clone(),
                ..NodeMathBlock::default()
            }),
        };
        let node = self.alloc(value, sourcepos);
        node.append(self.alloc(NodeValue::Text(content), sourcepos));
        node
    }
}

impl<'a> MathHost for ArenaHost<'a> {
    type Node = Node<'a>;

    fn text_units(&self, exclude: &ExclusionSet) -> Vec<TextUnit<Node<'a>>> {
        self.root
            .descendants()
            .filter_map(|node| {
                let ast = node.data();
                if ast.materialized {
                    return None;
                }
                let text = ast.value.text()?;
                let excluded_by = node
                    .ancestors()
                    .find(|n| n.data().value.class(exclude) == NodeClass::Excluded)
                    .map(|n| n.data().value.kind());
                Some(TextUnit {
                    node,
                    text: text.clone(),
                    sourcepos: ast.sourcepos,
                    excluded_by,
                })
            })
            .collect()
    }

    fn substitute(&self, node: Node<'a>, segments: &[Segment<'_>]) {
        let sourcepos = node.data().sourcepos;
        for segment in segments {
            node.insert_before(self.materialize(segment, sourcepos));
        }
        node.detach();
    }
}

/// What [`replace_math`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Text units scanned.
    pub scanned: usize,
    /// Text units replaced by math and text nodes.
    pub replaced: usize,
    /// Text units not scanned because of an excluded ancestor.
    pub skipped: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Something worth telling the author of the document about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The position of the text unit concerned.
    pub sourcepos: Sourcepos,
    /// The text of the unit concerned.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A math span was opened and not closed, and was kept as text.
    Scan(ScanDiagnostic),
    /// Text containing math was not scanned because of an excluded ancestor.  Only reported
    /// when diagnostics are enabled.
    Excluded {
        /// The kind of the excluded ancestor.
        by: NodeKind,
        /// The exclusion set in force.
        exclude: ExclusionSet,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::Scan(ref scan) => write!(f, "{}: {}", self.sourcepos, scan),
            DiagnosticKind::Excluded { by, ref exclude } => write!(
                f,
                "{}: math not replaced inside {} (excluded: {})",
                self.sourcepos, by, exclude
            ),
        }
    }
}

/// Replace dollar math in every eligible text unit of `host` with math nodes.
///
/// Never fails: math that cannot be resolved stays text and is reported in the returned
/// [`Report`].  Math nodes are excluded by default, so their content is not rescanned when
/// the replacer runs again over the same tree.
pub fn replace_math<H: MathHost>(host: &H, options: &Transform) -> Report {
    let mut report = Report::default();

    for unit in host.text_units(&options.exclude) {
        if let Some(by) = unit.excluded_by {
            report.skipped += 1;
            if options.diagnostics && scan(&unit.text).any(|s| s.is_math()) {
                tracing::info!(
                    sourcepos = %unit.sourcepos,
                    excluded = %by,
                    exclude = %options.exclude,
                    "skipping math inside excluded node"
                );
                report.diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::Excluded {
                        by,
                        exclude: options.exclude.clone(),
                    },
                    sourcepos: unit.sourcepos,
                    text: unit.text,
                });
            }
            continue;
        }

        report.scanned += 1;
        let mut segments = scan(&unit.text);
        let collected: SmallVec<[Segment<'_>; 4]> = segments.by_ref().collect();

        for diagnostic in segments.diagnostics() {
            if options.diagnostics {
                tracing::warn!(sourcepos = %unit.sourcepos, "{}", diagnostic);
            }
            report.diagnostics.push(Diagnostic {
                kind: DiagnosticKind::Scan(diagnostic.clone()),
                sourcepos: unit.sourcepos,
                text: unit.text.clone(),
            });
        }

        let unchanged = match collected.as_slice() {
            [] => true,
            [only] => !only.is_math() && only.content == unit.text.as_str(),
            _ => false,
        };
        if unchanged {
            continue;
        }

        if options.diagnostics {
            tracing::debug!(
                sourcepos = %unit.sourcepos,
                segments = collected.len(),
                "replacing text with math"
            );
        }
        host.substitute(unit.node, &collected);
        report.replaced += 1;
    }

    report
}
