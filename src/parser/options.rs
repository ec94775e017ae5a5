//! Configuration for the parser, the math replacer and the writers.

#[cfg(feature = "bon")]
use bon::Builder;
use std::env;
use std::fmt;

use rustc_hash::FxHashSet;

use crate::nodes::NodeKind;

/// The environment variable that turns on diagnostics when set to any non-empty value.
pub const DEBUG_ENV_VAR: &str = "MATH_DOLLAR_DEBUG";

#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Umbrella options struct.
pub struct Options {
    /// Configure parse-time options.
    pub parse: Parse,

    /// Configure the math replacer.
    pub transform: Transform,

    /// Configure render-time options.
    pub render: Render,
}

impl Options {
    /// Default options, with diagnostics enabled if [`DEBUG_ENV_VAR`] is set.
    pub fn from_env() -> Self {
        Options {
            transform: Transform::from_env(),
            ..Options::default()
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Options for parser functions.
pub struct Parse {
    /// Rewrite `\[ ... \]` display blocks into `.. math::` blocks before parsing.
    /// On by default.
    ///
    /// ```rust
    /// # use mathdollar::{dollars_to_rst, Options};
    /// let mut options = Options::default();
    /// assert_eq!(dollars_to_rst("\\[\nx^2\n\\]\n", &options),
    ///            ".. math::\n\n   x^2\n");
    ///
    /// options.parse.display_blocks = false;
    /// assert_eq!(dollars_to_rst("\\[\nx^2\n\\]\n", &options),
    ///            "\\[\nx^2\n\\]\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default = true))]
    pub display_blocks: bool,
}

impl Default for Parse {
    fn default() -> Self {
        Parse {
            display_blocks: true,
        }
    }
}

#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Options for the math replacer.
pub struct Transform {
    /// Node kinds whose subtrees are never scanned for math.
    ///
    /// ```rust
    /// # use mathdollar::{dollars_to_rst, nodes::NodeKind, Options};
    /// let mut options = Options::default();
    /// assert_eq!(dollars_to_rst("Use `$x$` for $x$.\n", &options),
    ///            "Use ``$x$`` for :math:`x`.\n");
    ///
    /// options.transform.exclude.remove(NodeKind::Literal);
    /// assert_eq!(dollars_to_rst("Use `$x$` for $x$.\n", &options),
    ///            "Use ``:math:`x``` for :math:`x`.\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub exclude: ExclusionSet,

    /// Log and collect a diagnostic for every text node skipped because of an excluded
    /// ancestor.
    #[cfg_attr(feature = "bon", builder(default))]
    pub diagnostics: bool,
}

impl Transform {
    /// Default options, with diagnostics enabled if [`DEBUG_ENV_VAR`] is set.
    pub fn from_env() -> Self {
        Transform {
            diagnostics: env::var_os(DEBUG_ENV_VAR).map_or(false, |v| !v.is_empty()),
            ..Transform::default()
        }
    }
}

#[derive(Default, Debug, Clone, Copy)]
#[cfg_attr(feature = "bon", derive(Builder))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
/// Options for formatter functions.
pub struct Render {
    /// Include source position attributes in XML output.
    ///
    /// ```rust
    /// # use mathdollar::{dollars_to_xml, Options};
    /// let mut options = Options::default();
    /// options.render.sourcepos = true;
    /// let xml = dollars_to_xml("Hi $x$.\n", &options);
    /// assert!(xml.contains(r#"<math sourcepos="1:1-1:7">"#));
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub sourcepos: bool,
}

/// The node kinds whose subtrees the math replacer must not scan.
///
/// The default set holds the verbatim kinds (code blocks and literals) and the math kinds, so
/// that text is never scanned twice.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct ExclusionSet(FxHashSet<NodeKind>);

impl ExclusionSet {
    /// An exclusion set excluding nothing.
    pub fn empty() -> Self {
        ExclusionSet(FxHashSet::default())
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.0.contains(&kind)
    }

    /// Returns whether the kind was newly added.
    pub fn insert(&mut self, kind: NodeKind) -> bool {
        self.0.insert(kind)
    }

    /// Returns whether the kind was present.
    pub fn remove(&mut self, kind: NodeKind) -> bool {
        self.0.remove(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The kinds in the set, in [`NodeKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = NodeKind> + '_ {
        NodeKind::ALL.into_iter().filter(|kind| self.contains(*kind))
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        [
            NodeKind::CodeBlock,
            NodeKind::Literal,
            NodeKind::Math,
            NodeKind::MathBlock,
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<NodeKind> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = NodeKind>>(iter: I) -> Self {
        ExclusionSet(iter.into_iter().collect())
    }
}

impl Extend<NodeKind> for ExclusionSet {
    fn extend<I: IntoIterator<Item = NodeKind>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(kind.name())?;
        }
        Ok(())
    }
}
