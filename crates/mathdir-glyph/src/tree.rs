//! Glyph tree model.
//!
//! A [`GlyphTree`] is the positioned-node output of a [`GlyphSource`](crate::GlyphSource).
//! Nodes carry a structural [`GlyphKind`], role classes, leaf text, and the
//! markers written by the directional layout pass.

use std::fmt;
use std::str::FromStr;

/// Visual layout direction for scripts and radicals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Left-to-right, the glyph source's natural arrangement.
    Ltr,
    /// Right-to-left, scripts on the visual left of their base.
    #[default]
    Rtl,
}

impl Direction {
    /// Lowercase name used in markup and configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    #[must_use]
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }

    /// The opposite direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ltr => Self::Rtl,
            Self::Rtl => Self::Ltr,
        }
    }

    /// Build from the boolean `rtl` flag used by the tagged value format.
    #[must_use]
    pub fn from_rtl_flag(rtl: bool) -> Self {
        if rtl { Self::Rtl } else { Self::Ltr }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown direction name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}' (valid: ltr, rtl)")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}

/// Structural kind of a glyph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum GlyphKind {
    /// Numerator over denominator.
    Fraction,
    /// Root sign with body and optional index.
    Radical,
    /// Base with a superscript and/or subscript: `[base, script]`.
    SupSub,
    /// Large operator with limits above/below: `[operator, lower?, upper?]`.
    OperatorLimits,
    /// Text-bearing glyph run.
    Leaf,
    /// Generic container.
    Group,
}

impl GlyphKind {
    /// Markup class emitted for nodes of this kind.
    ///
    /// Leaves return `None`; their role classes describe them fully.
    #[must_use]
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Fraction => Some("frac"),
            Self::Radical => Some("sqrt"),
            Self::SupSub => Some("msupsub"),
            Self::OperatorLimits => Some("op-limits"),
            Self::Leaf => None,
            Self::Group => Some("mgroup"),
        }
    }
}

/// Node in a glyph tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphNode {
    /// Structural kind.
    pub kind: GlyphKind,
    /// Role classes (e.g. `mord`, `mnum`, `sup`). Never rewritten by layout passes.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub classes: Vec<String>,
    /// Glyph run. Only meaningful on [`GlyphKind::Leaf`].
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    pub text: String,
    /// Child nodes in arrangement order.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<GlyphNode>,
    /// Last direction that changed this node's arrangement.
    ///
    /// `None` is the natural left-to-right arrangement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transform_state: Option<Direction>,
    /// The node carries its own horizontal mirror.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mirrored: bool,
    /// The node carries a compensating mirror cancelling an ancestor's.
    #[cfg_attr(feature = "serde", serde(default))]
    pub counter_mirrored: bool,
}

impl GlyphNode {
    /// Create an empty node of the given kind.
    #[must_use]
    pub fn new(kind: GlyphKind) -> Self {
        Self {
            kind,
            classes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            transform_state: None,
            mirrored: false,
            counter_mirrored: false,
        }
    }

    /// Create a leaf with text and a single role class.
    #[must_use]
    pub fn leaf(text: impl Into<String>, class: &str) -> Self {
        Self::new(GlyphKind::Leaf)
            .with_text(text)
            .with_class(class)
    }

    /// Create a group holding the given children.
    #[must_use]
    pub fn group(children: Vec<GlyphNode>) -> Self {
        Self::new(GlyphKind::Group).with_children(children)
    }

    /// Add a role class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    /// Set leaf text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<GlyphNode>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.kind == GlyphKind::Leaf
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// True when an odd number of horizontal mirrors applies to this node.
    #[must_use]
    pub fn flip_parity(&self) -> bool {
        self.mirrored != self.counter_mirrored
    }

    /// Concatenated leaf text in arrangement order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if self.is_leaf() {
            out.push_str(&self.text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Visit this node and all descendants in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a GlyphNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Visit every leaf mutably in pre-order.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut GlyphNode)) {
        if self.is_leaf() {
            f(self);
        }
        for child in &mut self.children {
            child.for_each_leaf_mut(f);
        }
    }

    /// First node of the given kind in pre-order, including `self`.
    #[must_use]
    pub fn find(&self, kind: GlyphKind) -> Option<&GlyphNode> {
        if self.kind == kind {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(kind))
    }

    /// Number of nodes of the given kind, including `self`.
    #[must_use]
    pub fn count(&self, kind: GlyphKind) -> usize {
        let mut count = 0;
        self.walk(&mut |node: &GlyphNode| {
            if node.kind == kind {
                count += 1;
            }
        });
        count
    }
}

/// Glyph tree with a [`GlyphKind::Group`] root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphTree {
    /// Root group.
    pub root: GlyphNode,
}

impl GlyphTree {
    /// Create a tree whose root group holds `children`.
    #[must_use]
    pub fn new(children: Vec<GlyphNode>) -> Self {
        Self {
            root: GlyphNode::group(children).with_class("base"),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Concatenated leaf text in arrangement order.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    /// First node of the given kind in pre-order.
    #[must_use]
    pub fn find(&self, kind: GlyphKind) -> Option<&GlyphNode> {
        self.root.find(kind)
    }

    /// Number of nodes of the given kind.
    #[must_use]
    pub fn count(&self, kind: GlyphKind) -> usize {
        self.root.count(kind)
    }
}
