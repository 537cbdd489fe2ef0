//! Visual artifact produced by materialization.

use std::fmt::Write;

use mathdir_glyph::{Direction, GlyphNode, GlyphTree};

use crate::unit::{EquationSource, UnitId};
use crate::value::{self, UnitValue};

/// Class carried by every materialized unit.
pub const UNIT_CLASS: &str = "math-equation";

/// Class added to fallback artifacts.
pub const ERROR_CLASS: &str = "math-error";

/// Attribute holding the stored value.
pub const VALUE_ATTR: &str = "data-equation";

/// User-facing hints written on every artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLabels {
    /// Short hint shown on hover.
    pub edit_hint: String,
    /// Tooltip text.
    pub tooltip: String,
}

impl Default for UnitLabels {
    fn default() -> Self {
        Self {
            edit_hint: "Click to edit equation / انقر للتعديل".to_owned(),
            tooltip: "Double-click to edit equation / انقر نقراً مزدوجاً للتعديل".to_owned(),
        }
    }
}

/// Rendered content of an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    /// Laid-out glyph tree.
    Rendered(GlyphTree),
    /// Rendering failed; the raw source is shown instead.
    Fallback {
        /// Render error message.
        message: String,
    },
}

/// Materialized equation unit.
///
/// A projection of `{ id, source, direction }`: always rebuilt wholesale,
/// never patched. Artifacts are atomic (not editable in place) and
/// activatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualArtifact {
    pub id: UnitId,
    pub source: EquationSource,
    pub direction: Direction,
    pub content: ArtifactContent,
    pub labels: UnitLabels,
}

impl VisualArtifact {
    /// Stored value for this artifact.
    #[must_use]
    pub fn value(&self) -> UnitValue {
        UnitValue::new(self.source.as_str(), self.direction)
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.content, ArtifactContent::Fallback { .. })
    }

    #[must_use]
    pub fn tree(&self) -> Option<&GlyphTree> {
        match &self.content {
            ArtifactContent::Rendered(tree) => Some(tree),
            ArtifactContent::Fallback { .. } => None,
        }
    }

    /// Render error message for fallback artifacts.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.content {
            ArtifactContent::Rendered(_) => None,
            ArtifactContent::Fallback { message } => Some(message),
        }
    }

    /// Project the artifact as an inline HTML element.
    #[must_use]
    pub fn to_html(&self) -> String {
        let dir = self.direction.as_str();
        let mut html = String::with_capacity(256);

        html.push_str("<span class=\"");
        html.push_str(UNIT_CLASS);
        let _ = write!(html, " math-{dir}");
        if self.is_fallback() {
            html.push(' ');
            html.push_str(ERROR_CLASS);
        }
        html.push('"');

        push_attr(&mut html, "data-unit-id", &self.id.to_string());
        push_attr(&mut html, VALUE_ATTR, &value::serialize(&self.value()));
        push_attr(&mut html, "data-latex", self.source.as_str());
        push_attr(&mut html, "data-rtl", if self.direction.is_rtl() { "true" } else { "false" });
        push_attr(&mut html, "dir", dir);
        push_attr(&mut html, "contenteditable", "false");
        push_attr(&mut html, "data-edit-hint", &self.labels.edit_hint);
        push_attr(&mut html, "title", &self.labels.tooltip);

        match &self.content {
            ArtifactContent::Rendered(tree) => {
                html.push('>');
                push_node(&mut html, &tree.root);
            }
            ArtifactContent::Fallback { message } => {
                push_attr(&mut html, "data-error", message);
                html.push('>');
                html.push_str(&escape_text(self.source.as_str()));
            }
        }

        html.push_str("</span>");
        html
    }
}

fn push_attr(html: &mut String, name: &str, value: &str) {
    let _ = write!(html, " {name}=\"{}\"", escape_attr(value));
}

fn push_node(html: &mut String, node: &GlyphNode) {
    html.push_str("<span class=\"");
    let classes = node
        .kind
        .css_class()
        .into_iter()
        .chain(node.classes.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    html.push_str(&escape_attr(&classes));
    html.push('"');

    if let Some(state) = node.transform_state {
        push_attr(html, "data-transform", state.as_str());
    }
    if node.flip_parity() {
        push_attr(html, "style", "transform: scaleX(-1)");
    }
    html.push('>');

    if node.is_leaf() {
        html.push_str(&escape_text(&node.text));
    }
    for child in &node.children {
        push_node(html, child);
    }

    html.push_str("</span>");
}

/// Escape text for HTML content.
pub(crate) fn escape_text(text: &str) -> String {
    escape_html(text, false)
}

/// Escape text for HTML attribute values.
pub(crate) fn escape_attr(text: &str) -> String {
    escape_html(text, true)
}

fn escape_html(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdir_glyph::GlyphKind;

    fn artifact(content: ArtifactContent, direction: Direction) -> VisualArtifact {
        VisualArtifact {
            id: UnitId::new(),
            source: EquationSource::new("x<2"),
            direction,
            content,
            labels: UnitLabels::default(),
        }
    }

    #[test]
    fn test_rendered_html_attributes() {
        let tree = GlyphTree::new(vec![GlyphNode::leaf("x", "mord")]);
        let html = artifact(ArtifactContent::Rendered(tree), Direction::Rtl).to_html();

        assert!(html.starts_with("<span class=\"math-equation math-rtl\""));
        assert!(html.contains(" data-equation=\"x&lt;2\""));
        assert!(html.contains(" data-rtl=\"true\""));
        assert!(html.contains(" dir=\"rtl\""));
        assert!(html.contains(" contenteditable=\"false\""));
        assert!(html.contains(" data-edit-hint=\"Click to edit equation"));
        assert!(html.contains("<span class=\"mgroup base\"><span class=\"mord\">x</span></span>"));
        assert!(html.ends_with("</span>"));
    }

    #[test]
    fn test_ltr_value_attribute_is_tagged() {
        let tree = GlyphTree::new(Vec::new());
        let html = artifact(ArtifactContent::Rendered(tree), Direction::Ltr).to_html();
        assert!(html.contains("math-ltr"));
        assert!(html.contains(" data-equation=\"{&quot;latex&quot;:&quot;x&lt;2&quot;,&quot;rtl&quot;:false}\""));
        assert!(html.contains(" data-rtl=\"false\""));
    }

    #[test]
    fn test_fallback_html() {
        let content = ArtifactContent::Fallback {
            message: "unknown command \\foo".to_owned(),
        };
        let artifact = artifact(content, Direction::Rtl);
        assert!(artifact.is_fallback());
        assert!(artifact.tree().is_none());

        let html = artifact.to_html();
        assert!(html.contains("math-error"));
        assert!(html.contains(" data-error=\"unknown command \\foo\""));
        assert!(html.contains(">x&lt;2</span>"));
    }

    #[test]
    fn test_mirrored_node_gets_transform() {
        let mut radical = GlyphNode::new(GlyphKind::Radical).with_children(vec![GlyphNode::leaf("y", "mord")]);
        radical.mirrored = true;
        radical.transform_state = Some(Direction::Rtl);
        let tree = GlyphTree::new(vec![radical]);
        let html = artifact(ArtifactContent::Rendered(tree), Direction::Rtl).to_html();

        assert!(html.contains(
            "<span class=\"sqrt\" data-transform=\"rtl\" style=\"transform: scaleX(-1)\">"
        ));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_text("a<b & 'c'"), "a&lt;b &amp; 'c'");
        assert_eq!(escape_attr("\"q\""), "&quot;q&quot;");
    }
}
