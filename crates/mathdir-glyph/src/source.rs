//! Glyph source abstraction.

use crate::tree::GlyphTree;

/// Converts a notation string into a glyph tree with left-to-right layout.
///
/// Implementations must be shareable across the materializer and the
/// registry, hence `Send + Sync`.
pub trait GlyphSource: Send + Sync {
    /// Render `source` into a fresh glyph tree.
    ///
    /// Every call returns a new tree owned by the caller.
    fn render(&self, source: &str) -> Result<GlyphTree, RenderError>;
}

/// Error returned when a glyph source rejects its input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// Command name not supported by the source.
    #[error("unknown command \\{name} at byte {offset}")]
    UnknownCommand {
        /// Command name without the backslash.
        name: String,
        /// Byte offset of the backslash.
        offset: usize,
    },

    /// Group opened but never closed, or closed without being opened.
    #[error("unbalanced group at byte {offset}")]
    UnbalancedGroup {
        /// Byte offset of the offending brace.
        offset: usize,
    },

    /// Command requires an argument that is missing.
    #[error("\\{command} expects an argument at byte {offset}")]
    MissingArgument {
        /// Command name without the backslash.
        command: String,
        /// Byte offset where the argument was expected.
        offset: usize,
    },

    /// Token not valid at this position.
    #[error("unexpected {found} at byte {offset}")]
    UnexpectedToken {
        /// Description of the token.
        found: String,
        /// Byte offset of the token.
        offset: usize,
    },

    /// Groups nested deeper than the parser accepts.
    #[error("groups nested too deeply at byte {offset}")]
    TooDeep {
        /// Byte offset where the limit was reached.
        offset: usize,
    },

    /// Failure reported by an external source.
    #[error("{0}")]
    Other(String),
}
