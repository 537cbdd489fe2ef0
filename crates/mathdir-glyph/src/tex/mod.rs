//! Built-in glyph source for a LaTeX math subset.
//!
//! Supports plain characters and digit runs, symbol and operator commands,
//! `^`/`_` scripts, `\frac`, `\sqrt[n]{}`, `\left`/`\right`, `\text`-like
//! raw runs, spacing commands, and `\limits`/`\nolimits` on operators.

mod lexer;
mod parser;
mod symbols;

use crate::source::{GlyphSource, RenderError};
use crate::tree::GlyphTree;

/// LaTeX subset renderer.
///
/// Operators followed by an explicit `\limits` and scripts become
/// [`GlyphKind::OperatorLimits`](crate::GlyphKind::OperatorLimits); otherwise
/// scripts form a [`GlyphKind::SupSub`](crate::GlyphKind::SupSub).
#[derive(Debug, Default, Clone, Copy)]
pub struct TexSource;

impl TexSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GlyphSource for TexSource {
    fn render(&self, source: &str) -> Result<GlyphTree, RenderError> {
        parser::parse(source).map(GlyphTree::new)
    }
}
