//! Glyph trees for math notation.
//!
//! This crate defines the positioned-node model that the directional layout
//! pass operates on, the [`GlyphSource`] abstraction over notation renderers,
//! and [`TexSource`], a built-in renderer for a LaTeX math subset.
//!
//! # Example
//!
//! ```
//! use mathdir_glyph::{GlyphKind, GlyphSource, TexSource, force_limits, DEFAULT_LIMIT_OPERATORS};
//!
//! let source = force_limits(r"\sum_{i=1}^{n} i", DEFAULT_LIMIT_OPERATORS);
//! let tree = TexSource::new().render(&source).unwrap();
//! assert_eq!(tree.count(GlyphKind::OperatorLimits), 1);
//! ```

mod limits;
mod source;
mod tex;
mod tree;

pub use limits::{DEFAULT_LIMIT_OPERATORS, force_limits};
pub use source::{GlyphSource, RenderError};
pub use tex::TexSource;
pub use tree::{Direction, GlyphKind, GlyphNode, GlyphTree, ParseDirectionError};
