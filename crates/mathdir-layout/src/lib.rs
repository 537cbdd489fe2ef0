//! Layout passes over glyph trees.
//!
//! Two independent passes run on a freshly rendered [`GlyphTree`](mathdir_glyph::GlyphTree):
//!
//! - [`transliterate`] rewrites digit glyphs into another numeral script;
//! - [`apply_direction`] rearranges scripts and radicals for a reading
//!   direction, leaving operator limits alone.
//!
//! The passes commute: leaf text and arrangement are disjoint concerns.

mod direction;
mod numerals;
mod proptests;

pub use direction::{LayoutReport, apply_direction};
pub use numerals::{NumeralScript, ParseNumeralScriptError, transliterate, transliterate_str};
