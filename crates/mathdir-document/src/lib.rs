//! Host documents for equation units.
//!
//! A [`HostDocument`] stores atomic equation units among other content.
//! [`MarkupDocument`] keeps them inside HTML markup and round-trips them
//! through their stored values; [`MemoryDocument`] holds units only.
//!
//! ```
//! use mathdir_document::{HostDocument, MarkupDocument, set_direction_all};
//! use mathdir_glyph::Direction;
//! use mathdir_unit::Materializer;
//!
//! let materializer = Materializer::default();
//! let mut doc = MarkupDocument::load("<p>$$x^{2}$$</p>", &materializer);
//! set_direction_all(&mut doc, Direction::Ltr, &materializer);
//!
//! let reloaded = MarkupDocument::load(&doc.save(), &materializer);
//! assert_eq!(reloaded.list_atomic_units()[0].direction, Direction::Ltr);
//! ```

mod bulk;
mod error;
mod host;
mod markup;
mod memory;
mod scan;

pub use bulk::{BulkFailure, BulkReport, set_direction_all};
pub use error::DocumentError;
pub use host::HostDocument;
pub use markup::{MarkupDocument, Segment};
pub use memory::MemoryDocument;
