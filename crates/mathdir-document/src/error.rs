//! Document error types.

use mathdir_unit::UnitId;

/// Host document error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// Insert position past the end of the document.
    #[error("position {position} out of range (document has {len} segments)")]
    PositionOutOfRange {
        /// Requested segment index.
        position: usize,
        /// Number of segments.
        len: usize,
    },
    /// No unit with this id.
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),
    /// A unit with this id is already present.
    #[error("unit {0} already in document")]
    DuplicateUnit(UnitId),
    /// No unit at this index.
    #[error("no unit at index {0}")]
    NoUnitAtIndex(usize),
    /// Unit element markup could not be decoded.
    #[error("malformed unit markup: {0}")]
    Markup(#[from] quick_xml::Error),
    /// Unit element has no usable tag.
    #[error("malformed unit element: {0}")]
    MalformedElement(String),
}
