//! In-memory host document.

use mathdir_unit::{UnitId, VisualArtifact};

use crate::error::DocumentError;
use crate::host::HostDocument;

/// Host document holding only units, in order.
///
/// Use the builder methods to set up test data.
///
/// # Example
///
/// ```
/// use mathdir_document::{HostDocument, MemoryDocument};
/// use mathdir_glyph::Direction;
/// use mathdir_unit::Materializer;
///
/// let materializer = Materializer::default();
/// let doc = MemoryDocument::new()
///     .with_unit(materializer.materialize("x^2", Direction::Rtl))
///     .with_unit(materializer.materialize(r"\sqrt{y}", Direction::Ltr));
///
/// assert_eq!(doc.unit_count(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    units: Vec<VisualArtifact>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit.
    #[must_use]
    pub fn with_unit(mut self, artifact: VisualArtifact) -> Self {
        self.units.push(artifact);
        self
    }

    fn index_of(&self, id: UnitId) -> Result<usize, DocumentError> {
        self.units
            .iter()
            .position(|a| a.id == id)
            .ok_or(DocumentError::UnitNotFound(id))
    }
}

impl HostDocument for MemoryDocument {
    fn insert_atomic_unit(&mut self, position: usize, artifact: VisualArtifact) -> Result<(), DocumentError> {
        if position > self.units.len() {
            return Err(DocumentError::PositionOutOfRange {
                position,
                len: self.units.len(),
            });
        }
        if self.units.iter().any(|a| a.id == artifact.id) {
            return Err(DocumentError::DuplicateUnit(artifact.id));
        }
        self.units.insert(position, artifact);
        Ok(())
    }

    fn list_atomic_units(&self) -> Vec<&VisualArtifact> {
        self.units.iter().collect()
    }

    fn remove_atomic_unit(&mut self, id: UnitId) -> Result<VisualArtifact, DocumentError> {
        let index = self.index_of(id)?;
        Ok(self.units.remove(index))
    }

    fn replace_atomic_unit(&mut self, id: UnitId, artifact: VisualArtifact) -> Result<VisualArtifact, DocumentError> {
        let index = self.index_of(id)?;
        Ok(std::mem::replace(&mut self.units[index], artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdir_glyph::Direction;
    use mathdir_unit::Materializer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_list_remove() {
        let materializer = Materializer::default();
        let a = materializer.materialize("a", Direction::Rtl);
        let b = materializer.materialize("b", Direction::Rtl);
        let (a_id, b_id) = (a.id, b.id);

        let mut doc = MemoryDocument::new().with_unit(a);
        doc.insert_atomic_unit(0, b).unwrap();
        let ids: Vec<_> = doc.list_atomic_units().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![b_id, a_id]);

        let removed = doc.remove_atomic_unit(b_id).unwrap();
        assert_eq!(removed.source.as_str(), "b");
        assert_eq!(doc.unit_count(), 1);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut doc = MemoryDocument::new();
        let artifact = Materializer::default().materialize("x", Direction::Rtl);
        let err = doc.insert_atomic_unit(3, artifact).unwrap_err();
        assert!(matches!(err, DocumentError::PositionOutOfRange { position: 3, len: 0 }));
    }

    #[test]
    fn test_duplicate_rejected() {
        let artifact = Materializer::default().materialize("x", Direction::Rtl);
        let mut doc = MemoryDocument::new().with_unit(artifact.clone());
        let err = doc.insert_atomic_unit(1, artifact).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateUnit(_)));
    }

    #[test]
    fn test_replace_and_missing() {
        let materializer = Materializer::default();
        let artifact = materializer.materialize("x", Direction::Rtl);
        let id = artifact.id;
        let mut doc = MemoryDocument::new().with_unit(artifact);

        let previous = doc
            .replace_atomic_unit(id, materializer.materialize("y", Direction::Ltr))
            .unwrap();
        assert_eq!(previous.source.as_str(), "x");
        assert_eq!(doc.list_atomic_units()[0].source.as_str(), "y");

        let err = doc.remove_atomic_unit(id).unwrap_err();
        assert!(matches!(err, DocumentError::UnitNotFound(_)));
    }
}
