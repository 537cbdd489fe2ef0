//! Host document contract.

use mathdir_unit::{UnitId, VisualArtifact};

use crate::error::DocumentError;

/// Rich-text surface storing atomic equation units among other content.
///
/// Positions are segment indices: `0` inserts before everything, the
/// segment count appends.
pub trait HostDocument {
    /// Insert a unit at a segment position.
    fn insert_atomic_unit(&mut self, position: usize, artifact: VisualArtifact) -> Result<(), DocumentError>;

    /// Units in document order.
    fn list_atomic_units(&self) -> Vec<&VisualArtifact>;

    /// Remove a unit and return it.
    fn remove_atomic_unit(&mut self, id: UnitId) -> Result<VisualArtifact, DocumentError>;

    /// Replace a unit in place, returning the previous artifact.
    fn replace_atomic_unit(&mut self, id: UnitId, artifact: VisualArtifact) -> Result<VisualArtifact, DocumentError>;

    /// Number of units.
    fn unit_count(&self) -> usize {
        self.list_atomic_units().len()
    }

    /// Look up a unit by id.
    fn find_atomic_unit(&self, id: UnitId) -> Option<&VisualArtifact> {
        self.list_atomic_units().into_iter().find(|a| a.id == id)
    }
}
