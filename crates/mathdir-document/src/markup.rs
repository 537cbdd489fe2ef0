//! Host document backed by HTML markup.

use std::collections::HashSet;

use mathdir_glyph::Direction;
use mathdir_unit::{Activate, EditRequest, EquationUnit, Materializer, UnitId, VisualArtifact};

use crate::error::DocumentError;
use crate::host::HostDocument;
use crate::scan::{Piece, scan};

/// Part of a markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Markup kept byte-for-byte.
    Markup(String),
    /// Materialized equation unit.
    Unit(VisualArtifact),
}

/// HTML document with embedded equation units.
///
/// Loading never fails: units whose stored value is missing or unreadable
/// degrade to their raw text, and units that fail to render become
/// fallback artifacts. Saving writes every unit's current artifact, so a
/// saved document reloads to the same values.
#[derive(Debug, Clone)]
pub struct MarkupDocument {
    segments: Vec<Segment>,
    materializer: Materializer,
}

impl MarkupDocument {
    /// Empty document.
    #[must_use]
    pub fn new(materializer: &Materializer) -> Self {
        Self {
            segments: Vec::new(),
            materializer: materializer.clone(),
        }
    }

    /// Parse markup and materialize every unit it contains.
    ///
    /// Stored unit ids are kept when valid and unique.
    #[must_use]
    pub fn load(html: &str, materializer: &Materializer) -> Self {
        let default_direction = materializer.config().default_direction;
        let mut seen = HashSet::new();
        let mut segments = Vec::new();

        for piece in scan(html) {
            let unit = match piece {
                Piece::Markup(markup) => {
                    segments.push(Segment::Markup(markup));
                    continue;
                }
                Piece::Unit { id, value } => match id.filter(|id| seen.insert(*id)) {
                    Some(id) => EquationUnit::with_id(id, value.source, value.direction),
                    None => EquationUnit::new(value.source, value.direction),
                },
                Piece::Inline(source) => EquationUnit::new(source, default_direction),
            };
            seen.insert(unit.id());
            segments.push(Segment::Unit(materializer.materialize_unit(&unit)));
        }

        let doc = Self {
            segments,
            materializer: materializer.clone(),
        };
        tracing::debug!(
            segments = doc.segments.len(),
            units = doc.unit_count(),
            "Loaded document"
        );
        doc
    }

    /// Serialize back to markup.
    #[must_use]
    pub fn save(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markup(markup) => html.push_str(markup),
                Segment::Unit(artifact) => html.push_str(&artifact.to_html()),
            }
        }
        html
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Activate the unit at `index` in document order.
    pub fn activate(&self, index: usize) -> Result<EditRequest, DocumentError> {
        self.list_atomic_units()
            .get(index)
            .map(|artifact| artifact.on_activate())
            .ok_or(DocumentError::NoUnitAtIndex(index))
    }

    /// Commit an edit to an existing unit, keeping its id.
    pub fn apply_edit(
        &mut self,
        id: UnitId,
        source: &str,
        direction: Direction,
    ) -> Result<&VisualArtifact, DocumentError> {
        let unit = EquationUnit::with_id(id, source, direction);
        let artifact = self.materializer.materialize_unit(&unit);
        let index = self.segment_of(id)?;
        self.segments[index] = Segment::Unit(artifact);
        tracing::info!(%id, direction = %direction, "Applied edit");

        match &self.segments[index] {
            Segment::Unit(artifact) => Ok(artifact),
            Segment::Markup(_) => Err(DocumentError::UnitNotFound(id)),
        }
    }

    /// Insert a new unit from an edit request at a segment position.
    pub fn insert_equation(
        &mut self,
        position: usize,
        source: &str,
        direction: Direction,
    ) -> Result<UnitId, DocumentError> {
        let artifact = self.materializer.materialize(source, direction);
        let id = artifact.id;
        self.insert_atomic_unit(position, artifact)?;
        Ok(id)
    }

    fn segment_of(&self, id: UnitId) -> Result<usize, DocumentError> {
        self.segments
            .iter()
            .position(|s| matches!(s, Segment::Unit(a) if a.id == id))
            .ok_or(DocumentError::UnitNotFound(id))
    }
}

impl HostDocument for MarkupDocument {
    fn insert_atomic_unit(&mut self, position: usize, artifact: VisualArtifact) -> Result<(), DocumentError> {
        if position > self.segments.len() {
            return Err(DocumentError::PositionOutOfRange {
                position,
                len: self.segments.len(),
            });
        }
        if self.segment_of(artifact.id).is_ok() {
            return Err(DocumentError::DuplicateUnit(artifact.id));
        }
        self.segments.insert(position, Segment::Unit(artifact));
        Ok(())
    }

    fn list_atomic_units(&self) -> Vec<&VisualArtifact> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Unit(artifact) => Some(artifact),
                Segment::Markup(_) => None,
            })
            .collect()
    }

    fn remove_atomic_unit(&mut self, id: UnitId) -> Result<VisualArtifact, DocumentError> {
        let index = self.segment_of(id)?;
        match self.segments.remove(index) {
            Segment::Unit(artifact) => Ok(artifact),
            Segment::Markup(_) => Err(DocumentError::UnitNotFound(id)),
        }
    }

    fn replace_atomic_unit(&mut self, id: UnitId, artifact: VisualArtifact) -> Result<VisualArtifact, DocumentError> {
        let index = self.segment_of(id)?;
        match std::mem::replace(&mut self.segments[index], Segment::Unit(artifact)) {
            Segment::Unit(previous) => Ok(previous),
            Segment::Markup(_) => Err(DocumentError::UnitNotFound(id)),
        }
    }
}
