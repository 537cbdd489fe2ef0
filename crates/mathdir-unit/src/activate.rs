//! Click-to-edit re-entry.

use mathdir_glyph::Direction;

use crate::artifact::VisualArtifact;
use crate::unit::{EquationUnit, UnitId};

/// Request to reopen an editing surface pre-filled with a unit's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub id: UnitId,
    pub source: String,
    pub direction: Direction,
}

/// Activation (click or double-click) of an atomic unit.
///
/// Both gestures yield the same request; the caller owns the editing
/// surface and applies the result through an edit of the unit.
pub trait Activate {
    fn on_activate(&self) -> EditRequest;
}

impl Activate for VisualArtifact {
    fn on_activate(&self) -> EditRequest {
        EditRequest {
            id: self.id,
            source: self.source.as_str().to_owned(),
            direction: self.direction,
        }
    }
}

impl Activate for EquationUnit {
    fn on_activate(&self) -> EditRequest {
        EditRequest {
            id: self.id(),
            source: self.source().as_str().to_owned(),
            direction: self.direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::Materializer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_artifact_activation_reads_back_value() {
        let unit = EquationUnit::new(r"\sqrt{x}", Direction::Ltr);
        let artifact = Materializer::default().materialize_unit(&unit);

        let request = artifact.on_activate();
        assert_eq!(request, unit.on_activate());
        assert_eq!(request.source, r"\sqrt{x}");
        assert_eq!(request.direction, Direction::Ltr);
    }

    #[test]
    fn test_fallback_artifact_is_activatable() {
        let artifact = Materializer::default().materialize(r"\unknown", Direction::Rtl);
        assert!(artifact.is_fallback());
        assert_eq!(artifact.on_activate().source, r"\unknown");
    }
}
