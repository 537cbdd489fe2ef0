//! Document-wide direction changes.

use mathdir_glyph::Direction;
use mathdir_unit::{EquationUnit, Materializer, UnitId};

use crate::host::HostDocument;

/// A unit the bulk pass could not update cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: UnitId,
    pub message: String,
}

/// Outcome of [`set_direction_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Units whose direction changed.
    pub changed: usize,
    /// Units already in the target direction (re-materialized anyway).
    pub unchanged: usize,
    /// Units that rendered as fallbacks or could not be replaced.
    pub failures: Vec<BulkFailure>,
}

impl BulkReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.changed + self.unchanged
    }
}

/// Set every unit in `doc` to `direction`.
///
/// Each unit is re-materialized on its own with its id kept. A unit that
/// fails is recorded and the pass moves on to the next one.
pub fn set_direction_all(
    doc: &mut impl HostDocument,
    direction: Direction,
    materializer: &Materializer,
) -> BulkReport {
    let units: Vec<(UnitId, String, Direction)> = doc
        .list_atomic_units()
        .into_iter()
        .map(|a| (a.id, a.source.as_str().to_owned(), a.direction))
        .collect();

    let mut report = BulkReport::default();
    for (id, source, previous) in units {
        let artifact = materializer.materialize_unit(&EquationUnit::with_id(id, source, direction));
        let fallback = artifact.error().map(str::to_owned);

        if let Err(e) = doc.replace_atomic_unit(id, artifact) {
            tracing::warn!(%id, error = %e, "Failed to replace unit");
            report.failures.push(BulkFailure {
                id,
                message: e.to_string(),
            });
            continue;
        }

        if previous == direction {
            report.unchanged += 1;
        } else {
            report.changed += 1;
        }
        if let Some(message) = fallback {
            report.failures.push(BulkFailure { id, message });
        }
    }

    tracing::info!(
        direction = %direction,
        changed = report.changed,
        unchanged = report.unchanged,
        failures = report.failures.len(),
        "Set direction on all units"
    );
    report
}
