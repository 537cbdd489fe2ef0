//! Stored value format.
//!
//! A unit is persisted as a single string:
//!
//! - bare notation source, when the direction is the default (RTL) and the
//!   source cannot be mistaken for a tagged value;
//! - otherwise a tagged JSON object `{"latex":"…","rtl":true|false}`.
//!
//! Reading never fails: anything that does not parse as a tagged value is
//! taken as bare source with the default direction.

use mathdir_glyph::Direction;
use serde::Deserialize;

/// `{ source, direction }` pair carried by the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitValue {
    pub source: String,
    pub direction: Direction,
}

impl UnitValue {
    #[must_use]
    pub fn new(source: impl Into<String>, direction: Direction) -> Self {
        Self {
            source: source.into(),
            direction,
        }
    }
}

#[derive(Deserialize)]
struct TaggedValue {
    latex: String,
    #[serde(default = "default_rtl")]
    rtl: bool,
}

fn default_rtl() -> bool {
    Direction::default().is_rtl()
}

/// True when `value` would be read as a tagged object.
fn looks_tagged(value: &str) -> bool {
    value.trim_start().starts_with('{')
}

/// Encode a value for storage.
#[must_use]
pub fn serialize(value: &UnitValue) -> String {
    if value.direction == Direction::default() && !looks_tagged(&value.source) {
        return value.source.clone();
    }

    serde_json::json!({
        "latex": value.source,
        "rtl": value.direction.is_rtl(),
    })
    .to_string()
}

/// Decode a stored value.
#[must_use]
pub fn deserialize(value: &str) -> UnitValue {
    if looks_tagged(value) {
        match serde_json::from_str::<TaggedValue>(value.trim()) {
            Ok(tagged) => return UnitValue::new(tagged.latex, Direction::from_rtl_flag(tagged.rtl)),
            Err(e) => {
                tracing::debug!(error = %e, "Stored value is not tagged, using it as source");
            }
        }
    }

    UnitValue::new(value, Direction::default())
}
