//! Equation unit value types.

use std::fmt;
use std::str::FromStr;

use mathdir_glyph::Direction;
use uuid::Uuid;

use crate::value::UnitValue;

/// Raw notation text of an equation.
///
/// Never mutated; edits replace it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EquationSource {
    text: String,
}

impl EquationSource {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for EquationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for EquationSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for EquationSource {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// Identity of an equation unit. Random v4 UUID, stable across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(Uuid);

impl UnitId {
    /// Allocate a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for UnitId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Atomic equation embedded in a host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationUnit {
    id: UnitId,
    source: EquationSource,
    direction: Direction,
}

impl EquationUnit {
    /// Create a unit with a fresh identifier.
    #[must_use]
    pub fn new(source: impl Into<EquationSource>, direction: Direction) -> Self {
        Self::with_id(UnitId::new(), source, direction)
    }

    /// Create a unit with a known identifier.
    #[must_use]
    pub fn with_id(id: UnitId, source: impl Into<EquationSource>, direction: Direction) -> Self {
        Self {
            id,
            source: source.into(),
            direction,
        }
    }

    /// Create a unit from a deserialized value.
    #[must_use]
    pub fn from_value(value: UnitValue) -> Self {
        Self::new(value.source, value.direction)
    }

    #[must_use]
    pub fn id(&self) -> UnitId {
        self.id
    }

    #[must_use]
    pub fn source(&self) -> &EquationSource {
        &self.source
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Serializable `{ source, direction }` pair.
    #[must_use]
    pub fn value(&self) -> UnitValue {
        UnitValue::new(self.source.as_str(), self.direction)
    }

    /// Replace source and direction together. The id is kept.
    pub fn edit(&mut self, source: impl Into<EquationSource>, direction: Direction) {
        self.source = source.into();
        self.direction = direction;
    }

    /// Flip the direction, keeping the source.
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
    }
}
