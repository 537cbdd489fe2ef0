//! Equation units.
//!
//! An [`EquationUnit`] is the atomic value embedded in a host document:
//! `{ id, source, direction }`. This crate provides:
//!
//! - the stored value format ([`serialize`] / [`deserialize`]);
//! - the [`Materializer`] that turns a unit into a [`VisualArtifact`];
//! - click-to-edit re-entry through [`Activate`];
//! - the [`UnitRegistry`] binding a host runtime to the unit constructor;
//! - the editor's [`TemplateSet`].
//!
//! # Example
//!
//! ```
//! use mathdir_glyph::Direction;
//! use mathdir_unit::{Materializer, deserialize, serialize};
//!
//! let materializer = Materializer::default();
//! let artifact = materializer.materialize("x^{2}", Direction::Rtl);
//! assert!(!artifact.is_fallback());
//!
//! let stored = serialize(&artifact.value());
//! assert_eq!(deserialize(&stored), artifact.value());
//! ```

mod activate;
mod artifact;
mod materialize;
mod proptests;
mod registry;
mod templates;
mod unit;
mod value;

pub use activate::{Activate, EditRequest};
pub use artifact::{ArtifactContent, ERROR_CLASS, UNIT_CLASS, UnitLabels, VALUE_ATTR, VisualArtifact};
pub use materialize::{Materializer, MaterializerConfig};
pub use registry::{HostRuntime, RegistryError, UnitConstructor, UnitKind, UnitRegistry};
pub use templates::{Template, TemplateError, TemplateSet};
pub use unit::{EquationSource, EquationUnit, UnitId};
pub use value::{UnitValue, deserialize, serialize};
