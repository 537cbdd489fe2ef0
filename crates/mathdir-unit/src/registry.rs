//! Equation unit registry.
//!
//! Binds a host editor runtime to the [`UnitConstructor`]. The runtime is
//! set once; the constructor is built lazily on first request and cached.

use std::sync::{Arc, OnceLock};

use crate::artifact::{UNIT_CLASS, VisualArtifact};
use crate::materialize::Materializer;
use crate::value;

/// Atomic unit kind announced to the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitKind {
    /// Registration name.
    pub name: &'static str,
    /// Element tag.
    pub tag: &'static str,
    /// Element class.
    pub class: &'static str,
}

impl UnitKind {
    /// The equation unit kind.
    pub const EQUATION: Self = Self {
        name: "math",
        tag: "span",
        class: UNIT_CLASS,
    };
}

/// Extension point of the host editor runtime.
pub trait HostRuntime: Send + Sync {
    /// Register an atomic unit kind.
    ///
    /// Returns [`RegistryError::Refused`] when the runtime cannot accept it
    /// yet; registration is retried on the next constructor request.
    fn register_unit_kind(&self, kind: &UnitKind) -> Result<(), RegistryError>;
}

/// Registry error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A host runtime was already set.
    #[error("host runtime already set")]
    RuntimeAlreadySet,
    /// The host runtime refused a unit kind.
    #[error("host runtime refused unit kind '{kind}': {reason}")]
    Refused {
        /// Unit kind name.
        kind: String,
        /// Reason reported by the runtime.
        reason: String,
    },
}

/// Creates equation artifacts from stored values.
#[derive(Debug)]
pub struct UnitConstructor {
    kind: UnitKind,
    materializer: Arc<Materializer>,
}

impl UnitConstructor {
    #[must_use]
    pub fn kind(&self) -> &UnitKind {
        &self.kind
    }

    /// Parse a stored value and materialize it as a new unit.
    #[must_use]
    pub fn create(&self, stored: &str) -> VisualArtifact {
        let value = value::deserialize(stored);
        self.materializer.materialize(&value.source, value.direction)
    }

    /// Stored value of an artifact.
    #[must_use]
    pub fn value(&self, artifact: &VisualArtifact) -> String {
        value::serialize(&artifact.value())
    }
}

/// Maps a host runtime to the equation unit constructor.
pub struct UnitRegistry {
    materializer: Arc<Materializer>,
    runtime: OnceLock<Arc<dyn HostRuntime>>,
    constructor: OnceLock<Arc<UnitConstructor>>,
}

impl std::fmt::Debug for UnitRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRegistry")
            .field("has_runtime", &self.has_runtime())
            .field("constructor", &self.constructor.get())
            .finish_non_exhaustive()
    }
}

impl UnitRegistry {
    #[must_use]
    pub fn new(materializer: Materializer) -> Self {
        Self {
            materializer: Arc::new(materializer),
            runtime: OnceLock::new(),
            constructor: OnceLock::new(),
        }
    }

    /// Set the host runtime. Only the first call succeeds.
    pub fn set_host_runtime(&self, runtime: Arc<dyn HostRuntime>) -> Result<(), RegistryError> {
        self.runtime
            .set(runtime)
            .map_err(|_| RegistryError::RuntimeAlreadySet)
    }

    #[must_use]
    pub fn has_runtime(&self) -> bool {
        self.runtime.get().is_some()
    }

    /// Constructor bound to the host runtime.
    ///
    /// Returns `None` when no runtime is set or the runtime refuses the
    /// registration; the next call tries again.
    pub fn unit_constructor(&self) -> Option<Arc<UnitConstructor>> {
        if let Some(constructor) = self.constructor.get() {
            return Some(Arc::clone(constructor));
        }

        let Some(runtime) = self.runtime.get() else {
            tracing::debug!("No host runtime set, equation units unavailable");
            return None;
        };

        let kind = UnitKind::EQUATION;
        if let Err(e) = runtime.register_unit_kind(&kind) {
            tracing::warn!(kind = kind.name, error = %e, "Failed to register equation unit kind");
            return None;
        }
        tracing::info!(kind = kind.name, tag = kind.tag, "Registered equation unit kind");

        let constructor = self.constructor.get_or_init(|| {
            Arc::new(UnitConstructor {
                kind,
                materializer: Arc::clone(&self.materializer),
            })
        });
        Some(Arc::clone(constructor))
    }
}
