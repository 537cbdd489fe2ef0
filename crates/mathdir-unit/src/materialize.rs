//! Equation materialization pipeline.
//!
//! `source` → limit forcing → glyph source → numeral transliteration →
//! directional layout → [`VisualArtifact`].

use std::borrow::Cow;
use std::sync::Arc;

use mathdir_glyph::{
    DEFAULT_LIMIT_OPERATORS, Direction, GlyphSource, GlyphTree, RenderError, TexSource, force_limits,
};
use mathdir_layout::{NumeralScript, apply_direction, transliterate};

use crate::artifact::{ArtifactContent, UnitLabels, VisualArtifact};
use crate::unit::EquationUnit;

/// Materializer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializerConfig {
    /// Direction for units created without an explicit one.
    pub default_direction: Direction,
    /// Target numeral script for digit glyphs.
    pub numeral_script: NumeralScript,
    /// Transliterate digits of LTR units too.
    pub transliterate_ltr: bool,
    /// Insert `\limits` after big operators before rendering.
    pub force_limits: bool,
    /// Operator names (without backslash) that get `\limits`.
    pub limit_operators: Vec<String>,
    /// Hints written on artifacts.
    pub labels: UnitLabels,
}

impl Default for MaterializerConfig {
    fn default() -> Self {
        Self {
            default_direction: Direction::default(),
            numeral_script: NumeralScript::default(),
            transliterate_ltr: true,
            force_limits: true,
            limit_operators: DEFAULT_LIMIT_OPERATORS.iter().map(|&op| op.to_owned()).collect(),
            labels: UnitLabels::default(),
        }
    }
}

/// Builds visual artifacts from equation values.
///
/// Render failures never propagate: they produce a fallback artifact and a
/// warning.
#[derive(Clone)]
pub struct Materializer {
    source: Arc<dyn GlyphSource>,
    config: MaterializerConfig,
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(TexSource::new(), MaterializerConfig::default())
    }
}

impl Materializer {
    /// Create a materializer over a glyph source.
    #[must_use]
    pub fn new(source: impl GlyphSource + 'static, config: MaterializerConfig) -> Self {
        Self::with_shared_source(Arc::new(source), config)
    }

    /// Create a materializer over a shared glyph source.
    #[must_use]
    pub fn with_shared_source(source: Arc<dyn GlyphSource>, config: MaterializerConfig) -> Self {
        Self { source, config }
    }

    #[must_use]
    pub fn config(&self) -> &MaterializerConfig {
        &self.config
    }

    /// Materialize a new unit with a fresh id.
    #[must_use]
    pub fn materialize(&self, source: &str, direction: Direction) -> VisualArtifact {
        self.materialize_unit(&EquationUnit::new(source, direction))
    }

    /// Materialize an existing unit, keeping its id.
    #[must_use]
    pub fn materialize_unit(&self, unit: &EquationUnit) -> VisualArtifact {
        let direction = unit.direction();
        let content = match self.render(unit.source().as_str(), direction) {
            Ok(tree) => ArtifactContent::Rendered(tree),
            Err(e) => {
                tracing::warn!(
                    id = %unit.id(),
                    source = %unit.source(),
                    error = %e,
                    "Failed to render equation, using fallback"
                );
                ArtifactContent::Fallback {
                    message: e.to_string(),
                }
            }
        };

        VisualArtifact {
            id: unit.id(),
            source: unit.source().clone(),
            direction,
            content,
            labels: self.config.labels.clone(),
        }
    }

    fn render(&self, source: &str, direction: Direction) -> Result<GlyphTree, RenderError> {
        let source = if self.config.force_limits {
            force_limits(source, self.config.limit_operators.as_slice())
        } else {
            Cow::Borrowed(source)
        };

        let mut tree = self.source.render(&source)?;

        if direction.is_rtl() || self.config.transliterate_ltr {
            transliterate(&mut tree, NumeralScript::Western, self.config.numeral_script);
        }
        apply_direction(&mut tree, direction);

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdir_glyph::GlyphKind;
    use pretty_assertions::assert_eq;

    struct FailingSource;

    impl GlyphSource for FailingSource {
        fn render(&self, _source: &str) -> Result<GlyphTree, RenderError> {
            Err(RenderError::Other("renderer offline".to_owned()))
        }
    }

    #[test]
    fn test_rtl_pipeline() {
        let artifact = Materializer::default().materialize("x^{2}", Direction::Rtl);
        let tree = artifact.tree().unwrap();

        let supsub = tree.find(GlyphKind::SupSub).unwrap();
        assert_eq!(supsub.transform_state, Some(Direction::Rtl));
        assert_eq!(tree.text_content(), "٢x");
    }

    #[test]
    fn test_limits_forced_and_preserved() {
        let artifact = Materializer::default().materialize(r"\sum_{i=1}^{n} i", Direction::Rtl);
        let tree = artifact.tree().unwrap();

        let limits = tree.find(GlyphKind::OperatorLimits).unwrap();
        assert!(limits.transform_state.is_none());
        assert_eq!(limits.children[0].text, "∑");
    }

    #[test]
    fn test_limits_not_forced_when_disabled() {
        let config = MaterializerConfig {
            force_limits: false,
            ..MaterializerConfig::default()
        };
        let materializer = Materializer::new(TexSource::new(), config);
        let artifact = materializer.materialize(r"\sum_{i=1}^{n} i", Direction::Rtl);
        assert!(artifact.tree().unwrap().find(GlyphKind::OperatorLimits).is_none());
    }

    #[test]
    fn test_ltr_transliterated_by_default() {
        let artifact = Materializer::default().materialize("12", Direction::Ltr);
        assert_eq!(artifact.tree().unwrap().text_content(), "١٢");
    }

    #[test]
    fn test_ltr_transliteration_can_be_disabled() {
        let config = MaterializerConfig {
            transliterate_ltr: false,
            ..MaterializerConfig::default()
        };
        let materializer = Materializer::new(TexSource::new(), config);
        assert_eq!(
            materializer.materialize("12", Direction::Ltr).tree().unwrap().text_content(),
            "12"
        );
        assert_eq!(
            materializer.materialize("12", Direction::Rtl).tree().unwrap().text_content(),
            "١٢"
        );
    }

    #[test]
    fn test_render_failure_falls_back() {
        let materializer = Materializer::new(FailingSource, MaterializerConfig::default());
        let artifact = materializer.materialize("x", Direction::Rtl);

        assert!(artifact.is_fallback());
        assert_eq!(artifact.error(), Some("renderer offline"));
        assert_eq!(artifact.source.as_str(), "x");
    }

    #[test]
    fn test_parse_error_falls_back() {
        let artifact = Materializer::default().materialize(r"\frac{1}", Direction::Rtl);
        assert!(artifact.is_fallback());
        assert!(artifact.to_html().contains("math-error"));
    }

    #[test]
    fn test_deep_nesting_falls_back() {
        let source = format!("{}x{}", "{".repeat(3_000), "}".repeat(3_000));
        let artifact = Materializer::default().materialize(&source, Direction::Rtl);

        assert!(artifact.is_fallback());
        assert_eq!(artifact.source.as_str(), source);
        assert!(artifact.error().unwrap().contains("nested too deeply"));
    }

    #[test]
    fn test_materialize_unit_keeps_id() {
        let unit = EquationUnit::new("a_1", Direction::Ltr);
        let artifact = Materializer::default().materialize_unit(&unit);
        assert_eq!(artifact.id, unit.id());
        assert_eq!(artifact.direction, Direction::Ltr);
    }
}
