//! `mathdir render` command implementation.

use std::path::Path;

use clap::{Args, ValueEnum};
use mathdir_config::CliSettings;
use mathdir_glyph::{Direction, GlyphTree};
use mathdir_layout::NumeralScript;
use mathdir_unit::{VisualArtifact, serialize};
use serde::Serialize;

use super::load_materializer;
use crate::error::CliError;
use crate::output::Output;

/// Output format for a rendered equation.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum Format {
    /// Inline HTML element.
    #[default]
    Html,
    /// Laid-out glyph tree as JSON.
    Json,
    /// Stored value, as written to `data-equation`.
    Value,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// LaTeX source of the equation.
    latex: String,

    /// Layout direction (default: from config).
    #[arg(short, long)]
    direction: Option<Direction>,

    /// Numeral script for digits (overrides config).
    #[arg(long)]
    numerals: Option<NumeralScript>,

    /// Do not force `\limits` on big operators.
    #[arg(long)]
    no_limits: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,
}

#[derive(Serialize)]
struct RenderedJson<'a> {
    id: String,
    latex: &'a str,
    direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a GlyphTree>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or output fails.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            numeral_script: self.numerals,
            force_limits: self.no_limits.then_some(false),
            ..Default::default()
        };
        let materializer = load_materializer(config_path, &settings)?;
        let direction = self
            .direction
            .unwrap_or(materializer.config().default_direction);

        let artifact = materializer.materialize(&self.latex, direction);
        if let Some(message) = artifact.error() {
            output.warning(&format!("Warning: rendering failed, showing source: {message}"));
        }

        output.result(&format_artifact(&artifact, self.format)?)?;
        Ok(())
    }
}

/// Render `artifact` in the requested format.
fn format_artifact(artifact: &VisualArtifact, format: Format) -> Result<String, CliError> {
    match format {
        Format::Html => Ok(artifact.to_html()),
        Format::Value => Ok(serialize(&artifact.value())),
        Format::Json => {
            let json = RenderedJson {
                id: artifact.id.to_string(),
                latex: artifact.source.as_str(),
                direction: artifact.direction,
                error: artifact.error(),
                tree: artifact.tree(),
            };
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathdir_unit::Materializer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_value() {
        let materializer = Materializer::default();
        let rtl = materializer.materialize("x^2", Direction::Rtl);
        assert_eq!(format_artifact(&rtl, Format::Value).unwrap(), "x^2");

        let ltr = materializer.materialize("x^2", Direction::Ltr);
        assert_eq!(
            format_artifact(&ltr, Format::Value).unwrap(),
            r#"{"latex":"x^2","rtl":false}"#
        );
    }

    #[test]
    fn test_format_json_tree() {
        let artifact = Materializer::default().materialize("x^{2}", Direction::Rtl);
        let json: serde_json::Value =
            serde_json::from_str(&format_artifact(&artifact, Format::Json).unwrap()).unwrap();

        assert_eq!(json["direction"], "rtl");
        assert_eq!(json["latex"], "x^{2}");
        assert!(json.get("error").is_none());
        let supsub = &json["tree"]["root"]["children"][0];
        assert_eq!(supsub["kind"], "sup-sub");
        assert_eq!(supsub["transform_state"], "rtl");
    }

    #[test]
    fn test_format_json_fallback() {
        let artifact = Materializer::default().materialize(r"\frac{1}", Direction::Rtl);
        let json: serde_json::Value =
            serde_json::from_str(&format_artifact(&artifact, Format::Json).unwrap()).unwrap();

        assert!(json["error"].is_string());
        assert!(json.get("tree").is_none());
    }

    #[test]
    fn test_format_html() {
        let artifact = Materializer::default().materialize("1", Direction::Rtl);
        let html = format_artifact(&artifact, Format::Html).unwrap();
        assert!(html.starts_with("<span class=\"math-equation math-rtl\""));
    }
}
