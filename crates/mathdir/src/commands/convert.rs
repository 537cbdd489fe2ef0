//! `mathdir convert` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mathdir_config::CliSettings;
use mathdir_document::{BulkReport, HostDocument, MarkupDocument, set_direction_all};
use mathdir_glyph::Direction;
use mathdir_layout::NumeralScript;
use mathdir_unit::Materializer;

use super::load_materializer;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Saved HTML document.
    file: PathBuf,

    /// Set every equation to this direction.
    #[arg(short, long)]
    direction: Option<Direction>,

    /// Numeral script for digits (overrides config).
    #[arg(long)]
    numerals: Option<NumeralScript>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or written.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            numeral_script: self.numerals,
            ..Default::default()
        };
        let materializer = load_materializer(config_path, &settings)?;

        let html = std::fs::read_to_string(&self.file)?;
        output.info(&format!("Converting {}...", self.file.display()));

        let (converted, report) = convert(&html, self.direction, &materializer);
        if let Some(report) = &report {
            print_report(&output, report);
        }

        match &self.output {
            Some(path) => {
                std::fs::write(path, converted)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => output.result(&converted)?,
        }
        Ok(())
    }
}

/// Load `html`, optionally set every unit's direction, and save it again.
fn convert(html: &str, direction: Option<Direction>, materializer: &Materializer) -> (String, Option<BulkReport>) {
    let mut doc = MarkupDocument::load(html, materializer);
    let report = direction.map(|direction| set_direction_all(&mut doc, direction, materializer));
    tracing::info!(units = doc.unit_count(), "Converted document");
    (doc.save(), report)
}

fn print_report(output: &Output, report: &BulkReport) {
    output.info(&format!(
        "Equations: {} changed, {} already in direction",
        report.changed, report.unchanged
    ));
    if !report.is_clean() {
        output.warning(&format!(
            "\nWarning: {} equation(s) could not be rendered:",
            report.failures.len()
        ));
        for failure in &report.failures {
            output.info(&format!("  - [{}] {}", failure.id, failure.message));
        }
    }
}
