//! `mathdir inspect` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mathdir_config::CliSettings;
use mathdir_document::{HostDocument, MarkupDocument};
use mathdir_unit::VisualArtifact;

use super::load_materializer;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Saved HTML document.
    file: PathBuf,
}

impl InspectArgs {
    /// Execute the inspect command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let materializer = load_materializer(config_path, &CliSettings::default())?;

        let html = std::fs::read_to_string(&self.file)?;
        let doc = MarkupDocument::load(&html, &materializer);
        let units = doc.list_atomic_units();

        output.heading(&format!("{}: {} equation(s)", self.file.display(), units.len()));
        for (index, artifact) in units.iter().enumerate() {
            output.result(&describe(index, artifact))?;
        }
        Ok(())
    }
}

fn describe(index: usize, artifact: &VisualArtifact) -> String {
    let status = if artifact.is_fallback() { " (fallback)" } else { "" };
    format!(
        "{index:>3}  {}  {}  {}{status}",
        artifact.id,
        artifact.direction,
        artifact.source
    )
}
