//! `mathdir templates` command implementation.

use std::path::Path;

use clap::Args;
use mathdir_config::{CliSettings, Config};
use mathdir_unit::Template;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the templates command.
#[derive(Args)]
pub(crate) struct TemplatesArgs {
    /// Expand templates with this selection.
    #[arg(short, long)]
    selection: Option<String>,

    /// Show only the template with this key.
    #[arg(short, long)]
    key: Option<String>,
}

impl TemplatesArgs {
    /// Execute the templates command.
    ///
    /// # Errors
    ///
    /// Returns an error if the templates file cannot be loaded.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(config_path, Some(&CliSettings::default()))?;
        let set = config.template_set()?;

        let templates: Vec<&Template> = match &self.key {
            Some(key) => set.find(key).into_iter().collect(),
            None => set.iter().collect(),
        };
        if templates.is_empty() {
            output.warning("No matching templates.");
            return Ok(());
        }

        for template in templates {
            output.result(&describe(template, self.selection.as_deref()))?;
        }
        Ok(())
    }
}

fn describe(template: &Template, selection: Option<&str>) -> String {
    let latex = match selection {
        Some(selection) => template.expand(selection),
        None => template.latex.clone(),
    };
    let label = match &template.label_ar {
        Some(label_ar) => format!("{} / {label_ar}", template.label),
        None => template.label.clone(),
    };
    format!("{:<16} {:<4} {latex:<28} {label}", template.key, template.icon)
}
