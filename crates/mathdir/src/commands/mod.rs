//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod inspect;
pub(crate) mod render;
pub(crate) mod templates;

use std::path::Path;

use mathdir_config::{CliSettings, Config};
use mathdir_glyph::TexSource;
use mathdir_unit::Materializer;

use crate::error::CliError;

pub(crate) use convert::ConvertArgs;
pub(crate) use inspect::InspectArgs;
pub(crate) use render::RenderArgs;
pub(crate) use templates::TemplatesArgs;

/// Load configuration and build a materializer from it.
fn load_materializer(config_path: Option<&Path>, settings: &CliSettings) -> Result<Materializer, CliError> {
    let config = Config::load(config_path, Some(settings))?;
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "Loaded configuration");
    }
    Ok(Materializer::new(TexSource::new(), config.materializer_config()))
}
