//! CLI error types.

use mathdir_config::ConfigError;
use mathdir_unit::TemplateError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
