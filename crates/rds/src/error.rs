//! CLI error types.

use rds_config::ConfigError;
use rds_directives::DirectiveError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Directive(#[from] DirectiveError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),
}
