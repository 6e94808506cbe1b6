use thiserror::Error;

use crate::config::ConfigError;
use crate::publisher::PublishError;
use crate::roster::FetchError;

/// Top-level error for startup and the service lifecycle
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}
