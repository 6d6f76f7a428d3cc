use thiserror::Error;

use identity::config::ConfigError;

/// Process-level failures: anything that stops the service from starting or serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}
