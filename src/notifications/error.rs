// src/notifications/error.rs

use thiserror::Error;

use super::transport::{ConfigError, TransportError};
use crate::common::{ApiError, StoreError};

/// Why no mailer exists for this process
#[derive(Debug, Clone, Error)]
pub enum MailerUnavailable {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Email transport could not be created: {0}")]
    Build(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Unavailable(#[from] MailerUnavailable),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::Unavailable(MailerUnavailable::Config(config)) => {
                ApiError::Configuration(config.missing)
            }
            NotifyError::Unavailable(other) => ApiError::InternalServer(other.to_string()),
            NotifyError::Transport(e) => ApiError::DeliveryFailed(e.to_string()),
            NotifyError::Store(e) => ApiError::from(e),
        }
    }
}
