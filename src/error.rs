//! Top-level error for the matchcue binary

use thiserror::Error;

use matchcue_core::{ConfigError, TimelineError};

use crate::client::ClientError;
use crate::server::ServerError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build the timeline")]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl AppError {
    /// Message plus every underlying cause, joined with ": "
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
