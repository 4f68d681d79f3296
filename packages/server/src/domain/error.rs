//! Domain error types.

use thiserror::Error;

/// Errors raised when constructing value objects from untrusted input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("player id must not be empty")]
    PlayerIdEmpty,

    #[error("collectible value must be positive")]
    NonPositiveCollectibleValue,

    #[error("spawn area must have a positive width and height")]
    EmptySpawnArea,
}

/// Errors raised while pushing events to connected clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}
