use thiserror::Error;
use tinylink_core::{DecodeError, StorageError};

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid vanity alias: {0}")]
    InvalidVanity(String),
    #[error("invalid token: {0}")]
    InvalidToken(#[from] DecodeError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ShortenerError>;
