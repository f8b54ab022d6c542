use thiserror::Error;

/// Errors raised while validating token settings at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("alphabet must contain at least 2 symbols, got {0}")]
    AlphabetTooShort(usize),
    #[error("alphabet contains duplicate symbol '{symbol}' at position {position}")]
    DuplicateSymbol { symbol: char, position: usize },
    #[error("padding of {padding} digits exceeds the maximum of {max}")]
    PaddingTooLarge { padding: u32, max: u32 },
}

/// Errors raised while turning a token back into an id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("token is empty")]
    Empty,
    #[error("symbol '{symbol}' at position {position} is not part of the alphabet")]
    UnknownSymbol { symbol: char, position: usize },
    #[error("token value overflows the id range")]
    Overflow,
    #[error("token does not carry a salted id: {0}")]
    Malformed(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}
