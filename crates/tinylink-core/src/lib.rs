//! Core types for the tinylink URL shortener.
//!
//! This crate holds the token derivation pieces (base-N codec, salted seed,
//! token codec, content hashing, vanity sanitizing) and the record store
//! contract shared by the storage backends and the shortener service.

pub mod codec;
pub mod error;
pub mod hash;
pub mod repository;
pub mod seed;
pub mod token;
pub mod vanity;

pub use codec::Alphabet;
pub use error::{ConfigError, DecodeError, StorageError};
pub use hash::HashKey;
pub use repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};
pub use seed::Padding;
pub use token::{TokenCodec, TokenSettings};
