//! URL shortener service implementation.
//!
//! This crate provides the [`Resolver`] (lookup hashes and the decode
//! fallback), the [`Shortener`] trait and its [`ShortenerService`]
//! implementation. Token and storage types are re-exported from
//! `tinylink_core`.

pub mod error;
pub mod resolver;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use resolver::Resolver;
pub use service::ShortenerService;
pub use shortener::{Shortened, Shortener};
pub use tinylink_core::{TokenCodec, TokenSettings, UrlRecord};
