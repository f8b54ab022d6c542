use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use tinylink_core::UrlRecord;

/// The tokens handed back for a shortened URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortened {
    /// Id of the stored (or reused) record.
    pub id: u64,
    /// Token derived from the id.
    ///
    /// `None` when the record has a vanity alias and the token is too long
    /// for the decode fallback, since such a token would not resolve.
    pub primary_token: Option<String>,
    /// Sanitized vanity alias, if the record has one.
    pub vanity_token: Option<String>,
}

impl Shortened {
    /// Builds the public short URLs, primary token first.
    pub fn to_urls(&self, base_url: &str) -> Vec<String> {
        let base = base_url.trim_end_matches('/');
        self.primary_token
            .iter()
            .chain(self.vanity_token.as_ref())
            .map(|token| format!("{base}/{token}"))
            .collect()
    }
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL, reusing the existing record if the URL was seen before.
    async fn create(&self, url: &str, vanity: Option<&str>) -> Result<Shortened>;

    /// Resolves a token or vanity alias and records the hit.
    /// Returns `None` if nothing matches.
    async fn resolve(&self, candidate: &str) -> Result<Option<UrlRecord>>;

    /// Points an existing record at a new URL and recomputes its lookup hash.
    /// Returns `None` if the id does not exist.
    async fn edit(&self, id: u64, url: &str, vanity: Option<&str>) -> Result<Option<UrlRecord>>;

    /// Returns every record ordered by id.
    async fn list_all(&self) -> Result<Vec<UrlRecord>>;
}
