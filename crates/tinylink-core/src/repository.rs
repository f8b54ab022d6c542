use crate::error::Result;
use crate::hash::HashKey;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored URL record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Store assigned id. Never reused.
    pub id: u64,
    /// The original URL that was shortened.
    pub url: String,
    /// When the record was first stored.
    pub created: Timestamp,
    /// Content hash of `url`, used to deduplicate creation requests.
    pub md5url: HashKey,
    /// Lookup hash of `code`; `None` until the alias has been stored.
    pub short: Option<HashKey>,
    /// The encoded token or sanitized vanity that `short` was derived from.
    pub code: Option<String>,
    /// Sanitized vanity alias, if one was requested.
    pub vanity: Option<String>,
    /// Number of successful resolutions.
    pub hits: u64,
    /// Time of the last successful resolution.
    pub accessed: Option<Timestamp>,
}

/// The columns supplied when a record is first inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub url: String,
    pub created: Timestamp,
    pub md5url: HashKey,
    pub vanity: Option<String>,
}

/// A read-only view of a record store.
///
/// Lookups by `md5url` and `short` are not backed by a uniqueness
/// guarantee. When several records share a key, the one with the lowest id
/// is returned.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Finds the record whose URL hashes to `md5url`.
    async fn find_by_md5(&self, md5url: &HashKey) -> Result<Option<UrlRecord>>;

    /// Finds the record whose lookup hash equals `short`.
    async fn find_by_short(&self, short: &HashKey) -> Result<Option<UrlRecord>>;

    /// Finds a record by id.
    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>>;

    /// Returns every record, ordered by id ascending.
    async fn list_all(&self) -> Result<Vec<UrlRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new record and returns the id assigned to it.
    async fn insert(&self, record: NewUrlRecord) -> Result<u64>;

    /// Stores the lookup hash of a record together with the value it was derived from.
    async fn update_short(&self, id: u64, short: &HashKey, code: &str) -> Result<()>;

    /// Increments the hit counter and sets the last access time.
    async fn update_stats(&self, id: u64, accessed_at: Timestamp) -> Result<()>;

    /// Rewrites the URL, its content hash and the vanity of a record.
    /// Returns `false` if no record has this id.
    async fn update_url(
        &self,
        id: u64,
        url: &str,
        md5url: &HashKey,
        vanity: Option<&str>,
    ) -> Result<bool>;
}
