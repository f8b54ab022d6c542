use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use tinylink_core::error::Result;
use tinylink_core::hash::HashKey;
use tinylink_core::repository::{NewUrlRecord, ReadRepository, Repository, UrlRecord};

/// In-memory implementation of the Repository trait using DashMap.
///
/// Ids come from an atomic counter starting at 1, like an auto-increment
/// column. Secondary lookups scan all records; nothing enforces uniqueness
/// of `md5url` or `short`.
#[derive(Debug)]
pub struct InMemoryRepository {
    records: DashMap<u64, UrlRecord>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn find_first(&self, matches: impl Fn(&UrlRecord) -> bool) -> Option<UrlRecord> {
        self.records
            .iter()
            .filter(|entry| matches(entry.value()))
            .min_by_key(|entry| *entry.key())
            .map(|entry| entry.value().clone())
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_md5(&self, md5url: &HashKey) -> Result<Option<UrlRecord>> {
        Ok(self.find_first(|record| &record.md5url == md5url))
    }

    async fn find_by_short(&self, short: &HashKey) -> Result<Option<UrlRecord>> {
        Ok(self.find_first(|record| record.short.as_ref() == Some(short)))
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>> {
        let mut records: Vec<UrlRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, record: NewUrlRecord) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.insert(
            id,
            UrlRecord {
                id,
                url: record.url,
                created: record.created,
                md5url: record.md5url,
                short: None,
                code: None,
                vanity: record.vanity,
                hits: 0,
                accessed: None,
            },
        );
        Ok(id)
    }

    async fn update_short(&self, id: u64, short: &HashKey, code: &str) -> Result<()> {
        if let Some(mut entry) = self.records.get_mut(&id) {
            entry.short = Some(short.clone());
            entry.code = Some(code.to_owned());
        }
        Ok(())
    }

    async fn update_stats(&self, id: u64, accessed_at: Timestamp) -> Result<()> {
        if let Some(mut entry) = self.records.get_mut(&id) {
            entry.hits += 1;
            entry.accessed = Some(accessed_at);
        }
        Ok(())
    }

    async fn update_url(
        &self,
        id: u64,
        url: &str,
        md5url: &HashKey,
        vanity: Option<&str>,
    ) -> Result<bool> {
        let Some(mut entry) = self.records.get_mut(&id) else {
            return Ok(false);
        };

        entry.url = url.to_owned();
        entry.md5url = md5url.clone();
        entry.vanity = vanity.map(str::to_owned);
        Ok(true)
    }
}
