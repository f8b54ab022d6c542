use crate::error::{Result, ShortenerError};
use crate::resolver::{within_decode_fallback, Resolver};
use crate::shortener::{Shortened, Shortener};
use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::Arc;
use tinylink_core::hash::content_hash;
use tinylink_core::vanity::sanitize;
use tinylink_core::{NewUrlRecord, Repository, TokenCodec, UrlRecord};
use tracing::{debug, info};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a [`Resolver`] to handle:
/// - URL validation and vanity sanitizing
/// - Deduplication by content hash
/// - Token derivation and lookup hash maintenance
/// - Hit statistics on resolution
///
/// Note: "find by content hash, else insert" is not atomic. Two concurrent
/// creations of the same URL can both insert a record.
#[derive(Debug, Clone)]
pub struct ShortenerService<R> {
    resolver: Resolver<R>,
}

impl<R: Repository> ShortenerService<R> {
    pub fn new(repository: R, codec: TokenCodec) -> Self {
        Self {
            resolver: Resolver::new(Arc::new(repository), codec),
        }
    }

    pub fn resolver(&self) -> &Resolver<R> {
        &self.resolver
    }

    /// Encodes an id into its public token.
    pub fn encode(&self, id: u64) -> String {
        self.resolver.codec().encode(id)
    }

    /// Decodes a public token into an id.
    pub fn decode(&self, token: &str) -> Result<u64> {
        Ok(self.resolver.codec().decode(token)?)
    }

    fn repository(&self) -> &R {
        self.resolver.repository()
    }

    /// Validates that the URL starts with an http(s) scheme followed by a word character.
    fn validate_url(url: &str) -> Result<()> {
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| {
                ShortenerError::InvalidUrl(format!("URL scheme must be http or https: {}", url))
            })?;

        match rest.chars().next() {
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => Ok(()),
            _ => Err(ShortenerError::InvalidUrl(format!(
                "URL must have a host after the scheme: {}",
                url
            ))),
        }
    }

    /// Sanitizes an optional vanity alias, rejecting ones that end up empty.
    fn clean_vanity(vanity: Option<&str>) -> Result<Option<String>> {
        let Some(raw) = vanity else {
            return Ok(None);
        };

        let clean = sanitize(raw);
        if clean.is_empty() {
            return Err(ShortenerError::InvalidVanity(format!(
                "'{}' is empty after sanitizing",
                raw
            )));
        }
        Ok(Some(clean))
    }

    /// The token of `id`, if it resolves back to the record.
    ///
    /// A record with a vanity alias has its lookup hash taken over the alias,
    /// so its token only resolves through the decode fallback.
    fn primary_token(&self, id: u64, vanity: Option<&str>) -> Option<String> {
        let token = self.encode(id);
        (vanity.is_none() || within_decode_fallback(&token)).then_some(token)
    }

    fn shortened(&self, record: &UrlRecord) -> Shortened {
        Shortened {
            id: record.id,
            primary_token: self.primary_token(record.id, record.vanity.as_deref()),
            vanity_token: record.vanity.clone(),
        }
    }
}

#[async_trait]
impl<R: Repository> Shortener for ShortenerService<R> {
    async fn create(&self, url: &str, vanity: Option<&str>) -> Result<Shortened> {
        Self::validate_url(url)?;
        let vanity = Self::clean_vanity(vanity)?;
        let md5url = content_hash(url);

        if let Some(existing) = self.repository().find_by_md5(&md5url).await? {
            debug!(id = existing.id, url, "url already shortened, reusing record");
            return Ok(self.shortened(&existing));
        }

        let id = self
            .repository()
            .insert(NewUrlRecord {
                url: url.to_owned(),
                created: Timestamp::now(),
                md5url,
                vanity: vanity.clone(),
            })
            .await?;
        self.resolver.store_alias(id, vanity.as_deref()).await?;

        info!(id, url, vanity = ?vanity, "shortened url");

        Ok(Shortened {
            id,
            primary_token: self.primary_token(id, vanity.as_deref()),
            vanity_token: vanity,
        })
    }

    async fn resolve(&self, candidate: &str) -> Result<Option<UrlRecord>> {
        let Some(mut record) = self.resolver.resolve(candidate).await? else {
            debug!(candidate, "short code not found");
            return Ok(None);
        };

        let now = Timestamp::now();
        self.repository().update_stats(record.id, now).await?;
        record.hits += 1;
        record.accessed = Some(now);

        debug!(candidate, id = record.id, url = %record.url, "resolved short code");
        Ok(Some(record))
    }

    async fn edit(&self, id: u64, url: &str, vanity: Option<&str>) -> Result<Option<UrlRecord>> {
        Self::validate_url(url)?;
        let vanity = Self::clean_vanity(vanity)?;
        let md5url = content_hash(url);

        if !self
            .repository()
            .update_url(id, url, &md5url, vanity.as_deref())
            .await?
        {
            debug!(id, "edit target not found");
            return Ok(None);
        }
        self.resolver.store_alias(id, vanity.as_deref()).await?;

        info!(id, url, vanity = ?vanity, "edited url");
        Ok(self.repository().find_by_id(id).await?)
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>> {
        Ok(self.repository().list_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::DECODE_FALLBACK_LEN;
    use tinylink_core::{DecodeError, ReadRepository, TokenSettings};
    use tinylink_storage::InMemoryRepository;

    fn test_service() -> ShortenerService<InMemoryRepository> {
        let codec = TokenCodec::new(
            TokenSettings::builder()
                .salt("pepper")
                .padding(2)
                .build(),
        )
        .unwrap();
        ShortenerService::new(InMemoryRepository::new(), codec)
    }

    #[tokio::test]
    async fn create_returns_encoded_id() {
        let service = test_service();

        let shortened = service.create("https://example.com/a", None).await.unwrap();

        assert_eq!(shortened.id, 1);
        assert_eq!(shortened.primary_token, Some(service.encode(1)));
        assert_eq!(shortened.vanity_token, None);
        assert_eq!(service.decode(&service.encode(1)).unwrap(), 1);
    }

    #[tokio::test]
    async fn create_deduplicates_by_content_hash() {
        let service = test_service();

        let first = service.create("https://example.com/a", None).await.unwrap();
        let second = service.create("https://example.com/a", None).await.unwrap();

        assert_eq!(first, second);
        let stored = service
            .resolver()
            .repository()
            .find_by_md5(&content_hash("https://example.com/a"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dedup_hit_keeps_original_vanity() {
        let service = test_service();

        let first = service
            .create("https://example.com/a", Some("first"))
            .await
            .unwrap();
        let second = service
            .create("https://example.com/a", Some("second"))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.vanity_token.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn create_with_vanity_stores_sanitized_alias() {
        let service = test_service();

        let shortened = service
            .create("https://example.com/b", Some("My Alias!"))
            .await
            .unwrap();
        assert_eq!(shortened.vanity_token.as_deref(), Some("MyAlias"));

        let by_vanity = service.resolve("MyAlias").await.unwrap().unwrap();
        let by_token = service
            .resolve(&service.encode(shortened.id))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(by_vanity.id, shortened.id);
        assert_eq!(by_token.id, shortened.id);
        assert_eq!(by_vanity.url, "https://example.com/b");
        assert_eq!(by_vanity.vanity.as_deref(), Some("MyAlias"));
    }

    #[tokio::test]
    async fn long_token_is_withheld_when_vanity_owns_the_lookup_hash() {
        let codec = TokenCodec::new(
            TokenSettings::builder()
                .salt("pepper")
                .padding(18)
                .build(),
        )
        .unwrap();
        let service = ShortenerService::new(InMemoryRepository::new(), codec);
        assert!(service.encode(1).chars().count() >= DECODE_FALLBACK_LEN);

        let aliased = service
            .create("https://example.com/b", Some("My Alias!"))
            .await
            .unwrap();
        assert_eq!(aliased.primary_token, None);
        assert_eq!(aliased.vanity_token.as_deref(), Some("MyAlias"));
        assert!(service.resolve(&service.encode(aliased.id)).await.unwrap().is_none());
        assert_eq!(service.resolve("MyAlias").await.unwrap().unwrap().id, aliased.id);

        let again = service
            .create("https://example.com/b", None)
            .await
            .unwrap();
        assert_eq!(again, aliased);

        let plain = service.create("https://example.com/c", None).await.unwrap();
        let token = plain.primary_token.unwrap();
        assert_eq!(service.resolve(&token).await.unwrap().unwrap().id, plain.id);
    }

    #[tokio::test]
    async fn create_with_invalid_url_fails() {
        let service = test_service();

        for url in ["", "not-a-valid-url", "ftp://example.com", "https://", "http:///path"] {
            let err = service.create(url, None).await.unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidUrl(_)), "{url}");
        }
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_with_blank_vanity_fails() {
        let service = test_service();

        let err = service
            .create("https://example.com", Some(" .*? "))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidVanity(_)));
    }

    #[tokio::test]
    async fn resolve_records_hits() {
        let service = test_service();
        let shortened = service.create("https://example.com", None).await.unwrap();

        let token = shortened.primary_token.unwrap();
        let first = service.resolve(&token).await.unwrap().unwrap();
        let second = service.resolve(&token).await.unwrap().unwrap();

        assert_eq!(first.hits, 1);
        assert_eq!(second.hits, 2);
        assert!(second.accessed.is_some());

        let stored = service
            .resolver()
            .repository()
            .find_by_id(shortened.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.hits, 2);
        assert_eq!(stored.accessed, second.accessed);
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let service = test_service();

        assert!(service.resolve("nonexistent").await.unwrap().is_none());
        assert!(service.resolve(&service.encode(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn edit_recomputes_lookup_hash() {
        let service = test_service();
        let shortened = service
            .create("https://old.example", Some("old-alias"))
            .await
            .unwrap();

        let edited = service
            .edit(shortened.id, "https://new.example", Some("new alias"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(edited.url, "https://new.example");
        assert_eq!(edited.md5url, content_hash("https://new.example"));
        assert_eq!(edited.vanity.as_deref(), Some("newalias"));
        assert!(service.resolve("old-alias").await.unwrap().is_none());
        assert_eq!(
            service.resolve("newalias").await.unwrap().unwrap().id,
            shortened.id
        );
    }

    #[tokio::test]
    async fn edit_without_vanity_hashes_token() {
        let service = test_service();
        let shortened = service
            .create("https://old.example", Some("old-alias"))
            .await
            .unwrap();

        let edited = service
            .edit(shortened.id, "https://new.example", None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(edited.vanity, None);
        assert_eq!(edited.code.as_deref(), shortened.primary_token.as_deref());
    }

    #[tokio::test]
    async fn edit_missing_record() {
        let service = test_service();

        let edited = service.edit(99, "https://new.example", None).await.unwrap();
        assert!(edited.is_none());
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_id() {
        let service = test_service();
        for i in 0..5 {
            service
                .create(&format!("https://example{i}.com"), None)
                .await
                .unwrap();
        }

        let ids: Vec<u64> = service.list_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn decode_reports_invalid_tokens() {
        let service = test_service();

        let err = service.decode("not!a!token").unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::InvalidToken(DecodeError::UnknownSymbol { symbol: '!', .. })
        ));
    }
}
