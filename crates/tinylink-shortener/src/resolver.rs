use std::sync::Arc;

use tinylink_core::error::Result;
use tinylink_core::hash::{compute_short, HashKey};
use tinylink_core::vanity::sanitize;
use tinylink_core::{Repository, TokenCodec, UrlRecord};
use tracing::{debug, trace};

/// Candidates shorter than this many characters may be decoded as ids.
pub const DECODE_FALLBACK_LEN: usize = 8;

/// Returns `true` if `candidate` is short enough to be tried as an encoded id.
pub fn within_decode_fallback(candidate: &str) -> bool {
    candidate.chars().count() < DECODE_FALLBACK_LEN
}

/// Maps tokens and vanity aliases to records.
///
/// Lookup is two-tier: the salted hash of the candidate is matched against
/// the `short` column first; short candidates that miss are then decoded as
/// tokens and looked up by id. Neither step is retried.
#[derive(Debug)]
pub struct Resolver<R> {
    repository: Arc<R>,
    codec: TokenCodec,
}

impl<R> Clone for Resolver<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            codec: self.codec.clone(),
        }
    }
}

impl<R: Repository> Resolver<R> {
    pub fn new(repository: Arc<R>, codec: TokenCodec) -> Self {
        Self { repository, codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Computes the lookup hash of a token or sanitized vanity under the configured salt.
    pub fn compute_short(&self, value: &str) -> HashKey {
        compute_short(value, self.codec.salt())
    }

    /// Resolves a candidate token or alias.
    ///
    /// Returns `Ok(None)` when neither the hash lookup nor the id fallback
    /// finds a record. Candidates that do not decode are simply not found.
    pub async fn resolve(&self, candidate: &str) -> Result<Option<UrlRecord>> {
        let short = self.compute_short(candidate);
        if let Some(record) = self.repository.find_by_short(&short).await? {
            trace!(candidate, id = record.id, "resolved by lookup hash");
            return Ok(Some(record));
        }

        if !within_decode_fallback(candidate) {
            trace!(candidate, "no hash match, too long to decode");
            return Ok(None);
        }

        let id = match self.codec.decode(candidate) {
            Ok(id) => id,
            Err(e) => {
                debug!(candidate, error = %e, "candidate is not a decodable token");
                return Ok(None);
            }
        };

        let record = self.repository.find_by_id(id).await?;
        match &record {
            Some(_) => debug!(candidate, id, "resolved by decoded id"),
            None => trace!(candidate, id, "decoded id not found"),
        }
        Ok(record)
    }

    /// Derives and persists the lookup hash for a record.
    ///
    /// The hash is taken over the encoded id, or over the sanitized vanity
    /// when one is given. Returns the value that was hashed.
    pub async fn store_alias(&self, id: u64, vanity: Option<&str>) -> Result<String> {
        let value = match vanity {
            Some(vanity) => sanitize(vanity),
            None => self.codec.encode(id),
        };
        let short = self.compute_short(&value);

        self.repository.update_short(id, &short, &value).await?;
        debug!(id, code = %value, "stored lookup hash");

        Ok(value)
    }
}
