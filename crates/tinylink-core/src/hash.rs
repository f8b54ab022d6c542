use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Length of a [`HashKey`] in hex characters.
pub const HASH_KEY_LEN: usize = 64;

/// A fixed-length, lowercase hex content hash.
///
/// Used both as the dedup key of a URL and as the primary lookup key
/// of a short code.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashKey(String);

impl HashKey {
    /// Wraps an already computed hex digest, e.g. one read back from storage.
    ///
    /// Returns `None` unless the value is exactly [`HASH_KEY_LEN`] lowercase hex characters.
    pub fn from_hex(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let valid = value.len() == HASH_KEY_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then_some(Self(value))
    }

    /// Returns the hex digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HashKey").field(&self.0).finish()
    }
}

impl Display for HashKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashes arbitrary content into a [`HashKey`].
pub fn content_hash(content: impl AsRef<[u8]>) -> HashKey {
    HashKey(hex::encode(Sha256::digest(content.as_ref())))
}

/// Computes the lookup hash stored in a record's `short` column.
///
/// A non-empty salt is appended after a `;` separator.
pub fn compute_short(value: &str, salt: &str) -> HashKey {
    if salt.is_empty() {
        content_hash(value)
    } else {
        content_hash(format!("{value};{salt}"))
    }
}
