use crate::error::ConfigError;
use sha2::{Digest, Sha256};

/// Largest supported padding. Seed digits plus a `u64` id must fit in a `u128`.
pub const MAX_PADDING: u32 = 18;

/// A number of seed digits, known to be at most [`MAX_PADDING`].
///
/// Zero means "no seed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Padding(u32);

impl Padding {
    pub const NONE: Self = Self(0);
    pub const ONE: Self = Self(1);

    pub fn new(digits: u32) -> Result<Self, ConfigError> {
        if digits > MAX_PADDING {
            return Err(ConfigError::PaddingTooLarge {
                padding: digits,
                max: MAX_PADDING,
            });
        }
        Ok(Self(digits))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Numeric value of [`seed`]: `padding` decimal digits with a non-zero lead,
/// or `0` when `padding` is zero.
pub fn seed_value(n: u64, salt: &str, padding: Padding) -> u128 {
    let width = padding.get();
    if width == 0 {
        return 0;
    }

    let digest = Sha256::digest(format!("{n}{salt}"));
    // The leading `width` hex digits of the digest, read as one number.
    let prefix = (0..width as usize).fold(0_u128, |acc, i| {
        let byte = digest[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        (acc << 4) | u128::from(nibble)
    });

    let reduced = match prefix % 10_u128.pow(width) {
        0 => 1,
        reduced => reduced,
    };

    // Fill with zeros on the right up to `width` digits.
    let digits = reduced.ilog10() + 1;
    reduced * 10_u128.pow(width - digits)
}

/// Derives a deterministic string of `padding` decimal digits from `(n, salt)`.
///
/// The leading `padding` hex characters of the content hash of `n ++ salt`
/// are reduced modulo `10^padding`, with zero coerced to one. The result is
/// filled with `'0'` on the right, so the first digit is never zero and the
/// seed keeps its width when it is prefixed to another number.
pub fn seed(n: u64, salt: &str, padding: Padding) -> String {
    if padding == Padding::NONE {
        return String::new();
    }
    seed_value(n, salt, padding).to_string()
}
