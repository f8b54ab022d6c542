use crate::codec::{decode_token, encode_int, Alphabet, DEFAULT_ALPHABET};
use crate::error::{ConfigError, DecodeError};
use crate::seed::{seed_value, Padding};
use typed_builder::TypedBuilder;

/// Configures how ids are turned into public tokens.
#[derive(Debug, Clone, TypedBuilder)]
pub struct TokenSettings {
    /// Symbols used as base-N digits; needs at least 2 distinct symbols.
    #[builder(default = DEFAULT_ALPHABET.to_string(), setter(into))]
    pub alphabet: String,
    /// Server-held secret mixed into seeds and lookup hashes.
    #[builder(default, setter(into))]
    pub salt: String,
    /// Number of salted seed digits prefixed to an id before encoding.
    ///
    /// Ignored while `salt` is empty.
    #[builder(default = 1)]
    pub padding: u32,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Encodes ids into tokens and back, using validated [`TokenSettings`].
///
/// When salting is configured (non-empty salt and non-zero padding) the
/// encoded integer is the decimal concatenation `seed(id) ++ id`. The seed
/// always has exactly `padding` digits with a non-zero lead, so decoding
/// only has to drop that many leading decimal digits.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    alphabet: Alphabet,
    salt: String,
    padding: Padding,
}

impl TokenCodec {
    /// Validates the settings and builds a codec.
    pub fn new(settings: TokenSettings) -> Result<Self, ConfigError> {
        let padding = Padding::new(settings.padding)?;

        Ok(Self {
            alphabet: Alphabet::new(&settings.alphabet)?,
            salt: settings.salt,
            padding,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    pub fn padding(&self) -> u32 {
        self.padding.get()
    }

    /// Returns `true` when ids are obscured with a salted seed.
    pub fn is_salted(&self) -> bool {
        self.padding != Padding::NONE && !self.salt.is_empty()
    }

    /// Encodes an id into its public token.
    pub fn encode(&self, id: u64) -> String {
        if !self.is_salted() {
            return encode_int(u128::from(id), &self.alphabet);
        }

        // Decimal concatenation `seed ++ id`. The seed is below 10^18 and the
        // id below 10^20, so the result stays under 10^38 < u128::MAX.
        let id_digits = id.checked_ilog10().map_or(1, |log| log + 1);
        let augmented =
            seed_value(id, &self.salt, self.padding) * 10_u128.pow(id_digits) + u128::from(id);
        encode_int(augmented, &self.alphabet)
    }

    /// Decodes a public token back into an id.
    pub fn decode(&self, token: &str) -> Result<u64, DecodeError> {
        let n = decode_token(token, &self.alphabet)?;

        if !self.is_salted() {
            return u64::try_from(n).map_err(|_| DecodeError::Overflow);
        }

        let digits = n.to_string();
        let id = digits
            .get(self.padding.get() as usize..)
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| {
                DecodeError::Malformed(format!(
                    "{} decimal digits, expected more than {}",
                    digits.len(),
                    self.padding.get()
                ))
            })?;

        id.parse()
            .map_err(|_| DecodeError::Malformed(format!("id part '{id}' is not a valid id")))
    }
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            salt: String::new(),
            padding: Padding::ONE,
        }
    }
}
