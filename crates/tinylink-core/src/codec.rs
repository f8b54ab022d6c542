use crate::error::{ConfigError, DecodeError};
use std::collections::HashMap;
use std::fmt::Display;

/// The default symbol set: lowercase, uppercase, then digits.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// An ordered set of distinct symbols used as the digits of a base-N number.
///
/// The base is the number of symbols. Symbols are compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, u32>,
}

impl Alphabet {
    /// Creates an alphabet from the given symbols.
    ///
    /// Fails if fewer than 2 symbols are given or if a symbol repeats.
    pub fn new(symbols: &str) -> Result<Self, ConfigError> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() < 2 {
            return Err(ConfigError::AlphabetTooShort(symbols.len()));
        }

        let mut index = HashMap::with_capacity(symbols.len());
        for (position, &symbol) in symbols.iter().enumerate() {
            if index.insert(symbol, position as u32).is_some() {
                return Err(ConfigError::DuplicateSymbol { symbol, position });
            }
        }

        Ok(Self { symbols, index })
    }

    /// Returns the base of the alphabet.
    pub fn base(&self) -> u32 {
        self.symbols.len() as u32
    }

    /// Returns the digit value of `symbol`, if it belongs to the alphabet.
    pub fn digit(&self, symbol: char) -> Option<u32> {
        self.index.get(&symbol).copied()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let symbols: Vec<char> = DEFAULT_ALPHABET.chars().collect();
        let index = symbols
            .iter()
            .enumerate()
            .map(|(position, &symbol)| (symbol, position as u32))
            .collect();
        Self { symbols, index }
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Encodes `n` as a base-N string over `alphabet`, most significant digit first.
///
/// `0` encodes to the first symbol of the alphabet.
pub fn encode_int(mut n: u128, alphabet: &Alphabet) -> String {
    let base = u128::from(alphabet.base());
    let mut digits = Vec::new();

    loop {
        digits.push(alphabet.symbols[(n % base) as usize]);
        n /= base;
        if n == 0 {
            break;
        }
    }

    digits.iter().rev().collect()
}

/// Decodes a base-N string over `alphabet` back into an integer.
///
/// Symbols outside the alphabet are rejected instead of being read as zero.
pub fn decode_token(token: &str, alphabet: &Alphabet) -> Result<u128, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::Empty);
    }

    let base = u128::from(alphabet.base());
    token
        .chars()
        .enumerate()
        .try_fold(0_u128, |n, (position, symbol)| {
            let digit = alphabet
                .digit(symbol)
                .ok_or(DecodeError::UnknownSymbol { symbol, position })?;
            n.checked_mul(base)
                .and_then(|n| n.checked_add(u128::from(digit)))
                .ok_or(DecodeError::Overflow)
        })
}
