//! Seed derivation from block hashes.

use crate::error::{ForestError, Result};
use serde::Deserialize;

/// Number of leading hash characters that feed the seed.
pub const SEED_CHARS: usize = 16;

/// Minimal view of a block record. Only `hash` drives generation.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub hash: Option<String>,
    #[serde(default)]
    pub number: Option<u64>,
}

impl Block {
    /// Parse a block from its JSON representation.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn seed(&self) -> Result<Seed> {
        match self.hash.as_deref() {
            Some(hash) => Seed::from_hash(hash),
            None => Err(ForestError::InvalidSeed(String::new())),
        }
    }
}

/// Integer seed read from the first [`SEED_CHARS`] characters of a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed(u64);

impl Seed {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parse the hash prefix as base-16.
    ///
    /// Block hashes usually start with `0x`; the prefix is skipped within the
    /// 16-character window, so such hashes contribute 14 digits.
    pub fn from_hash(hash: &str) -> Result<Self> {
        let window: String = hash.trim().chars().take(SEED_CHARS).collect();
        let digits = window
            .strip_prefix("0x")
            .or_else(|| window.strip_prefix("0X"))
            .unwrap_or(&window);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ForestError::InvalidSeed(hash.to_string()));
        }

        u64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| ForestError::InvalidSeed(hash.to_string()))
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// 32-bit key handed to the random stream: the high and low halves of
    /// the seed XORed together.
    ///
    /// Seeds below 2^32 are their own key. Above that, every hex digit of the
    /// window still lands in the key, so no digit is dead.
    pub fn stream_key(self) -> u32 {
        ((self.0 >> 32) as u32) ^ (self.0 as u32)
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
