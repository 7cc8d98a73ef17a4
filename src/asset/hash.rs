//! Content hashing for cache-busting file names.
//!
//! The digest is blake3 over the raw bytes. Emitted names carry a short hex
//! prefix of it, so an unchanged asset keeps its name across rebuilds and a
//! changed one gets a new name.

use std::fmt;

/// Length of the full hex digest.
pub const HEX_LEN: usize = 64;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice.
    pub fn of(contents: &[u8]) -> Self {
        Self(*blake3::hash(contents).as_bytes())
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex digest (64 chars).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex chars of the digest, clamped to the digest length.
    pub fn short(self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len.min(HEX_LEN));
        hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}
