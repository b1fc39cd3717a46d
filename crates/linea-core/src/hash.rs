//! Content hashing for deterministic playback verification.
//!
//! Resolved frames are fed into a SHA-256 digest field by field, so two runs
//! of the same timeline can be compared bit-for-bit without keeping frames.

use sha2::{Digest, Sha256};

use crate::color::Color;
use crate::math::Point2D;

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Incremental hasher with helpers for the engine's value types.
#[derive(Clone, Default)]
pub struct ContentHasher {
    inner: Sha256,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    /// Hashes the exact bit pattern, so `0.0` and `-0.0` differ.
    pub fn f64(&mut self, v: f64) -> &mut Self {
        self.bytes(&v.to_bits().to_le_bytes())
    }

    pub fn str(&mut self, s: &str) -> &mut Self {
        self.u64(s.len() as u64).bytes(s.as_bytes())
    }

    pub fn point(&mut self, p: &Point2D) -> &mut Self {
        self.f64(p.x).f64(p.y)
    }

    pub fn color(&mut self, c: &Color) -> &mut Self {
        for ch in [c.r, c.g, c.b, c.a] {
            self.bytes(&ch.to_bits().to_le_bytes());
        }
        self
    }

    pub fn finish(self) -> ContentHash {
        let result = self.inner.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        ContentHash::from_bytes(bytes)
    }
}
