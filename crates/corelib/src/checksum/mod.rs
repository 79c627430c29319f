//! The proxy's CRC-32 variant.
//!
//! Plain table-driven CRC-32 (IEEE), with two quirks the upstream hash
//! module relies on:
//!
//! - an update may ask for a *padded length* longer than its input, in which
//!   case the missing tail is folded in as zero bytes;
//! - a finished hash is fed back into the next ring point as its raw
//!   in-memory bytes, see [`final_to_bytes`].
//!
//! For ordinary unpadded input the result is the standard CRC-32 checksum.

pub mod byte_order;
mod table;

pub use byte_order::ByteOrder;

use crate::error::{Error, Result};
use table::CRC32_TABLE;

/// Accumulator seed, also the finalization mask.
pub const INIT: u32 = 0xffff_ffff;

/// Running CRC-32 accumulator.
///
/// `Copy` on purpose: the ring builder forks one base accumulator per point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Creates an accumulator at the CRC-32 seed.
    pub fn new() -> Self {
        Self { state: INIT }
    }

    /// Folds in `bytes`.
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        self.update_padded(bytes, bytes.len())
    }

    /// Folds in `bytes`, then zero bytes until `padded_len` bytes have been
    /// consumed. A `padded_len` shorter than the input pads nothing.
    #[inline]
    pub fn update_padded(&mut self, bytes: &[u8], padded_len: usize) -> &mut Self {
        let mut c = self.state;
        for &b in bytes {
            c = step(c, b);
        }
        for _ in bytes.len()..padded_len {
            c = step(c, 0);
        }
        self.state = c;
        self
    }

    /// Finalized checksum. The accumulator itself is left untouched.
    #[inline]
    pub fn finalize(&self) -> u32 {
        finalize(self.state)
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn step(c: u32, b: u8) -> u32 {
    CRC32_TABLE[((c ^ u32::from(b)) & 0xff) as usize] ^ (c >> 8)
}

/// XORs an accumulator with the all-ones mask.
#[inline]
pub fn finalize(acc: u32) -> u32 {
    acc ^ INIT
}

/// Checksum of `bytes` padded with zeros to `padded_len`.
pub fn hash(bytes: &[u8], padded_len: usize) -> u32 {
    Crc32::new().update_padded(bytes, padded_len).finalize()
}

/// Same as [`hash`] for callers holding a signed length.
pub fn try_hash(bytes: &[u8], padded_len: i64) -> Result<u32> {
    let padded_len = usize::try_from(padded_len).map_err(|_| Error::NegativeLength(padded_len))?;
    Ok(hash(bytes, padded_len))
}

/// Checksum of a hash key: the key's own bytes, no padding.
#[inline]
pub fn key_hash(key: &[u8]) -> u32 {
    hash(key, key.len())
}

/// Bytes of a finalized hash as the proxy feeds them into the next point.
///
/// The proxy reads them straight out of a union, so the layout is the
/// host's: least significant byte first on little-endian hosts, most
/// significant first otherwise. Host order is resolved once through
/// [`ByteOrder::host`].
pub fn final_to_bytes(value: u32) -> [u8; 4] {
    ByteOrder::host().encode(value)
}
