//! Host byte order selection for the previous-hash encoding.
//!
//! The proxy feeds a finished point hash back into the next one through a
//! `union { uint32_t value; u_char byte[4]; }`, so the bytes it hashes are
//! whatever layout the host uses for a `u32`. We pick that layout once per
//! process and name it, instead of peeking at memory.

use std::sync::OnceLock;

/// Byte layout of a 32-bit value in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

static HOST: OnceLock<ByteOrder> = OnceLock::new();

impl ByteOrder {
    /// Byte order of the running host, detected on first use and cached.
    pub fn host() -> Self {
        *HOST.get_or_init(detect)
    }

    /// Lays out `value` in this byte order.
    pub fn encode(self, value: u32) -> [u8; 4] {
        let le = [
            (value & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            ((value >> 16) & 0xff) as u8,
            ((value >> 24) & 0xff) as u8,
        ];
        match self {
            ByteOrder::Little => le,
            ByteOrder::Big => [le[3], le[2], le[1], le[0]],
        }
    }
}

/// Compares the native layout of a probe constant with its most significant
/// byte taken by shifting.
fn detect() -> ByteOrder {
    const PROBE: u32 = 0x0102_0304;
    let most_significant = (PROBE >> 24) as u8;
    if PROBE.to_ne_bytes()[0] == most_significant {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    }
}
