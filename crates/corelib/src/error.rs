//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An upstream entry is not of the `host:port` form.
    #[error("malformed upstream address {address:?}: {reason}")]
    MalformedAddress {
        address: String,
        reason: &'static str,
    },
    /// An upstream weight would generate more points than the ring allows.
    #[error("weight {weight} of upstream {address:?} exceeds the maximum of {max}")]
    WeightTooLarge {
        address: String,
        weight: u32,
        max: u32,
    },
    /// A lookup was attempted on a ring without points.
    #[error("hash ring is empty")]
    EmptyRing,
    /// Hit rates were requested but no key was processed.
    #[error("no hash keys processed, hit rate is undefined")]
    NoKeysProcessed,
    /// Output sort key is neither `server` nor `hitCount`.
    #[error("{0:?} is not a valid sort key (expected \"server\" or \"hitCount\")")]
    InvalidSortKey(String),
    /// A padded length below zero was passed to the checksum engine.
    #[error("negative checksum length: {0}")]
    NegativeLength(i64),
}

impl Error {
    pub(crate) fn malformed(address: impl Into<String>, reason: &'static str) -> Self {
        Error::MalformedAddress {
            address: address.into(),
            reason,
        }
    }
}
