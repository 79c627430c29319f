//! Offline model of the proxy's consistent-hash upstream balancer.
//!
//! This crate reproduces the ring the proxy builds for `hash ... consistent`
//! upstream blocks and predicts where sample keys would be routed:
//! - CRC-32 variant with zero padding and previous-hash chaining
//! - Ring point generation per weighted upstream
//! - Sorted, deduplicated ring with wrap-around lookup
//! - Per-upstream hit counts and rates

pub mod checksum;
pub mod error;
pub mod ring;
pub mod stats;
pub mod upstream;
pub mod verbose;

pub use checksum::ByteOrder;
pub use error::{Error, Result};
pub use ring::{HashPoint, HashRing, RingBuilder, FACTOR, MAX_WEIGHT};
pub use stats::{parse_hash_keys, Aggregator, SortKey, UpstreamStatistic};
pub use upstream::{parse_upstreams, split_host_port, Upstream};
pub use verbose::{Silent, VerboseSink};
