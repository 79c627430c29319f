//! Ring construction from weighted upstreams.
//!
//! # Point generation
//!
//! Each upstream contributes `FACTOR * weight` points. The seed is the
//! unfinalized CRC-32 of `host`, a NUL byte and `port`. Point `i` is that
//! seed extended with the bytes of point `i - 1` (see
//! [`checksum::final_to_bytes`]), always padded to four bytes, then
//! finalized. Point 0 has no predecessor and extends the seed with four
//! zero bytes.
//!
//! ```text
//! base  = crc(host ++ "\0" ++ port)
//! p[0]  = final(base ++ [0, 0, 0, 0])
//! p[i]  = final(base ++ bytes(p[i - 1]))
//! ```

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

use tracing::debug;

use crate::checksum::{self, Crc32};
use crate::error::{Error, Result};
use crate::ring::point::HashPoint;
use crate::ring::ring::HashRing;
use crate::upstream::Upstream;
use crate::verbose::{Silent, VerboseSink};

/// Points generated per unit of weight.
pub const FACTOR: usize = 160;

/// Largest upstream weight the builder accepts.
pub const MAX_WEIGHT: u32 = 10_000;

/// Width the previous hash is padded to when chained into the next point.
const PREV_HASH_LEN: usize = 4;

/// Generates the points of one upstream, in chain order.
///
/// Fails with [`Error::WeightTooLarge`] above [`MAX_WEIGHT`].
pub fn build_points(upstream: &Upstream) -> Result<Vec<HashPoint>> {
    let (host, port) = upstream.host_port()?;

    let mut base = Crc32::new();
    base.update(host.as_bytes())
        .update_padded(&[], 1)
        .update(port.as_bytes());

    let count = Some(upstream.weight)
        .filter(|&weight| weight <= MAX_WEIGHT)
        .and_then(|weight| FACTOR.checked_mul(weight as usize))
        .ok_or_else(|| Error::WeightTooLarge {
            address: upstream.address.clone(),
            weight: upstream.weight,
            max: MAX_WEIGHT,
        })?;

    let owner: Arc<str> = Arc::from(upstream.address.as_str());
    let mut points = Vec::with_capacity(count);

    let mut prev: Option<[u8; 4]> = None;
    for _ in 0..count {
        let mut crc = base;
        match &prev {
            Some(bytes) => crc.update_padded(bytes, PREV_HASH_LEN),
            None => crc.update_padded(&[], PREV_HASH_LEN),
        };
        let hash = crc.finalize();
        points.push(HashPoint::new(hash, Arc::clone(&owner)));
        prev = Some(checksum::final_to_bytes(hash));
    }
    Ok(points)
}

/// Builder for a [`HashRing`] over weighted upstreams.
///
/// # Example
///
/// ```rust
/// use chash_corelib::{RingBuilder, Upstream};
///
/// let ring = RingBuilder::new()
///     .upstream(Upstream::new("a.example.com:80", 1))
///     .upstream(Upstream::new("b.example.com:80", 2))
///     .build()
///     .unwrap();
/// assert_eq!(ring.len(), 480);
/// ```
#[derive(Debug, Default)]
pub struct RingBuilder {
    upstreams: Vec<Upstream>,
    parallel: bool,
}

impl RingBuilder {
    /// Creates a builder with no upstreams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one upstream.
    pub fn upstream(mut self, upstream: Upstream) -> Self {
        self.upstreams.push(upstream);
        self
    }

    /// Adds upstreams in order.
    pub fn upstreams(mut self, upstreams: impl IntoIterator<Item = Upstream>) -> Self {
        self.upstreams.extend(upstreams);
        self
    }

    /// Generate chains on one scoped thread per available core.
    ///
    /// Each thread takes a contiguous run of upstreams. Chains are
    /// concatenated in upstream order before the ring is sorted, so the ring
    /// and the first reported error are the same either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the ring.
    pub fn build(self) -> Result<HashRing> {
        self.build_with(&Silent)
    }

    /// Builds the ring, reporting upstreams and generated points to `sink`.
    pub fn build_with(self, sink: &dyn VerboseSink) -> Result<HashRing> {
        if sink.enabled() {
            for up in &self.upstreams {
                let line = format!("server: {:<15} weight: {:>3}", up.address, up.weight);
                sink.log_line(&line);
            }
        }

        let chains = if self.parallel && self.upstreams.len() > 1 {
            generate_parallel(&self.upstreams)?
        } else {
            build_chunk(&self.upstreams)?
        };

        let mut points = Vec::with_capacity(chains.iter().map(Vec::len).sum());
        for chain in chains {
            points.extend(chain);
        }
        debug!(
            upstreams = self.upstreams.len(),
            points = points.len(),
            parallel = self.parallel,
            "generated hash points"
        );

        if sink.enabled() {
            for point in &points {
                sink.log_line(&point.to_string());
            }
        }

        Ok(HashRing::build(points))
    }
}

fn build_chunk(upstreams: &[Upstream]) -> Result<Vec<Vec<HashPoint>>> {
    upstreams.iter().map(build_points).collect()
}

fn generate_parallel(upstreams: &[Upstream]) -> Result<Vec<Vec<HashPoint>>> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let chunk_size = upstreams.len().div_ceil(workers).max(1);
    debug!(workers, chunk_size, "generating hash points in parallel");

    crossbeam::thread::scope(|s| -> Result<Vec<Vec<HashPoint>>> {
        let handles: Vec<_> = upstreams
            .chunks(chunk_size)
            .map(|chunk| s.spawn(move |_| build_chunk(chunk)))
            .collect();
        let mut chains = Vec::with_capacity(upstreams.len());
        for handle in handles {
            let chunk = handle
                .join()
                .unwrap_or_else(|e| std::panic::resume_unwind(e))?;
            chains.extend(chunk);
        }
        Ok(chains)
    })
    .unwrap_or_else(|e| std::panic::resume_unwind(e))
}
