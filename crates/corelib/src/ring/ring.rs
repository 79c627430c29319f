//! Hash ring data structure.
//!
//! Sorted, deduplicated hash points with lower-bound search and wrap-around
//! ownership.

use tracing::debug;

use crate::checksum;
use crate::error::{Error, Result};
use crate::ring::point::HashPoint;

/// Immutable consistent hash ring.
///
/// # Invariants
///
/// - points are sorted by hash, strictly ascending (no two share a hash)
/// - among points generated with the same hash, the first one in generation
///   order is the one kept
#[derive(Clone, Debug, Default)]
pub struct HashRing {
    points: Vec<HashPoint>,
}

impl HashRing {
    /// Sorts `points` by hash and drops every point whose hash equals its
    /// predecessor's.
    ///
    /// The sort is stable, so the surviving point of a collision is the one
    /// that came first in `points`.
    pub fn build(mut points: Vec<HashPoint>) -> Self {
        let generated = points.len();
        points.sort_by_key(HashPoint::hash);
        points.dedup_by_key(|p| p.hash());
        debug!(
            generated,
            kept = points.len(),
            collapsed = generated - points.len(),
            "hash ring built"
        );
        Self { points }
    }

    /// Number of points on the ring.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the ring has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in ascending hash order.
    pub fn points(&self) -> &[HashPoint] {
        &self.points
    }

    /// Index of the first point whose hash is `>= hash`.
    ///
    /// Returns `len()` when `hash` is above every point; [`owner`] wraps that
    /// around to the first point.
    ///
    /// [`owner`]: HashRing::owner
    pub fn search(&self, hash: u32) -> Result<usize> {
        if self.points.is_empty() {
            return Err(Error::EmptyRing);
        }
        Ok(self.points.partition_point(|p| p.hash() < hash))
    }

    /// Owner of the point at `index`, taken modulo the ring size.
    pub fn owner(&self, index: usize) -> Result<&str> {
        if self.points.is_empty() {
            return Err(Error::EmptyRing);
        }
        Ok(self.points[index % self.points.len()].owner())
    }

    /// Address a hash key routes to.
    pub fn route(&self, key: &[u8]) -> Result<&str> {
        self.route_hash(checksum::key_hash(key))
    }

    /// Address an already computed key hash routes to.
    #[inline]
    pub fn route_hash(&self, hash: u32) -> Result<&str> {
        let index = self.search(hash)?;
        self.owner(index)
    }
}
