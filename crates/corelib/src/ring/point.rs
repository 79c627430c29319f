//! Hash points: single positions on the ring.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A position on the ring owned by one upstream.
///
/// All points of an upstream share one `Arc<str>` for the owner address.
/// Points compare by hash only.
#[derive(Clone, Debug)]
pub struct HashPoint {
    hash: u32,
    owner: Arc<str>,
}

impl HashPoint {
    /// Creates a point at `hash` owned by `owner`.
    pub fn new(hash: u32, owner: Arc<str>) -> Self {
        Self { hash, owner }
    }

    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Address of the upstream this point belongs to.
    #[inline]
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl PartialEq for HashPoint {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for HashPoint {}

impl PartialOrd for HashPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HashPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hash.cmp(&other.hash)
    }
}

impl fmt::Display for HashPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hash: {:<10} server: {:<15}", self.hash, self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_ignores_owner() {
        let a = HashPoint::new(100, Arc::from("a:80"));
        let b = HashPoint::new(200, Arc::from("a:80"));
        let c = HashPoint::new(100, Arc::from("c:80"));
        assert!(a < b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_display() {
        let p = HashPoint::new(42, Arc::from("a.example.com:80"));
        assert_eq!(p.to_string(), "hash: 42         server: a.example.com:80");
    }
}
