//! Consistent hash ring implementation.
//!
//! The ring holds the points generated for every upstream and answers
//! which upstream a key hash lands on.

pub mod builder;
pub mod point;
#[allow(clippy::module_inception)]
pub mod ring;

pub use builder::{build_points, RingBuilder, FACTOR, MAX_WEIGHT};
pub use point::HashPoint;
pub use ring::HashRing;
