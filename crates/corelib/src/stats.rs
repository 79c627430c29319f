//! Hit statistics: which upstream each sample key lands on.
//!
//! Keys come one per line; blank lines and lines starting with `#` are not
//! keys. Every key is hashed unpadded, routed through the ring and counted
//! against its owner. Rates are computed once all keys are in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::checksum;
use crate::error::{Error, Result};
use crate::ring::HashRing;
use crate::verbose::{Silent, VerboseSink};

/// Final per-upstream result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpstreamStatistic {
    pub server: String,
    pub hit_count: u64,
    /// `hit_count` over the number of keys processed.
    pub hit_rate: f64,
}

/// Report ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Server address, lexicographic.
    #[default]
    Server,
    /// Hit count, ascending.
    HitCount,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Server => "server",
            SortKey::HitCount => "hitCount",
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "server" => Ok(SortKey::Server),
            "hitCount" => Ok(SortKey::HitCount),
            other => Err(Error::InvalidSortKey(other.to_owned())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a line of the key list is a key.
#[inline]
pub fn is_key_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Keys of a hash key list, in order.
pub fn parse_hash_keys(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| is_key_line(line))
}

#[derive(Debug, Default)]
struct HitCounter {
    hits: u64,
}

impl HitCounter {
    fn increment(&mut self) {
        self.hits += 1;
    }
}

/// Running tally over one ring.
#[derive(Debug)]
pub struct Aggregator<'r> {
    ring: &'r HashRing,
    counters: BTreeMap<String, HitCounter>,
    total: u64,
}

impl<'r> Aggregator<'r> {
    /// Starts a tally. Fails on an empty ring, before any key is looked at.
    pub fn new(ring: &'r HashRing) -> Result<Self> {
        if ring.is_empty() {
            return Err(Error::EmptyRing);
        }
        Ok(Self {
            ring,
            counters: BTreeMap::new(),
            total: 0,
        })
    }

    /// Routes one key and counts the hit. Returns the owner's address.
    pub fn record(&mut self, key: &str) -> Result<&'r str> {
        let hash = checksum::key_hash(key.as_bytes());
        self.record_hash(hash)
    }

    fn record_hash(&mut self, hash: u32) -> Result<&'r str> {
        let ring: &'r HashRing = self.ring;
        let server = ring.route_hash(hash)?;
        match self.counters.get_mut(server) {
            Some(counter) => counter.increment(),
            None => {
                let counter = self.counters.entry(server.to_owned()).or_default();
                counter.increment();
            }
        }
        self.total += 1;
        Ok(server)
    }

    /// Keys recorded so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Computes hit rates and sorts by `sort_key`.
    ///
    /// Servers without hits are not listed. Ties under [`SortKey::HitCount`]
    /// keep address order.
    pub fn finish(self, sort_key: SortKey) -> Result<Vec<UpstreamStatistic>> {
        if self.total == 0 {
            return Err(Error::NoKeysProcessed);
        }
        let total = self.total as f64;
        let mut stats: Vec<UpstreamStatistic> = self
            .counters
            .into_iter()
            .map(|(server, counter)| UpstreamStatistic {
                server,
                hit_count: counter.hits,
                hit_rate: counter.hits as f64 / total,
            })
            .collect();
        if sort_key == SortKey::HitCount {
            stats.sort_by_key(|s| s.hit_count);
        }
        debug!(keys = self.total, servers = stats.len(), %sort_key, "statistics finalized");
        Ok(stats)
    }
}

/// Tallies every key line of `keys` against `ring`.
pub fn run<'a>(
    ring: &HashRing,
    keys: impl IntoIterator<Item = &'a str>,
    sort_key: SortKey,
) -> Result<Vec<UpstreamStatistic>> {
    run_with(ring, keys, sort_key, &Silent)
}

/// Like [`run`], reporting every match to `sink`.
pub fn run_with<'a>(
    ring: &HashRing,
    keys: impl IntoIterator<Item = &'a str>,
    sort_key: SortKey,
    sink: &dyn VerboseSink,
) -> Result<Vec<UpstreamStatistic>> {
    let mut agg = Aggregator::new(ring)?;
    for key in keys.into_iter().filter(|k| is_key_line(k)) {
        let hash = checksum::key_hash(key.as_bytes());
        let server = agg.record_hash(hash)?;
        if sink.enabled() {
            sink.log_line(&format!(
                "Match HashKey: {key:<15} Hash: {hash:<10} Server: {server:<15}"
            ));
        }
    }
    agg.finish(sort_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingBuilder;
    use crate::upstream::Upstream;
    use crate::verbose::testing::Recorder;

    fn two_node_ring() -> HashRing {
        RingBuilder::new()
            .upstream(Upstream::new("a.example.com:80", 1))
            .upstream(Upstream::new("b.example.com:80", 1))
            .build()
            .unwrap()
    }

    fn sample_keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("key-{i}")).collect()
    }

    fn tally(ring: &HashRing, keys: &[String], sort_key: SortKey) -> Vec<UpstreamStatistic> {
        run(ring, keys.iter().map(String::as_str), sort_key).unwrap()
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("server".parse::<SortKey>(), Ok(SortKey::Server));
        assert_eq!("hitCount".parse::<SortKey>(), Ok(SortKey::HitCount));
        assert_eq!(
            "hitcount".parse::<SortKey>(),
            Err(Error::InvalidSortKey("hitcount".to_owned()))
        );
        assert_eq!(SortKey::default(), SortKey::Server);
    }

    #[test]
    fn test_parse_hash_keys_skips_blank_and_comments() {
        let text = "k1\n\n# note\nk2\n #not-a-comment\n";
        let keys: Vec<&str> = parse_hash_keys(text).collect();
        assert_eq!(keys, vec!["k1", "k2", " #not-a-comment"]);
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn test_counts_and_rates() {
        let ring = two_node_ring();
        let stats = tally(&ring, &sample_keys(1000), SortKey::Server);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].server, "a.example.com:80");
        assert_eq!(stats[0].hit_count, 493);
        assert_eq!(stats[1].server, "b.example.com:80");
        assert_eq!(stats[1].hit_count, 507);
        let rate_sum: f64 = stats.iter().map(|s| s.hit_rate).sum();
        assert!((rate_sum - 1.0).abs() < 1e-9);
        assert!((stats[0].hit_rate - 0.493).abs() < 1e-9);
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn test_sort_by_hit_count() {
        let ring = RingBuilder::new()
            .upstream(Upstream::new("a.example.com:80", 1))
            .upstream(Upstream::new("b.example.com:80", 2))
            .build()
            .unwrap();
        let stats = tally(&ring, &sample_keys(1000), SortKey::HitCount);
        let counts: Vec<(&str, u64)> = stats
            .iter()
            .map(|s| (s.server.as_str(), s.hit_count))
            .collect();
        assert_eq!(
            counts,
            vec![("a.example.com:80", 345), ("b.example.com:80", 655)]
        );
    }

    #[test]
    fn test_zero_hit_servers_are_omitted() {
        let ring = two_node_ring();
        let key = "key-0";
        let owner = ring.route(key.as_bytes()).unwrap().to_owned();
        let stats = run(&ring, [key, key, key], SortKey::Server).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].server, owner);
        assert_eq!(stats[0].hit_count, 3);
        assert_eq!(stats[0].hit_rate, 1.0);
    }

    #[test]
    fn test_only_comments_is_no_keys() {
        let ring = two_node_ring();
        let result = run(&ring, parse_hash_keys("\n# a\n\n#b\n"), SortKey::Server);
        assert_eq!(result, Err(Error::NoKeysProcessed));
    }

    #[test]
    fn test_empty_ring_is_rejected() {
        let ring = RingBuilder::new().build().unwrap();
        assert_eq!(run(&ring, ["k"], SortKey::Server), Err(Error::EmptyRing));
    }

    #[test]
    fn test_aggregator_record() {
        let ring = two_node_ring();
        let mut agg = Aggregator::new(&ring).unwrap();
        let owner = agg.record("key-0").unwrap();
        assert_eq!(owner, ring.route(b"key-0").unwrap());
        assert_eq!(agg.total(), 1);
    }

    #[test]
    fn test_verbose_match_lines() {
        let ring = two_node_ring();
        let rec = Recorder::default();
        let keys = ["key-0", "# skip", "key-1"];
        run_with(&ring, keys, SortKey::Server, &rec).unwrap();
        let lines = rec.lines.borrow();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Match HashKey: key-0           Hash: 2045480940"));
    }
}
