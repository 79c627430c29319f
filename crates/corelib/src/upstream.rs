//! Upstream servers and the upstream list format.
//!
//! One upstream per line, `address` or `address,weight`. Blank lines and
//! lines starting with `#` are skipped. A missing, unparsable or
//! non-positive weight counts as 1.

use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};

/// One backend target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Upstream {
    /// `host:port`, as written in the list.
    pub address: String,
    /// Number of 160-point units this upstream contributes to the ring.
    pub weight: u32,
}

impl Upstream {
    /// Creates an upstream with the given address and weight.
    pub fn new(address: impl Into<String>, weight: u32) -> Self {
        Self {
            address: address.into(),
            weight,
        }
    }

    /// Host and port halves of the address.
    pub fn host_port(&self) -> Result<(&str, &str)> {
        split_host_port(&self.address)
    }
}

/// Splits `host:port` at the last colon.
///
/// IPv6 hosts must be bracketed (`[::1]:80`); the brackets are not part of
/// the returned host. The port may be empty, the separator may not.
pub fn split_host_port(address: &str) -> Result<(&str, &str)> {
    if let Some(rest) = address.strip_prefix('[') {
        let Some((host, after)) = rest.split_once(']') else {
            return Err(Error::malformed(address, "missing ']'"));
        };
        let Some(port) = after.strip_prefix(':') else {
            return Err(Error::malformed(address, "missing port"));
        };
        if port.contains(['[', ']', ':']) {
            return Err(Error::malformed(address, "unexpected characters after host"));
        }
        return Ok((host, port));
    }

    let Some((host, port)) = address.rsplit_once(':') else {
        return Err(Error::malformed(address, "missing port"));
    };
    if host.contains(':') {
        return Err(Error::malformed(address, "too many colons"));
    }
    if host.contains(['[', ']']) {
        return Err(Error::malformed(address, "unexpected bracket"));
    }
    Ok((host, port))
}

/// Parses the upstream list.
///
/// Addresses are not validated here; the ring builder rejects malformed
/// ones when it splits them.
pub fn parse_upstreams(text: &str) -> Vec<Upstream> {
    let mut upstreams = Vec::new();
    for (lineno, line) in text.split('\n').enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        match fields.as_slice() {
            [address] => upstreams.push(Upstream::new(*address, 1)),
            [address, weight] => {
                let weight = parse_weight(weight, lineno + 1);
                upstreams.push(Upstream::new(*address, weight));
            }
            _ => warn!(
                line = lineno + 1,
                content = line,
                "skipping upstream line with too many fields"
            ),
        }
    }
    upstreams
}

fn parse_weight(raw: &str, lineno: usize) -> u32 {
    match raw.parse::<u32>() {
        Ok(weight) if weight > 0 => weight,
        _ => {
            warn!(
                line = lineno,
                weight = raw,
                "invalid upstream weight, using 1"
            );
            1
        }
    }
}
