use std::{fmt::Display, net::IpAddr, str::FromStr};

use ipnet::IpNet;
use pfg_common::helpers::split_list;
use thiserror::Error;

/// The gateway's published notification servers.
pub const DEFAULT_TRUSTED_ORIGINS: [&str; 2] = ["197.97.145.144/28", "41.74.179.192/27"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid IP range '{range}': {reason}")]
pub struct InvalidIpRange {
    pub range: String,
    pub reason: String,
}

/// The set of network ranges that notifications are allowed to come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedOrigins(Vec<IpNet>);

impl Default for TrustedOrigins {
    fn default() -> Self {
        let ranges = DEFAULT_TRUSTED_ORIGINS.iter().filter_map(|r| r.parse::<IpNet>().ok()).collect();
        Self(ranges)
    }
}

impl TrustedOrigins {
    pub fn new(ranges: Vec<IpNet>) -> Self {
        Self(ranges)
    }

    /// An empty allow-list. Nothing is trusted.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Parses a list of CIDR ranges. Bare addresses are accepted as single-host ranges.
    pub fn parse<S: AsRef<str>>(ranges: &[S]) -> Result<Self, InvalidIpRange> {
        ranges.iter().map(|r| parse_range(r.as_ref())).collect::<Result<Vec<_>, _>>().map(Self)
    }

    pub fn ranges(&self) -> &[IpNet] {
        &self.0
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        let ip = normalize(*ip);
        self.0.iter().any(|net| net.contains(&ip))
    }

    /// Parses `ip` and checks it against the allow-list. Anything that is not an IP address is untrusted.
    pub fn is_trusted(&self, ip: &str) -> bool {
        ip.trim().parse::<IpAddr>().map(|ip| self.contains(&ip)).unwrap_or(false)
    }
}

impl FromStr for TrustedOrigins {
    type Err = InvalidIpRange;

    /// Parses a comma-separated list of ranges
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&split_list(s))
    }
}

impl Display for TrustedOrigins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges = self.0.iter().map(|r| r.to_string()).collect::<Vec<_>>();
        write!(f, "{}", ranges.join(","))
    }
}

fn parse_range(range: &str) -> Result<IpNet, InvalidIpRange> {
    let range = range.trim();
    range.parse::<IpNet>().or_else(|e| {
        range
            .parse::<IpAddr>()
            .map(IpNet::from)
            .map_err(|_| InvalidIpRange { range: range.to_string(), reason: e.to_string() })
    })
}

// IPv4 peers on a dual-stack socket show up as `::ffff:a.b.c.d`
fn normalize(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_ranges() {
        let origins = TrustedOrigins::default();
        assert_eq!(origins.ranges().len(), 2);
        assert!(origins.is_trusted("197.97.145.144"));
        assert!(origins.is_trusted("197.97.145.159"));
        assert!(!origins.is_trusted("197.97.145.160"));
        assert!(origins.is_trusted("41.74.179.223"));
        assert!(!origins.is_trusted("41.74.179.224"));
        assert!(!origins.is_trusted("127.0.0.1"));
    }

    #[test]
    fn range_boundaries() {
        let origins = TrustedOrigins::default();
        for ip in ["197.97.145.143", "197.97.145.160", "41.74.179.191", "41.74.179.224"] {
            assert!(!origins.is_trusted(ip), "{ip} should not be trusted");
        }
        for ip in ["197.97.145.144", "197.97.145.159", "41.74.179.192", "41.74.179.223"] {
            assert!(origins.is_trusted(ip), "{ip} should be trusted");
        }
    }

    #[test]
    fn unparseable_addresses_are_untrusted() {
        let origins = TrustedOrigins::default();
        assert!(!origins.is_trusted(""));
        assert!(!origins.is_trusted("localhost"));
        assert!(!origins.is_trusted("197.97.145.144/28"));
    }

    #[test]
    fn mapped_ipv6() {
        let origins = TrustedOrigins::default();
        assert!(origins.is_trusted("::ffff:197.97.145.150"));
    }

    #[test]
    fn parse_list() {
        let origins = "127.0.0.1, 10.0.0.0/8,::1".parse::<TrustedOrigins>().unwrap();
        assert!(origins.is_trusted("127.0.0.1"));
        assert!(!origins.is_trusted("127.0.0.2"));
        assert!(origins.is_trusted("10.20.30.40"));
        assert!(origins.is_trusted("::1"));
        assert_eq!(origins.to_string(), "127.0.0.1/32,10.0.0.0/8,::1/128");
        let err = "10.0.0.0/33".parse::<TrustedOrigins>().unwrap_err();
        assert_eq!(err.range, "10.0.0.0/33");
        assert!(TrustedOrigins::none().ranges().is_empty());
    }
}
