// # IP Source Trait
//
// Defines the interface for discovering the caller's public address.
//
// ## Implementations
//
// - HTTP address-echo service: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{IpSource, IpVersion};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     match source.current(IpVersion::V6).await? {
//         Some(ip) => println!("public IPv6: {}", ip),
//         None => println!("no IPv6 connectivity"),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use crate::record::RecordType;

/// IP version (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// The record type that carries addresses of this family
    pub fn record_type(&self) -> RecordType {
        match self {
            IpVersion::V4 => RecordType::A,
            IpVersion::V6 => RecordType::Aaaa,
        }
    }

    /// Whether `ip` belongs to this family
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("IPv4"),
            IpVersion::V6 => f.write_str("IPv6"),
        }
    }
}

/// Trait for public address discovery
///
/// Implementations perform a single lookup per call. They must not retry
/// and must not cache across calls: every run is stateless.
///
/// # Absence vs. failure
///
/// - `Ok(Some(ip))`: the public address of the requested family
/// - `Ok(None)`: the host has no address of this family (e.g. no IPv6 route).
///   The engine treats this as a valid terminal state and removes a stale record.
/// - `Err(Error)`: the lookup itself failed; no record is touched.
///
/// A returned address must belong to the requested family.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public address for `version`
    async fn current(&self, version: IpVersion) -> Result<Option<IpAddr>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
