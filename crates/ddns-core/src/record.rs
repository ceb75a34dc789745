//! DNS record model and record matching
//!
//! Records are owned by the remote provider. This module only describes
//! what a listing call returns and what a create/edit call sends, plus the
//! lookup that picks the record a reconciliation pass operates on.

use crate::traits::IpVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Address record type managed by the updater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// The provider-facing type string ("A" or "AAAA")
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// The address family bound to this record type
    pub fn version(&self) -> IpVersion {
        match self {
            RecordType::A => IpVersion::V4,
            RecordType::Aaaa => IpVersion::V6,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as returned by the provider's listing call
///
/// `record_type` is the provider's raw type string: a zone listing contains
/// MX, TXT, NS and friends alongside the A/AAAA records we care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned identifier, opaque and immutable
    pub id: String,
    /// Record type as reported by the provider
    pub record_type: String,
    /// Name relative to the zone (`@` for the apex)
    pub name: String,
    /// Record value
    pub data: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl DnsRecord {
    /// Whether this record's data denotes `address`
    ///
    /// Data that parses as an IP address is compared as an address so that
    /// equivalent IPv6 spellings match; anything else is compared as text.
    pub fn points_to(&self, address: IpAddr) -> bool {
        match self.data.trim().parse::<IpAddr>() {
            Ok(current) => current == address,
            Err(_) => self.data == address.to_string(),
        }
    }
}

/// Body of a create or edit call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Name relative to the zone
    pub name: String,
    /// Record value
    pub data: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl RecordRequest {
    /// Build the request that points `name` at `address`
    pub fn for_address(name: impl Into<String>, address: IpAddr, ttl: u32) -> Self {
        let record_type = match address {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::Aaaa,
        };

        Self {
            record_type,
            name: name.into(),
            data: address.to_string(),
            ttl,
        }
    }
}

/// Find the record a reconciliation pass operates on
///
/// Returns the first record whose name and type match, in provider order.
/// The provider does not guarantee (name, type) uniqueness; the first match
/// is authoritative. `None` is the normal first-run outcome.
pub fn find_record<'a>(
    records: &'a [DnsRecord],
    name: &str,
    record_type: RecordType,
) -> Option<&'a DnsRecord> {
    records
        .iter()
        .find(|record| record.name == name && record.record_type == record_type.as_str())
}
