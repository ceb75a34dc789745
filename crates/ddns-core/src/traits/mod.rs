//! Collaborator traits for the DDNS updater
//!
//! This module defines the interfaces to the two external services the
//! reconciliation engine talks to.
//!
//! - [`IpSource`]: Discover the current public address per family
//! - [`DnsProvider`]: List and mutate records in a zone

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, IpVersion};
pub use dns_provider::DnsProvider;
