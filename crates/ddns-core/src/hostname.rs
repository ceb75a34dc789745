//! Hostname decomposition
//!
//! A hostname is split into the zone (its last two labels) and the record
//! name relative to that zone. A two-label hostname is the zone apex.
//!
//! ```rust
//! use ddns_core::Hostname;
//!
//! let host = Hostname::parse("home.example.com").unwrap();
//! assert_eq!(host.zone(), "example.com");
//! assert_eq!(host.record_name(), "home");
//!
//! let apex = Hostname::parse("example.com").unwrap();
//! assert_eq!(apex.record_name(), "@");
//! ```

use crate::error::{Error, Result};
use std::fmt;

/// Marker the provider uses for the zone apex
pub const APEX_MARKER: &str = "@";

/// Number of trailing labels that form the zone
const ZONE_LABELS: usize = 2;

/// Maximum length of a domain name (RFC 1035)
const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label (RFC 1035)
const MAX_LABEL_LEN: usize = 63;

/// A hostname split into subdomain and zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hostname {
    subdomain: String,
    zone: String,
}

impl Hostname {
    /// Parse a dotted hostname
    ///
    /// One trailing dot is accepted and the name is lower-cased. Fails with
    /// [`Error::InvalidHostname`] when fewer than two labels are present or a
    /// label is not a valid DNS label.
    pub fn parse(hostname: &str) -> Result<Self> {
        let trimmed = hostname.trim();
        let name = trimmed.strip_suffix('.').unwrap_or(trimmed).to_ascii_lowercase();

        if name.is_empty() {
            return Err(Error::invalid_hostname("hostname cannot be empty"));
        }

        if name.len() > MAX_NAME_LEN {
            return Err(Error::invalid_hostname(format!(
                "hostname too long: {} chars (max {}): {}",
                name.len(),
                MAX_NAME_LEN,
                name
            )));
        }

        let labels: Vec<&str> = name.split('.').collect();
        for label in &labels {
            validate_label(label, &name)?;
        }

        if labels.len() < ZONE_LABELS {
            return Err(Error::invalid_hostname(format!(
                "hostname requires at least {} labels: {}",
                ZONE_LABELS, name
            )));
        }

        let split = labels.len() - ZONE_LABELS;
        Ok(Self {
            subdomain: labels[..split].join("."),
            zone: labels[split..].join("."),
        })
    }

    /// The zone managed by the provider (e.g. `example.com`)
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Labels before the zone, empty for the apex
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// Whether this hostname is the zone apex
    pub fn is_apex(&self) -> bool {
        self.subdomain.is_empty()
    }

    /// Record name as sent to the provider (`@` for the apex)
    pub fn record_name(&self) -> &str {
        if self.is_apex() {
            APEX_MARKER
        } else {
            &self.subdomain
        }
    }

    /// The fully-qualified name this hostname was parsed from
    pub fn fqdn(&self) -> String {
        if self.is_apex() {
            self.zone.clone()
        } else {
            format!("{}.{}", self.subdomain, self.zone)
        }
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fqdn())
    }
}

fn validate_label(label: &str, name: &str) -> Result<()> {
    if label.is_empty() {
        return Err(Error::invalid_hostname(format!(
            "hostname has an empty label: '{}'",
            name
        )));
    }

    if label.len() > MAX_LABEL_LEN {
        return Err(Error::invalid_hostname(format!(
            "label too long: {} chars (max {}): '{}'",
            label.len(),
            MAX_LABEL_LEN,
            label
        )));
    }

    // Underscore is allowed for service-style labels (_dmarc, _acme-challenge)
    if !label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::invalid_hostname(format!(
            "label contains invalid characters: '{}'",
            label
        )));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(Error::invalid_hostname(format!(
            "label cannot start or end with hyphen: '{}'",
            label
        )));
    }

    Ok(())
}
