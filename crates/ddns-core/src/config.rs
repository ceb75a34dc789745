//! Configuration types for the DDNS updater
//!
//! A [`DdnsConfig`] describes one invocation: which hostname to reconcile,
//! which address families to process, and how to reach the provider and the
//! address-echo service. It is built once by the caller and handed to the
//! engine; nothing in here is process-global.

use crate::error::{Error, Result};
use crate::hostname::Hostname;
use crate::record::RecordType;
use crate::traits::IpVersion;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Default TTL for created and edited records (seconds)
pub const DEFAULT_TTL: u32 = 60;

/// Smallest TTL the provider accepts (seconds)
pub const MIN_TTL: u32 = 30;

/// Default per-request HTTP timeout (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default IPv4 address-echo endpoint
pub const DEFAULT_IPV4_URL: &str = "https://v4.ident.me/";

/// Default IPv6 address-echo endpoint
pub const DEFAULT_IPV6_URL: &str = "https://v6.ident.me/";

/// Default DigitalOcean API base URL
pub const DEFAULT_DIGITALOCEAN_API_URL: &str = "https://api.digitalocean.com/v2";

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Fully-qualified hostname to reconcile
    pub hostname: String,

    /// Address families to process
    #[serde(default)]
    pub families: FamilySelection,

    /// Addresses that bypass discovery
    #[serde(default)]
    pub forced: ForcedAddresses,

    /// TTL for created and edited records
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// IP source configuration
    #[serde(default)]
    pub ip_source: IpSourceConfig,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl DdnsConfig {
    /// Create a configuration with defaults for everything but the hostname
    /// and the provider token
    pub fn new(hostname: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            families: FamilySelection::default(),
            forced: ForcedAddresses::default(),
            ttl: DEFAULT_TTL,
            provider: ProviderConfig::DigitalOcean {
                api_token: api_token.into(),
                api_url: default_digitalocean_api_url(),
                dry_run: false,
            },
            ip_source: IpSourceConfig::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }

    /// Set the address families to process
    pub fn with_families(mut self, families: FamilySelection) -> Self {
        self.families = families;
        self
    }

    /// Set forced addresses
    pub fn with_forced(mut self, forced: ForcedAddresses) -> Self {
        self.forced = forced;
        self
    }

    /// Set the record TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validate the configuration
    ///
    /// Runs before any network call. The credential is checked first so a
    /// missing token is always reported as such.
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;
        self.parse_hostname()?;

        if self.families.is_empty() {
            return Err(Error::config(
                "At least one address family (IPv4 or IPv6) must be enabled",
            ));
        }

        if self.ttl < MIN_TTL {
            return Err(Error::config(format!(
                "TTL must be at least {} seconds. Got: {}",
                MIN_TTL, self.ttl
            )));
        }

        if !(1..=300).contains(&self.http_timeout_secs) {
            return Err(Error::config(format!(
                "HTTP timeout must be between 1 and 300 seconds. Got: {}",
                self.http_timeout_secs
            )));
        }

        self.ip_source.validate()?;

        Ok(())
    }

    /// Parse the configured hostname
    pub fn parse_hostname(&self) -> Result<Hostname> {
        Hostname::parse(&self.hostname)
    }

    /// Record types to reconcile, in processing order
    pub fn record_types(&self) -> Vec<RecordType> {
        self.families
            .versions()
            .into_iter()
            .map(|v| v.record_type())
            .collect()
    }
}

/// Which address families a run processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySelection {
    /// Process the A record
    pub ipv4: bool,
    /// Process the AAAA record
    pub ipv6: bool,
}

impl FamilySelection {
    /// Both families
    pub fn both() -> Self {
        Self {
            ipv4: true,
            ipv6: true,
        }
    }

    /// IPv4 only
    pub fn ipv4_only() -> Self {
        Self {
            ipv4: true,
            ipv6: false,
        }
    }

    /// IPv6 only
    pub fn ipv6_only() -> Self {
        Self {
            ipv4: false,
            ipv6: true,
        }
    }

    /// Whether no family is selected
    pub fn is_empty(&self) -> bool {
        !self.ipv4 && !self.ipv6
    }

    /// Selected versions in processing order (IPv6 pass runs first)
    pub fn versions(&self) -> Vec<IpVersion> {
        let mut versions = Vec::with_capacity(2);
        if self.ipv6 {
            versions.push(IpVersion::V6);
        }
        if self.ipv4 {
            versions.push(IpVersion::V4);
        }
        versions
    }
}

impl Default for FamilySelection {
    fn default() -> Self {
        Self::both()
    }
}

/// Addresses supplied by the caller instead of discovery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForcedAddresses {
    /// Forced IPv4 address
    pub ipv4: Option<Ipv4Addr>,
    /// Forced IPv6 address
    pub ipv6: Option<Ipv6Addr>,
}

impl ForcedAddresses {
    /// The forced address for `version`, if any
    pub fn get(&self, version: IpVersion) -> Option<IpAddr> {
        match version {
            IpVersion::V4 => self.ipv4.map(IpAddr::V4),
            IpVersion::V6 => self.ipv6.map(IpAddr::V6),
        }
    }
}

/// IP source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IpSourceConfig {
    /// HTTP address-echo service, one endpoint per family
    Http {
        /// Endpoint answering with the caller's IPv4 address
        ipv4_url: String,
        /// Endpoint answering with the caller's IPv6 address
        ipv6_url: String,
    },
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            IpSourceConfig::Http { ipv4_url, ipv6_url } => {
                for (label, url) in [("IPv4", ipv4_url), ("IPv6", ipv6_url)] {
                    if url.is_empty() {
                        return Err(Error::config(format!(
                            "{} address-echo URL cannot be empty",
                            label
                        )));
                    }
                    if !url.starts_with("https://") && !url.starts_with("http://") {
                        return Err(Error::config(format!(
                            "{} address-echo URL must use HTTP or HTTPS scheme. Got: {}",
                            label, url
                        )));
                    }
                }
                Ok(())
            }
        }
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        IpSourceConfig::Http {
            ipv4_url: DEFAULT_IPV4_URL.to_string(),
            ipv6_url: DEFAULT_IPV6_URL.to_string(),
        }
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// DigitalOcean domain records API
    #[serde(rename = "digitalocean")]
    DigitalOcean {
        /// Personal access token with write scope
        api_token: String,
        /// API base URL
        #[serde(default = "default_digitalocean_api_url")]
        api_url: String,
        /// List records but skip mutating calls
        #[serde(default)]
        dry_run: bool,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::DigitalOcean {
                api_token, api_url, ..
            } => {
                if api_token.trim().is_empty() {
                    return Err(Error::missing_credential(
                        "DigitalOcean API token is required. \
                        Pass --token or set DDNS_PROVIDER_API_TOKEN",
                    ));
                }
                if api_url.is_empty() {
                    return Err(Error::config("DigitalOcean API URL cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::DigitalOcean { .. } => "digitalocean",
        }
    }
}

// Keeps the token out of Debug output
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::DigitalOcean {
                api_url, dry_run, ..
            } => f
                .debug_struct("DigitalOcean")
                .field("api_token", &"<REDACTED>")
                .field("api_url", api_url)
                .field("dry_run", dry_run)
                .finish(),
        }
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_digitalocean_api_url() -> String {
    DEFAULT_DIGITALOCEAN_API_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DdnsConfig::new("home.example.com", "token");
        assert_eq!(config.ttl, DEFAULT_TTL);
        assert_eq!(config.families, FamilySelection::both());
        assert_eq!(config.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_token() {
        let config = DdnsConfig::new("home.example.com", "");
        assert!(matches!(
            config.validate(),
            Err(Error::MissingCredential(_))
        ));
    }

    #[test]
    fn test_missing_token_reported_before_bad_hostname() {
        let config = DdnsConfig::new("a", "  ");
        assert!(matches!(
            config.validate(),
            Err(Error::MissingCredential(_))
        ));
    }

    #[test]
    fn test_invalid_hostname() {
        let config = DdnsConfig::new("localhost", "token");
        assert!(matches!(config.validate(), Err(Error::InvalidHostname(_))));
    }

    #[test]
    fn test_no_family_selected() {
        let config = DdnsConfig::new("home.example.com", "token").with_families(FamilySelection {
            ipv4: false,
            ipv6: false,
        });
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_ttl_floor() {
        let config = DdnsConfig::new("home.example.com", "token").with_ttl(10);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_echo_url_scheme() {
        let mut config = DdnsConfig::new("home.example.com", "token");
        config.ip_source = IpSourceConfig::Http {
            ipv4_url: "ftp://v4.example.net".to_string(),
            ipv6_url: DEFAULT_IPV6_URL.to_string(),
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_record_types_order() {
        let config = DdnsConfig::new("home.example.com", "token");
        assert_eq!(config.record_types(), vec![RecordType::Aaaa, RecordType::A]);

        let config = config.with_families(FamilySelection::ipv4_only());
        assert_eq!(config.record_types(), vec![RecordType::A]);
    }

    #[test]
    fn test_forced_addresses_by_version() {
        let forced = ForcedAddresses {
            ipv4: Some(Ipv4Addr::new(203, 0, 113, 5)),
            ipv6: None,
        };
        assert_eq!(
            forced.get(IpVersion::V4),
            Some(IpAddr::from([203, 0, 113, 5]))
        );
        assert_eq!(forced.get(IpVersion::V6), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = DdnsConfig::new("home.example.com", "dop_v1_secret_value");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("dop_v1_secret_value"));
        assert!(debug.contains("<REDACTED>"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: DdnsConfig = serde_json::from_value(serde_json::json!({
            "hostname": "home.example.com",
            "provider": { "type": "digitalocean", "api_token": "token" }
        }))
        .unwrap();

        assert_eq!(config.ttl, DEFAULT_TTL);
        assert_eq!(config.families, FamilySelection::both());
        assert_eq!(config.provider.type_name(), "digitalocean");
        assert!(config.validate().is_ok());
    }
}
