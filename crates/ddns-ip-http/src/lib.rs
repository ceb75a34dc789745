// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS updater.
//
// ## Purpose
//
// Discovers the caller's public address by asking an address-echo service.
// Each family has its own endpoint (e.g. `https://v4.ident.me/` and
// `https://v6.ident.me/`) so that the answer reflects the route taken by
// that family.
//
// ## Outcomes
//
// - Body holding an address of the requested family: `Ok(Some(ip))`
// - Empty body: `Ok(None)`
// - IPv6 lookup failing with "network unreachable": `Ok(None)` (the host has
//   no IPv6 route, so a stale AAAA record gets removed)
// - Any other transport failure (DNS, TLS, refused, timeout), non-2xx
//   status, unreadable body: `Err(AddressResolution)`
// - Body that is not an address, or the wrong family: `Err(InvalidAddress)`

use ddns_core::config::IpSourceConfig;
use ddns_core::traits::{IpSource, IpVersion};
use ddns_core::{Error, Result};

use std::error::Error as StdError;
use std::io;
use std::net::IpAddr;
use std::time::Duration;

/// HTTP-based IP source backed by address-echo services
pub struct HttpIpSource {
    /// Endpoint answering with the caller's IPv4 address
    ipv4_url: String,

    /// Endpoint answering with the caller's IPv6 address
    ipv6_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `ipv4_url`: Echo endpoint for IPv4 (e.g., "https://v4.ident.me/")
    /// - `ipv6_url`: Echo endpoint for IPv6 (e.g., "https://v6.ident.me/")
    /// - `timeout`: Per-request timeout
    pub fn new(
        ipv4_url: impl Into<String>,
        ipv6_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            ipv4_url: ipv4_url.into(),
            ipv6_url: ipv6_url.into(),
            client,
        })
    }

    /// Create an HTTP IP source from configuration
    pub fn from_config(config: &IpSourceConfig, timeout: Duration) -> Result<Self> {
        match config {
            IpSourceConfig::Http { ipv4_url, ipv6_url } => {
                Self::new(ipv4_url.clone(), ipv6_url.clone(), timeout)
            }
        }
    }

    fn url_for(&self, version: IpVersion) -> &str {
        match version {
            IpVersion::V4 => &self.ipv4_url,
            IpVersion::V6 => &self.ipv6_url,
        }
    }

    /// Fetch the raw response body from the echo endpoint
    ///
    /// Returns `Ok(None)` only when an IPv6 endpoint is unreachable because
    /// the host has no IPv6 route.
    async fn fetch(&self, version: IpVersion) -> Result<Option<String>> {
        let url = self.url_for(version);
        tracing::debug!("Querying {} echo service at {}", version, url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if version == IpVersion::V6 && is_network_unreachable(&e) => {
                tracing::info!("No IPv6 route to {}: {}", url, e);
                return Ok(None);
            }
            Err(e) if e.is_timeout() => {
                return Err(Error::address_resolution(format!(
                    "{} echo service timed out: {}",
                    version, e
                )));
            }
            Err(e) => {
                return Err(Error::address_resolution(format!(
                    "{} echo request failed: {}",
                    version, e
                )));
            }
        };

        if !response.status().is_success() {
            return Err(Error::address_resolution(format!(
                "{} echo service returned HTTP {}",
                version,
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::address_resolution(format!("Failed to read {} echo response: {}", version, e))
        })?;

        Ok(Some(body))
    }
}

/// Whether `err` or one of its sources is an ENETUNREACH I/O error
fn is_network_unreachable(err: &(dyn StdError + 'static)) -> bool {
    let mut source = Some(err);
    while let Some(e) = source {
        if let Some(io_err) = e.downcast_ref::<io::Error>()
            && io_err.kind() == io::ErrorKind::NetworkUnreachable
        {
            return true;
        }
        source = e.source();
    }
    false
}

/// Interpret an echo body for `version`
fn parse_echo(body: &str, version: IpVersion) -> Result<Option<IpAddr>> {
    let text = body.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let ip: IpAddr = text
        .parse()
        .map_err(|_| Error::invalid_address(format!("Echo service answered '{}'", text)))?;

    if !version.matches(&ip) {
        return Err(Error::invalid_address(format!(
            "Expected {}, got: {}",
            version, ip
        )));
    }

    Ok(Some(ip))
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self, version: IpVersion) -> Result<Option<IpAddr>> {
        match self.fetch(version).await? {
            Some(body) => parse_echo(&body, version),
            None => Ok(None),
        }
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_echo_trims_whitespace() {
        let ip = parse_echo("203.0.113.5\n", IpVersion::V4).unwrap();
        assert_eq!(ip, Some("203.0.113.5".parse().unwrap()));
    }

    #[test]
    fn test_parse_echo_empty_body_is_no_address() {
        assert_eq!(parse_echo("", IpVersion::V6).unwrap(), None);
        assert_eq!(parse_echo("  \r\n", IpVersion::V4).unwrap(), None);
    }

    #[test]
    fn test_parse_echo_rejects_garbage() {
        let err = parse_echo("<html>oops</html>", IpVersion::V4).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[test]
    fn test_parse_echo_rejects_wrong_family() {
        let err = parse_echo("2001:db8::5", IpVersion::V4).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));

        let err = parse_echo("203.0.113.5", IpVersion::V6).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "connect failed")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_network_unreachable_found_in_source_chain() {
        let direct = io::Error::from(io::ErrorKind::NetworkUnreachable);
        assert!(is_network_unreachable(&direct));

        let wrapped = Wrapped(io::Error::from(io::ErrorKind::NetworkUnreachable));
        assert!(is_network_unreachable(&wrapped));
    }

    #[test]
    fn test_other_transport_failures_are_not_unreachable() {
        let refused = Wrapped(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(!is_network_unreachable(&refused));

        let dns = io::Error::other("failed to lookup address information");
        assert!(!is_network_unreachable(&dns));
    }

    #[test]
    fn test_from_config() {
        let config = IpSourceConfig::default();
        let source = HttpIpSource::from_config(&config, Duration::from_secs(10)).unwrap();

        assert_eq!(source.url_for(IpVersion::V4), "https://v4.ident.me/");
        assert_eq!(source.url_for(IpVersion::V6), "https://v6.ident.me/");
        assert_eq!(source.source_name(), "http");
    }
}
