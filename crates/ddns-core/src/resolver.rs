//! Address resolution
//!
//! Picks the desired address for one family: a caller-forced address wins
//! without any network call, otherwise the [`IpSource`] is asked.

use crate::error::{Error, Result};
use crate::traits::{IpSource, IpVersion};
use std::net::IpAddr;
use tracing::{debug, info};

/// Resolve the desired address for `version`
///
/// # Returns
///
/// - `Ok(Some(ip))`: The forced address, or the discovered public address
/// - `Ok(None)`: The source reports no address for this family
/// - `Err(Error)`: Discovery failed, or an address of the wrong family
///   was forced or returned
pub async fn resolve(
    source: &dyn IpSource,
    version: IpVersion,
    forced: Option<IpAddr>,
) -> Result<Option<IpAddr>> {
    if let Some(ip) = forced {
        if !version.matches(&ip) {
            return Err(Error::invalid_address(format!(
                "forced {} address has the wrong family: {}",
                version, ip
            )));
        }
        info!("Using forced {} address: {}", version, ip);
        return Ok(Some(ip));
    }

    debug!("Resolving public {} via {}", version, source.source_name());

    match source.current(version).await? {
        Some(ip) if !version.matches(&ip) => Err(Error::invalid_address(format!(
            "{} returned a non-{} address: {}",
            source.source_name(),
            version,
            ip
        ))),
        Some(ip) => {
            info!("Found public {}: {}", version, ip);
            Ok(Some(ip))
        }
        None => {
            info!("No public {} address available", version);
            Ok(None)
        }
    }
}
