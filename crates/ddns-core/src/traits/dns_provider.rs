// # DNS Provider Trait
//
// Defines the interface to the provider's record-storage API.
//
// ## Implementations
//
// - DigitalOcean: `ddns-provider-digitalocean` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, RecordRequest};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_records("example.com").await?;
//     let request = RecordRequest::for_address("home", "203.0.113.5".parse()?, 60);
//     provider.create_record("example.com", &request).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{DnsRecord, RecordRequest};

/// Trait for DNS provider implementations
///
/// This trait exposes the four record operations the reconciliation engine
/// needs. Implementations handle the specifics of one provider's API.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Responsibilities
///
/// Providers are single-shot API clients:
/// - One operation per call, errors returned as-is
/// - No retry or backoff (a failed run is simply re-invoked)
/// - No caching of records between calls
/// - No decision about whether a change is needed (owned by the engine)
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record in `zone`
    ///
    /// The provider's ordering is preserved and all pages are returned.
    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a record in `zone`
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The created record, with its provider-assigned ID
    /// - `Err(Error)`: If the create call failed
    async fn create_record(
        &self,
        zone: &str,
        request: &RecordRequest,
    ) -> Result<DnsRecord, crate::Error>;

    /// Replace the record identified by `record_id`
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: The updated record
    /// - `Err(Error)`: If the edit call failed
    async fn edit_record(
        &self,
        zone: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> Result<DnsRecord, crate::Error>;

    /// Delete the record identified by `record_id`
    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    ///
    /// # Returns
    ///
    /// A static string identifying the provider (e.g., "digitalocean")
    fn provider_name(&self) -> &'static str;
}
