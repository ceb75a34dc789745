// # DigitalOcean DNS Provider
//
// This crate provides a DigitalOcean DNS provider implementation for the DDNS updater.
//
// ## Implementation
//
// - One HTTP request per operation (listing follows pagination)
// - Full error propagation to the engine, no retry and no backoff
// - HTTP timeout configured by the caller
// - Specific error handling for HTTP status codes (401, 403, 404, 429, 5xx)
// - Dry-run mode: listing is real, mutating calls are only logged
// - No caching: every run lists the zone afresh
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - DigitalOcean API v2: https://docs.digitalocean.com/reference/api/
// - List records:   GET    `/domains/:zone/records?page=N&per_page=200`
// - Create record:  POST   `/domains/:zone/records`
// - Update record:  PUT    `/domains/:zone/records/:id`
// - Delete record:  DELETE `/domains/:zone/records/:id`

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::traits::DnsProvider;
use ddns_core::{DnsRecord, Error, RecordRequest, Result};
use serde::Deserialize;
use std::time::Duration;

/// Provider name used in logs and errors
const PROVIDER_NAME: &str = "digitalocean";

/// Records requested per listing page (API maximum)
const PER_PAGE: u32 = 200;

/// Upper bound on listing pages, guards against a looping `next` link
const MAX_PAGES: u32 = 100;

/// ID reported for records that were not really created in dry-run mode
const DRY_RUN_RECORD_ID: &str = "dry-run";

/// A domain record as returned by the API
#[derive(Debug, Deserialize)]
struct ApiRecord {
    id: u64,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    #[serde(default)]
    data: String,
    #[serde(default)]
    ttl: u32,
}

impl From<ApiRecord> for DnsRecord {
    fn from(record: ApiRecord) -> Self {
        DnsRecord {
            id: record.id.to_string(),
            record_type: record.record_type,
            name: record.name,
            data: record.data,
            ttl: record.ttl,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    domain_records: Vec<ApiRecord>,
    #[serde(default)]
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Debug, Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    domain_record: ApiRecord,
}

/// Error body: `{"id": "unauthorized", "message": "Unable to authenticate you"}`
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// DigitalOcean DNS provider
///
/// Stateless and single-shot. All coordination (ordering, fail-fast) is
/// owned by `DdnsEngine`.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform listing requests
/// - Log the intended create/update/delete
/// - **NOT** modify any record
pub struct DigitalOceanProvider {
    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL, without trailing slash
    api_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip mutating calls
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DigitalOceanProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanProvider")
            .field("api_token", &"<REDACTED>")
            .field("api_url", &self.api_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DigitalOceanProvider {
    /// Create a new DigitalOcean provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Personal access token with write scope
    /// - `api_url`: API base URL (e.g. `https://api.digitalocean.com/v2`)
    /// - `timeout`: Per-request HTTP timeout
    /// - `dry_run`: If true, list records but skip mutating calls
    pub fn new(
        api_token: impl Into<String>,
        api_url: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::missing_credential(
                "DigitalOcean API token cannot be empty",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
            dry_run,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        match config {
            ProviderConfig::DigitalOcean {
                api_token,
                api_url,
                dry_run,
            } => {
                if *dry_run {
                    tracing::warn!(
                        "DigitalOcean provider running in DRY-RUN mode - no changes will be made"
                    );
                }
                Self::new(api_token.clone(), api_url.clone(), timeout, *dry_run)
            }
        }
    }

    /// Whether mutating calls are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_url(&self, zone: &str) -> String {
        format!("{}/domains/{}/records", self.api_url, zone)
    }

    fn record_url(&self, zone: &str, record_id: &str) -> String {
        format!("{}/domains/{}/records/{}", self.api_url, zone, record_id)
    }

    fn dry_run_record(request: &RecordRequest, record_id: &str) -> DnsRecord {
        DnsRecord {
            id: record_id.to_string(),
            record_type: request.record_type.as_str().to_string(),
            name: request.name.clone(),
            data: request.data.clone(),
            ttl: request.ttl,
        }
    }
}

/// Send a request, mapping transport failures to provider errors
async fn send(request: reqwest::RequestBuilder, action: &str) -> Result<reqwest::Response> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("HTTP request failed ({}): {}", action, e)))?;

    check_status(response, action).await
}

/// Map non-success HTTP status codes to specific errors
async fn check_status(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    let detail = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid API token or insufficient permissions ({}). Status: {}",
            action, status
        )),
        404 => Error::not_found(format!("{}: {}", action, detail)),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded ({}). Please retry later. Status: {}",
            action, status
        )),
        500..=599 => Error::provider(
            PROVIDER_NAME,
            format!("DigitalOcean server error ({}): {} - {}", action, status, detail),
        ),
        _ => Error::provider(
            PROVIDER_NAME,
            format!("Failed to {}: {} - {}", action, status, detail),
        ),
    })
}

async fn parse_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
    action: &str,
) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        Error::provider(
            PROVIDER_NAME,
            format!("Failed to parse response ({}): {}", action, e),
        )
    })
}

#[async_trait]
impl DnsProvider for DigitalOceanProvider {
    /// List all records of a zone, following pagination
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /domains/example.com/records?page=1&per_page=200
    /// Authorization: Bearer <token>
    /// ```
    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        let action = format!("list records of {}", zone);
        let url = self.records_url(zone);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            tracing::debug!("Listing records of {} (page {})", zone, page);

            let request = self
                .client
                .get(&url)
                .bearer_auth(&self.api_token)
                .query(&[("page", page), ("per_page", PER_PAGE)]);
            let response = send(request, &action).await?;
            let body: ListResponse = parse_json(response, &action).await?;

            records.extend(body.domain_records.into_iter().map(DnsRecord::from));

            let has_next = body
                .links
                .and_then(|links| links.pages)
                .and_then(|pages| pages.next)
                .is_some();

            if !has_next {
                break;
            }
            if page >= MAX_PAGES {
                tracing::warn!(
                    "Stopped listing {} after {} pages; record set may be incomplete",
                    zone,
                    MAX_PAGES
                );
                break;
            }
            page += 1;
        }

        tracing::debug!("Found {} record(s) in {}", records.len(), zone);
        Ok(records)
    }

    /// Create a record
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /domains/example.com/records
    /// {"type": "A", "name": "home", "data": "203.0.113.5", "ttl": 60}
    /// ```
    async fn create_record(&self, zone: &str, request: &RecordRequest) -> Result<DnsRecord> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST to {} with payload: {}",
                self.records_url(zone),
                serde_json::to_string(request)?
            );
            return Ok(Self::dry_run_record(request, DRY_RUN_RECORD_ID));
        }

        let action = format!("create {} record {} in {}", request.record_type, request.name, zone);
        let http_request = self
            .client
            .post(self.records_url(zone))
            .bearer_auth(&self.api_token)
            .json(request);
        let response = send(http_request, &action).await?;
        let body: RecordResponse = parse_json(response, &action).await?;

        tracing::debug!("Created record {} in {}", body.domain_record.id, zone);
        Ok(body.domain_record.into())
    }

    /// Replace a record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /domains/example.com/records/12345
    /// {"type": "A", "name": "home", "data": "203.0.113.5", "ttl": 60}
    /// ```
    async fn edit_record(
        &self,
        zone: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> Result<DnsRecord> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT to {} with payload: {}",
                self.record_url(zone, record_id),
                serde_json::to_string(request)?
            );
            return Ok(Self::dry_run_record(request, record_id));
        }

        let action = format!("update record {} in {}", record_id, zone);
        let http_request = self
            .client
            .put(self.record_url(zone, record_id))
            .bearer_auth(&self.api_token)
            .json(request);
        let response = send(http_request, &action).await?;
        let body: RecordResponse = parse_json(response, &action).await?;

        Ok(body.domain_record.into())
    }

    /// Delete a record
    ///
    /// # API Call
    ///
    /// ```http
    /// DELETE /domains/example.com/records/12345
    /// ```
    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send DELETE to {}",
                self.record_url(zone, record_id)
            );
            return Ok(());
        }

        let action = format!("delete record {} in {}", record_id, zone);
        let http_request = self
            .client
            .delete(self.record_url(zone, record_id))
            .bearer_auth(&self.api_token);
        send(http_request, &action).await?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
