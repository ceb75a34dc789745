//! Core DDNS engine
//!
//! The DdnsEngine runs one stateless reconciliation of a hostname:
//! - Parsing the hostname into zone and record name
//! - Resolving the desired address per family via IpSource
//! - Listing the zone's records via DnsProvider
//! - Creating, updating or deleting the matching A/AAAA record
//!
//! ## Architecture
//!
//! ```text
//!                      ┌──────────────┐
//!                      │  DdnsEngine  │
//!                      └──────────────┘
//!                             │ per family (AAAA, then A)
//!         ┌───────────────────┼───────────────────────┐
//!         │                   │                       │
//!         ▼                   ▼                       ▼
//! ┌─────────────┐     ┌──────────────┐       ┌───────────────┐
//! │  IpSource   │     │ DnsProvider  │       │   reconcile   │
//! │ (resolve)   │     │ (list)       │──────▶│ (decide, act) │
//! └─────────────┘     └──────────────┘       └───────────────┘
//! ```
//!
//! ## Pass Flow
//!
//! 1. Resolve the desired address (forced address wins, no network call)
//! 2. List the zone's records
//! 3. Find the first record matching (name, type)
//! 4. Create / update / delete / keep
//!
//! The first error aborts the run. Mutations already made in earlier passes
//! stay in place; re-running is safe because every pass is idempotent.

pub mod reconcile;

pub use reconcile::{Action, Decision, decide, reconcile};

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::hostname::Hostname;
use crate::record::RecordType;
use crate::resolver;
use crate::traits::{DnsProvider, IpSource};
use tracing::{debug, info};

/// Outcome of a full run, one entry per processed family in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Actions taken, in processing order
    pub actions: Vec<(RecordType, Action)>,
}

impl RunReport {
    /// Number of mutating provider calls made during the run
    pub fn mutation_count(&self) -> usize {
        self.actions.iter().filter(|(_, a)| a.is_mutation()).count()
    }

    /// The action taken for `record_type`, if that family was processed
    pub fn action_for(&self, record_type: RecordType) -> Option<&Action> {
        self.actions
            .iter()
            .find(|(t, _)| *t == record_type)
            .map(|(_, a)| a)
    }
}

/// Core DDNS engine
///
/// The engine orchestrates one reconciliation per requested address family.
/// Passes run strictly one after another; nothing is shared between them
/// except the parsed hostname.
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`] (validates the configuration)
/// 2. Call [`DdnsEngine::run()`] once
/// 3. Drop
pub struct DdnsEngine {
    /// IP source for address discovery
    ip_source: Box<dyn IpSource>,

    /// DNS provider for listing and mutating records
    provider: Box<dyn DnsProvider>,

    /// Parsed hostname
    hostname: Hostname,

    /// Run configuration
    config: DdnsConfig,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Run configuration
    ///
    /// # Returns
    ///
    /// - `Ok(DdnsEngine)`: Ready to run
    /// - `Err(Error)`: If the configuration is invalid (no network call made)
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;
        let hostname = config.parse_hostname()?;

        Ok(Self {
            ip_source,
            provider,
            hostname,
            config,
        })
    }

    /// The parsed hostname this engine reconciles
    pub fn hostname(&self) -> &Hostname {
        &self.hostname
    }

    /// Run one reconciliation pass per requested family
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: Every pass succeeded
    /// - `Err(Error)`: The first failing pass; later passes were not started
    pub async fn run(&self) -> Result<RunReport> {
        info!(
            "Reconciling {} (zone: {}, record: {}) via {}",
            self.hostname,
            self.hostname.zone(),
            self.hostname.record_name(),
            self.provider.provider_name()
        );

        let mut report = RunReport::default();

        for record_type in self.config.record_types() {
            let action = self.run_pass(record_type).await?;
            report.actions.push((record_type, action));
        }

        if report.mutation_count() == 0 {
            info!("No changes for {}", self.hostname);
        } else {
            info!(
                "Reconciled {}: {} change(s)",
                self.hostname,
                report.mutation_count()
            );
        }

        Ok(report)
    }

    /// Run the pipeline for a single record type
    async fn run_pass(&self, record_type: RecordType) -> Result<Action> {
        let version = record_type.version();
        let forced = self.config.forced.get(version);

        let desired = resolver::resolve(self.ip_source.as_ref(), version, forced).await?;

        let zone = self.hostname.zone();
        info!("Fetching existing records for {}", self.hostname);
        let records = self.provider.list_records(zone).await?;
        debug!("Zone {} has {} record(s)", zone, records.len());

        reconcile(
            self.provider.as_ref(),
            zone,
            &records,
            self.hostname.record_name(),
            record_type,
            desired,
            self.config.ttl,
        )
        .await
    }
}
