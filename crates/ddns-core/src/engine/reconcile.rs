//! Reconciliation decision engine
//!
//! One pass compares the desired address of a single family with the
//! matching record in the zone and performs at most one mutating call:
//!
//! | record exists | address known | decision                          |
//! |---------------|---------------|-----------------------------------|
//! | no            | no            | nothing to do                     |
//! | no            | yes           | create                            |
//! | yes           | no            | delete (address lost)             |
//! | yes           | yes           | unchanged if equal, else update   |
//!
//! Running a pass twice with the same desired address performs no mutating
//! call the second time.

use crate::error::Result;
use crate::record::{DnsRecord, RecordRequest, RecordType, find_record};
use crate::traits::DnsProvider;
use std::net::IpAddr;
use tracing::info;

/// What a pass intends to do, before any call is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<'a> {
    /// No record and no address
    Nothing,
    /// Record already points at the desired address
    Keep(&'a DnsRecord, IpAddr),
    /// No record yet, create one
    Create(IpAddr),
    /// Record points elsewhere, edit it
    Update(&'a DnsRecord, IpAddr),
    /// Address is gone, remove the stale record
    Delete(&'a DnsRecord),
}

/// Decide the action for one family
///
/// Pure function over the decision table; no I/O.
pub fn decide(existing: Option<&DnsRecord>, desired: Option<IpAddr>) -> Decision<'_> {
    match (existing, desired) {
        (None, None) => Decision::Nothing,
        (None, Some(ip)) => Decision::Create(ip),
        (Some(record), None) => Decision::Delete(record),
        (Some(record), Some(ip)) if record.points_to(ip) => Decision::Keep(record, ip),
        (Some(record), Some(ip)) => Decision::Update(record, ip),
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Neither a record nor an address existed
    NoRecordNoAddress,

    /// Record already matched the desired address
    Unchanged {
        record_id: String,
        address: IpAddr,
    },

    /// Record was created
    Created {
        record: DnsRecord,
        address: IpAddr,
    },

    /// Record was edited in place
    Updated {
        record_id: String,
        previous: String,
        address: IpAddr,
    },

    /// Stale record was removed
    Deleted {
        record_id: String,
        previous: String,
    },
}

impl Action {
    /// Whether this outcome required a mutating provider call
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Action::Created { .. } | Action::Updated { .. } | Action::Deleted { .. }
        )
    }
}

/// Reconcile one (name, type) pair in `zone`
///
/// Looks up the first matching record in `records`, decides, and executes
/// the decision against `provider`. Provider errors propagate unchanged;
/// nothing is retried or rolled back.
pub async fn reconcile(
    provider: &dyn DnsProvider,
    zone: &str,
    records: &[DnsRecord],
    name: &str,
    record_type: RecordType,
    desired: Option<IpAddr>,
    ttl: u32,
) -> Result<Action> {
    let version = record_type.version();
    let existing = find_record(records, name, record_type);

    match decide(existing, desired) {
        Decision::Nothing => {
            info!("No {} record or address for {}", version, name);
            Ok(Action::NoRecordNoAddress)
        }
        Decision::Keep(record, ip) => {
            info!("No changes for {}: {} already points to {}", version, name, ip);
            Ok(Action::Unchanged {
                record_id: record.id.clone(),
                address: ip,
            })
        }
        Decision::Create(ip) => {
            info!("Creating new {} record {} -> {}", version, name, ip);
            let request = RecordRequest::for_address(name, ip, ttl);
            let record = provider.create_record(zone, &request).await?;
            Ok(Action::Created {
                record,
                address: ip,
            })
        }
        Decision::Update(record, ip) => {
            info!(
                "Updating existing {} record {}: {} -> {}",
                version, name, record.data, ip
            );
            let request = RecordRequest::for_address(name, ip, ttl);
            provider.edit_record(zone, &record.id, &request).await?;
            Ok(Action::Updated {
                record_id: record.id.clone(),
                previous: record.data.clone(),
                address: ip,
            })
        }
        Decision::Delete(record) => {
            info!(
                "Deleting outdated {} record {}: {} (no address)",
                version, name, record.data
            );
            provider.delete_record(zone, &record.id).await?;
            Ok(Action::Deleted {
                record_id: record.id.clone(),
                previous: record.data.clone(),
            })
        }
    }
}
