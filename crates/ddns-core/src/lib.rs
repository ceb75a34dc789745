// # ddns-core
//
// Core library for the one-shot DDNS updater.
//
// ## Architecture Overview
//
// This library reconciles the A/AAAA records of one hostname with the
// caller's current public addresses:
// - **Hostname**: Splits a hostname into zone and record name
// - **IpSource**: Trait for discovering the public address per family
// - **DnsProvider**: Trait for listing and mutating records in a zone
// - **reconcile**: Decides create / update / delete / keep for one family
// - **DdnsEngine**: Runs one reconciliation pass per requested family
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from the API clients
// 2. **Stateless**: Nothing is persisted between runs
// 3. **Idempotency**: A second run against unchanged addresses makes no mutating call
// 4. **Library-First**: The binary is a thin wrapper around `DdnsEngine`
// 5. **Fail-Fast**: The first error ends the run, nothing is retried

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod hostname;
pub mod record;
pub mod resolver;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, IpVersion};
pub use engine::{Action, DdnsEngine, RunReport};
pub use config::{DdnsConfig, FamilySelection, ForcedAddresses, IpSourceConfig, ProviderConfig};
pub use error::{Error, Result};
pub use hostname::Hostname;
pub use record::{DnsRecord, RecordRequest, RecordType, find_record};
