//! Test doubles and common utilities for contract tests
//!
//! This module provides an in-memory zone standing in for the DNS provider
//! and a static IP source, both recording every call they receive.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, IpSource, IpVersion};
use ddns_core::{DdnsConfig, DnsRecord, RecordRequest};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A call made against the in-memory provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    List { zone: String },
    Create { zone: String, request: RecordRequest },
    Edit { zone: String, id: String, request: RecordRequest },
    Delete { zone: String, id: String },
}

impl ProviderCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ProviderCall::List { .. })
    }
}

/// Which call should fail, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    List,
    Create,
    Edit,
    Delete,
}

/// An in-memory DNS provider holding one zone's record set
///
/// Cloning shares the zone, the call log and the failure switch, so a test
/// can hand one clone to the engine and inspect another.
#[derive(Clone)]
pub struct InMemoryProvider {
    records: Arc<Mutex<Vec<DnsRecord>>>,
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    next_id: Arc<AtomicUsize>,
    fail_on: Arc<Mutex<FailOn>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1000)),
            fail_on: Arc::new(Mutex::new(FailOn::Nothing)),
        }
    }

    /// Make the given call fail from now on
    pub fn fail_on(&self, fail_on: FailOn) {
        *self.fail_on.lock().unwrap() = fail_on;
    }

    /// Current record set
    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Mutating calls received so far
    pub fn mutations(&self) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(ProviderCall::is_mutation)
            .collect()
    }

    /// Forget recorded calls, keep the zone
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record_call(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self, op: FailOn) -> Result<()> {
        if *self.fail_on.lock().unwrap() == op {
            return Err(Error::provider("memory", format!("{:?} rejected", op)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsProvider for InMemoryProvider {
    async fn list_records(&self, zone: &str) -> Result<Vec<DnsRecord>> {
        self.record_call(ProviderCall::List {
            zone: zone.to_string(),
        });
        self.check_failure(FailOn::List)?;
        Ok(self.records())
    }

    async fn create_record(&self, zone: &str, request: &RecordRequest) -> Result<DnsRecord> {
        self.record_call(ProviderCall::Create {
            zone: zone.to_string(),
            request: request.clone(),
        });
        self.check_failure(FailOn::Create)?;

        let record = DnsRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            record_type: request.record_type.as_str().to_string(),
            name: request.name.clone(),
            data: request.data.clone(),
            ttl: request.ttl,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn edit_record(
        &self,
        zone: &str,
        record_id: &str,
        request: &RecordRequest,
    ) -> Result<DnsRecord> {
        self.record_call(ProviderCall::Edit {
            zone: zone.to_string(),
            id: record_id.to_string(),
            request: request.clone(),
        });
        self.check_failure(FailOn::Edit)?;

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::not_found(format!("record {}", record_id)))?;
        record.record_type = request.record_type.as_str().to_string();
        record.name = request.name.clone();
        record.data = request.data.clone();
        record.ttl = request.ttl;
        Ok(record.clone())
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        self.record_call(ProviderCall::Delete {
            zone: zone.to_string(),
            id: record_id.to_string(),
        });
        self.check_failure(FailOn::Delete)?;

        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(Error::not_found(format!("record {}", record_id)));
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// An IP source answering from a fixed table
#[derive(Clone)]
pub struct StaticIpSource {
    answers: Arc<Mutex<HashMap<IpVersion, Option<IpAddr>>>>,
    failing: Arc<Mutex<Option<IpVersion>>>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(ipv4: Option<&str>, ipv6: Option<&str>) -> Self {
        let mut answers = HashMap::new();
        answers.insert(IpVersion::V4, ipv4.map(|s| s.parse().unwrap()));
        answers.insert(IpVersion::V6, ipv6.map(|s| s.parse().unwrap()));
        Self {
            answers: Arc::new(Mutex::new(answers)),
            failing: Arc::new(Mutex::new(None)),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make lookups for `version` fail
    pub fn fail_for(&self, version: IpVersion) {
        *self.failing.lock().unwrap() = Some(version);
    }

    /// Change the answer for `version`
    pub fn set(&self, version: IpVersion, ip: Option<&str>) {
        self.answers
            .lock()
            .unwrap()
            .insert(version, ip.map(|s| s.parse().unwrap()));
    }

    /// Number of lookups performed
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self, version: IpVersion) -> Result<Option<IpAddr>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if *self.failing.lock().unwrap() == Some(version) {
            return Err(Error::address_resolution(format!("{} echo unreachable", version)));
        }
        Ok(self.answers.lock().unwrap().get(&version).copied().flatten())
    }

    fn source_name(&self) -> &'static str {
        "static"
    }
}

/// Build a record the way the provider would list it
pub fn record(id: &str, name: &str, record_type: &str, data: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        record_type: record_type.to_string(),
        name: name.to_string(),
        data: data.to_string(),
        ttl: 60,
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(hostname: &str) -> DdnsConfig {
    DdnsConfig::new(hostname, "test-token")
}
