//! Test doubles and common utilities for engine contract tests
//!
//! These doubles are in-memory, record every call, and can be told to fail
//! for specific inputs.

#![allow(dead_code)]

use elbdns_core::error::{Error, Result};
use elbdns_core::model::{ChangeRequest, HostedZone, LoadBalancerDescription, ServiceRecord};
use elbdns_core::traits::{DnsProvider, ServiceSource};
use elbdns_core::{SyncConfig, DOMAIN_NAMES_ANNOTATION};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A ServiceSource returning a fixed listing
#[derive(Clone)]
pub struct MockServiceSource {
    services: Vec<ServiceRecord>,
    fail: bool,
    /// Delay applied to every listing
    delay: Duration,
    list_call_count: Arc<AtomicUsize>,
    /// (namespace, selector) of every call
    calls: Arc<Mutex<Vec<(Option<String>, String)>>>,
}

impl MockServiceSource {
    pub fn new(services: Vec<ServiceRecord>) -> Self {
        Self {
            services,
            fail: false,
            delay: Duration::ZERO,
            list_call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A source whose listing always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Get the number of times list_services() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(Option<String>, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ServiceSource for MockServiceSource {
    async fn list_services(
        &self,
        namespace: Option<&str>,
        selector: &str,
    ) -> Result<Vec<ServiceRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((namespace.map(str::to_string), selector.to_string()));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            return Err(Error::cluster("mock", "connection refused"));
        }
        Ok(self.services.clone())
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

/// A DnsProvider backed by in-memory zones and load balancers
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    /// Zones returned for every listing
    zones: Vec<HostedZone>,
    /// Load balancers by name
    load_balancers: HashMap<String, Vec<LoadBalancerDescription>>,
    /// Zone listing names that fail with a transport error
    failing_zone_lookups: HashSet<String>,
    /// Record names whose upsert fails
    failing_upserts: HashSet<String>,
    zone_call_count: Arc<AtomicUsize>,
    describe_call_count: Arc<AtomicUsize>,
    upsert_call_count: Arc<AtomicUsize>,
    /// Every change passed to upsert_alias_record()
    changes: Arc<Mutex<Vec<ChangeRequest>>>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, id: &str, name: &str) -> Self {
        self.zones.push(HostedZone::new(id, name));
        self
    }

    pub fn with_load_balancer(mut self, name: &str, canonical_zone: &str) -> Self {
        self.load_balancers
            .entry(name.to_string())
            .or_default()
            .push(LoadBalancerDescription {
                name: name.to_string(),
                canonical_hosted_zone_id: canonical_zone.to_string(),
            });
        self
    }

    pub fn failing_zone_lookup(mut self, name: &str) -> Self {
        self.failing_zone_lookups.insert(name.to_string());
        self
    }

    pub fn failing_upsert(mut self, record_name: &str) -> Self {
        self.failing_upserts.insert(record_name.to_string());
        self
    }

    /// Get the number of times upsert_alias_record() was called
    pub fn upsert_call_count(&self) -> usize {
        self.upsert_call_count.load(Ordering::SeqCst)
    }

    pub fn zone_call_count(&self) -> usize {
        self.zone_call_count.load(Ordering::SeqCst)
    }

    pub fn describe_call_count(&self) -> usize {
        self.describe_call_count.load(Ordering::SeqCst)
    }

    /// Get the list of changes that were submitted
    pub fn changes(&self) -> Vec<ChangeRequest> {
        self.changes.lock().unwrap().clone()
    }

    /// Record names of submitted changes, in order
    pub fn upserted_records(&self) -> Vec<String> {
        self.changes()
            .into_iter()
            .map(|change| change.record_name)
            .collect()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones_by_name(&self, name: &str) -> Result<Vec<HostedZone>> {
        self.zone_call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing_zone_lookups.contains(name) {
            return Err(Error::provider("mock", "Throttling: Rate exceeded"));
        }
        Ok(self.zones.clone())
    }

    async fn describe_load_balancer(&self, name: &str) -> Result<Vec<LoadBalancerDescription>> {
        self.describe_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.load_balancers.get(name).cloned().unwrap_or_default())
    }

    async fn upsert_alias_record(&self, change: &ChangeRequest) -> Result<()> {
        self.upsert_call_count.fetch_add(1, Ordering::SeqCst);
        if self.failing_upserts.contains(&change.record_name) {
            return Err(Error::provider("mock", "InvalidChangeBatch"));
        }
        self.changes.lock().unwrap().push(change.clone());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// ELB hostname used across tests; its load balancer name is `myelb`
pub const ELB_HOSTNAME: &str = "myelb-1234567890.eu-west-1.elb.amazonaws.com";

/// Canonical hosted zone of eu-west-1 Classic ELBs
pub const ELB_ZONE_ID: &str = "Z32O12XQLNTSW2";

/// A managed service pointing `domains` at [`ELB_HOSTNAME`]
pub fn managed_service(name: &str, domains: &str) -> ServiceRecord {
    ServiceRecord::new(name, "default")
        .with_annotation(DOMAIN_NAMES_ANNOTATION, domains)
        .with_ingress_hostname(ELB_HOSTNAME)
}

/// A provider knowing `myelb` and the `example.com.` / `sub.example.com.` zones
pub fn standard_provider() -> MockDnsProvider {
    MockDnsProvider::new()
        .with_load_balancer("myelb", ELB_ZONE_ID)
        .with_zone("/hostedzone/EXAMPLE", "example.com.")
        .with_zone("/hostedzone/SUBEXAMPLE", "sub.example.com.")
}

/// Helper to create a minimal SyncConfig for testing
pub fn minimal_config() -> SyncConfig {
    SyncConfig {
        event_channel_capacity: 100,
        ..SyncConfig::default()
    }
}
