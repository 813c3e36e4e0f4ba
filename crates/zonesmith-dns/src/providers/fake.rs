//! In-memory DNS provider used by service and handler tests.
//!
//! Mimics the observable behavior of the real backend: zone names carry a
//! trailing dot, zone creation rejects duplicates, and deletes require the
//! record set to match exactly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{DnsProvider, HostedZone, RecordSet};
use crate::errors::DnsError;

#[derive(Default)]
pub struct FakeDnsProvider {
    zones: Mutex<Vec<HostedZone>>,
    records: Mutex<Vec<(String, RecordSet)>>,
    fail_requests: AtomicBool,
}

impl FakeDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(id: &str, name: &str) -> Self {
        let provider = Self::default();
        provider.add_zone(id, name);
        provider
    }

    pub fn add_zone(&self, id: &str, name: &str) {
        self.zones.lock().unwrap().push(HostedZone {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    pub fn seed_record(&self, zone_id: &str, record: RecordSet) {
        self.records
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record));
    }

    /// Make every provider call fail with an API error
    pub fn fail_requests(&self) {
        self.fail_requests.store(true, Ordering::SeqCst);
    }

    pub fn zone_count(&self) -> usize {
        self.zones.lock().unwrap().len()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn fqdn(domain: &str) -> String {
        format!("{}.", domain.trim_end_matches('.').to_lowercase())
    }

    fn check_available(&self) -> Result<(), DnsError> {
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(DnsError::ApiError("simulated provider outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for FakeDnsProvider {
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsError> {
        self.check_available()?;
        Ok(self.zones.lock().unwrap().clone())
    }

    async fn find_zone(&self, domain: &str) -> Result<Option<HostedZone>, DnsError> {
        self.check_available()?;
        let wanted = Self::fqdn(domain);
        Ok(self
            .zones
            .lock()
            .unwrap()
            .iter()
            .find(|z| Self::fqdn(&z.name) == wanted)
            .cloned())
    }

    async fn create_zone(&self, domain: &str) -> Result<HostedZone, DnsError> {
        self.check_available()?;
        let mut zones = self.zones.lock().unwrap();
        let name = Self::fqdn(domain);

        if zones.iter().any(|z| Self::fqdn(&z.name) == name) {
            return Err(DnsError::ZoneAlreadyExists(name));
        }

        let zone = HostedZone {
            id: format!("ZFAKE{}", zones.len() + 1),
            name,
        };
        zones.push(zone.clone());
        Ok(zone)
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>, DnsError> {
        self.check_available()?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(z, _)| z == zone_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn create_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError> {
        self.check_available()?;
        self.records
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record.clone()));
        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError> {
        self.check_available()?;
        let mut records = self.records.lock().unwrap();

        let position = records.iter().position(|(z, r)| {
            z == zone_id
                && Self::fqdn(&r.name) == Self::fqdn(&record.name)
                && r.record_type == record.record_type
                && r.ttl == record.ttl
                && r.values == record.values
        });

        match position {
            Some(index) => {
                records.remove(index);
                Ok(())
            }
            None => Err(DnsError::RecordNotFound(format!(
                "Tried to delete resource record set [name='{}', type='{}'] but it was not found",
                Self::fqdn(&record.name),
                record.record_type
            ))),
        }
    }
}
