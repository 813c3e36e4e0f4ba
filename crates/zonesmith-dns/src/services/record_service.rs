//! Record creation, deletion, and the flattened record listing

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::errors::DnsError;
use crate::providers::{DnsProvider, DnsRecordType, RecordSet};
use crate::services::zone_service::ZoneService;

/// TTL applied to every created record, in seconds
pub const DEFAULT_TTL: u32 = 300;

/// One row of the flattened record listing.
///
/// Multi-value record sets are collapsed into a single display value; record
/// names are reported exactly as the provider stores them, trailing dot
/// included.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordView {
    /// Hosted zone the record lives in
    #[schema(example = "Z1234567890ABC")]
    pub hosted_zone_id: String,
    /// Record name as stored by the provider
    #[schema(example = "www.example.com.")]
    pub domain: String,
    /// Record type
    #[serde(rename = "type")]
    #[schema(example = "A")]
    pub record_type: String,
    /// Record values joined with ", "
    #[schema(example = "192.0.2.1")]
    pub value: String,
}

/// Service for creating, deleting, and listing DNS records
#[derive(Clone)]
pub struct RecordService {
    provider: Arc<dyn DnsProvider>,
    zones: ZoneService,
}

impl RecordService {
    pub fn new(provider: Arc<dyn DnsProvider>, zones: ZoneService) -> Self {
        Self { provider, zones }
    }

    /// Create a DNS record, creating the hosted zone on first use.
    pub async fn create_record(
        &self,
        domain: &str,
        record_type: &str,
        value: &str,
    ) -> Result<(), DnsError> {
        let domain = Self::require_field(domain, "domain")?;
        let record_type = DnsRecordType::from_str(record_type)?;
        let value = Self::require_field(value, "value")?;

        let zone = self.zones.resolve(&domain).await?;

        let record = RecordSet {
            name: domain.clone(),
            record_type,
            ttl: DEFAULT_TTL,
            values: vec![value],
        };

        self.provider.create_record(&zone.id, &record).await?;

        info!(
            "Created {} record for {} in zone {}",
            record_type, domain, zone.id
        );
        Ok(())
    }

    /// Delete a DNS record set.
    ///
    /// `values` is the comma-joined value list; it must reconstruct the full
    /// stored set or the provider rejects the change. The zone is never
    /// created on this path.
    pub async fn delete_record(
        &self,
        domain: &str,
        record_type: &str,
        values: &str,
    ) -> Result<(), DnsError> {
        let domain = Self::require_field(domain, "domain")?;
        let record_type = DnsRecordType::from_str(record_type)?;
        let values = Self::split_values(values)?;

        let zone = self
            .zones
            .find(&domain)
            .await?
            .ok_or_else(|| DnsError::ZoneNotFound(domain.clone()))?;

        let record = RecordSet {
            name: domain.clone(),
            record_type,
            ttl: DEFAULT_TTL,
            values,
        };

        self.provider.delete_record(&zone.id, &record).await?;

        info!(
            "Deleted {} record for {} in zone {}",
            record_type, domain, zone.id
        );
        Ok(())
    }

    /// List every record across all hosted zones.
    ///
    /// SOA and NS sets are infrastructure records that exist in every zone,
    /// so they are skipped.
    pub async fn list_all_records(&self) -> Result<Vec<DnsRecordView>, DnsError> {
        let zones = self.provider.list_zones().await?;
        let zone_count = zones.len();

        let mut records = Vec::new();
        for zone in zones {
            let sets = self.provider.list_records(&zone.id).await?;
            for set in sets {
                if matches!(set.record_type, DnsRecordType::SOA | DnsRecordType::NS) {
                    continue;
                }

                records.push(DnsRecordView {
                    hosted_zone_id: zone.id.clone(),
                    domain: set.name,
                    record_type: set.record_type.to_string(),
                    value: set.values.join(", "),
                });
            }
        }

        info!(
            "Listed {} DNS records across {} hosted zones",
            records.len(),
            zone_count
        );
        Ok(records)
    }

    /// Reject missing or blank request fields
    fn require_field(value: &str, field: &str) -> Result<String, DnsError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DnsError::Validation(format!(
                "Missing required field: {}",
                field
            )));
        }
        Ok(value.to_string())
    }

    /// Split a comma-joined value list back into individual values
    fn split_values(values: &str) -> Result<Vec<String>, DnsError> {
        let values: Vec<String> = values
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() {
            return Err(DnsError::Validation(
                "Missing required field: values".to_string(),
            ));
        }

        Ok(values)
    }
}
