//! DNS provider trait and core record types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::DnsError;

/// DNS record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    AAAA,
    CNAME,
    TXT,
    MX,
    NS,
    SOA,
    SRV,
    CAA,
    PTR,
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DnsRecordType::A => write!(f, "A"),
            DnsRecordType::AAAA => write!(f, "AAAA"),
            DnsRecordType::CNAME => write!(f, "CNAME"),
            DnsRecordType::TXT => write!(f, "TXT"),
            DnsRecordType::MX => write!(f, "MX"),
            DnsRecordType::NS => write!(f, "NS"),
            DnsRecordType::SOA => write!(f, "SOA"),
            DnsRecordType::SRV => write!(f, "SRV"),
            DnsRecordType::CAA => write!(f, "CAA"),
            DnsRecordType::PTR => write!(f, "PTR"),
        }
    }
}

impl DnsRecordType {
    pub fn from_str(s: &str) -> Result<Self, DnsError> {
        match s.to_uppercase().as_str() {
            "A" => Ok(DnsRecordType::A),
            "AAAA" => Ok(DnsRecordType::AAAA),
            "CNAME" => Ok(DnsRecordType::CNAME),
            "TXT" => Ok(DnsRecordType::TXT),
            "MX" => Ok(DnsRecordType::MX),
            "NS" => Ok(DnsRecordType::NS),
            "SOA" => Ok(DnsRecordType::SOA),
            "SRV" => Ok(DnsRecordType::SRV),
            "CAA" => Ok(DnsRecordType::CAA),
            "PTR" => Ok(DnsRecordType::PTR),
            _ => Err(DnsError::Validation(format!(
                "Unsupported record type: {}",
                s
            ))),
        }
    }
}

/// A hosted zone as known to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    /// Provider zone identifier with any path prefix stripped
    pub id: String,
    /// Zone name, usually with a trailing dot
    pub name: String,
}

/// A DNS record set: one name and type with one or more values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub name: String,
    pub record_type: DnsRecordType,
    /// Time to live in seconds
    pub ttl: u32,
    pub values: Vec<String>,
}

/// Operations every DNS provider backend implements.
///
/// Implementations are stateless handles over the remote provider; all zone
/// and record state lives remotely.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every hosted zone in the account.
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsError>;

    /// Look up a hosted zone by exact name.
    ///
    /// Name comparison ignores case and the trailing dot, so `example.com`
    /// finds the zone stored as `example.com.`.
    async fn find_zone(&self, domain: &str) -> Result<Option<HostedZone>, DnsError>;

    /// Create a hosted zone for the domain.
    ///
    /// Fails with [`DnsError::ZoneAlreadyExists`] when the provider already
    /// has a zone for this name.
    async fn create_zone(&self, domain: &str) -> Result<HostedZone, DnsError>;

    /// List all record sets in a zone.
    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>, DnsError>;

    /// Create a record set with a single change submission.
    async fn create_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError>;

    /// Delete a record set with a single change submission.
    ///
    /// The record must match the stored set exactly, including every value;
    /// a partial value list is rejected by the provider.
    async fn delete_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError>;
}
