//! Zone resolution and record management services

pub mod record_service;
pub mod zone_service;

pub use record_service::{DnsRecordView, RecordService, DEFAULT_TTL};
pub use zone_service::ZoneService;
