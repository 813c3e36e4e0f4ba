//! DNS record management on top of Amazon Route 53
//!
//! This crate implements the whole record-management flow: an HTTP API for
//! creating, listing, and deleting DNS records, the services behind it, and
//! a hand-rolled Route 53 client signing its own requests.
//!
//! # Layout
//!
//! - **providers**: the [`DnsProvider`] trait and the Route 53 backend
//! - **services**: zone resolution (create-on-first-use) and record operations
//! - **handlers**: axum handlers, router, and OpenAPI documentation
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use zonesmith_dns::{Route53Credentials, Route53Provider};
//! use zonesmith_dns::services::{RecordService, ZoneService};
//!
//! let provider = Arc::new(Route53Provider::new(credentials)?);
//! let zones = ZoneService::new(provider.clone());
//! let records = RecordService::new(provider, zones);
//!
//! records.create_record("app.example.com", "A", "192.0.2.1").await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod providers;
pub mod services;

// Re-export main types
pub use errors::DnsError;
pub use providers::{
    DnsProvider, DnsRecordType, HostedZone, RecordSet, Route53Credentials, Route53Provider,
};
pub use services::{DnsRecordView, RecordService, ZoneService, DEFAULT_TTL};
