//! DNS provider backends
//!
//! The [`DnsProvider`] trait abstracts the remote DNS API so services can be
//! tested against an in-memory implementation. Route 53 is the only real
//! backend.

pub mod route53;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use route53::{Route53Credentials, Route53Provider};
pub use types::{DnsProvider, DnsRecordType, HostedZone, RecordSet};
