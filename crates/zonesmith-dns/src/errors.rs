//! Error types for zone resolution and record management

use thiserror::Error;

/// Errors surfaced by the DNS provider and the services built on it
#[derive(Error, Debug)]
pub enum DnsError {
    #[error("Hosted zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Hosted zone already exists: {0}")]
    ZoneAlreadyExists(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
