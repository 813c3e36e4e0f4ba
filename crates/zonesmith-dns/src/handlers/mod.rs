//! HTTP handlers for DNS record management
//!
//! Three endpoints: create a record (creating its hosted zone on first
//! use), list every record across all zones, and delete a record set.
//! Failures are reported as RFC 7807 problem responses, never as 2xx.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use zonesmith_core::problemdetails::{self, Problem};
use zonesmith_core::ProblemDetails;

use crate::errors::DnsError;
use crate::services::{DnsRecordView, RecordService};

/// Application state for the DNS handlers
pub struct DnsAppState {
    pub record_service: Arc<RecordService>,
}

// ========================================
// Request/Response Types
// ========================================

/// Request to create a DNS record
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDnsRecordRequest {
    /// Domain the record is created for
    #[serde(default)]
    #[schema(example = "app.example.com")]
    pub domain: String,
    /// Record type
    #[serde(default, rename = "type")]
    #[schema(example = "A")]
    pub record_type: String,
    /// Record value
    #[serde(default)]
    #[schema(example = "192.0.2.1")]
    pub value: String,
}

/// Query parameters for record deletion
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteDnsRecordQuery {
    /// Record type
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    /// Comma-joined list of every value in the record set
    pub values: Option<String>,
}

/// Outcome message for create and delete operations
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DnsMessageResponse {
    #[schema(example = "DNS record created successfully")]
    pub message: String,
}

// ========================================
// Error Handling
// ========================================

impl From<DnsError> for Problem {
    fn from(error: DnsError) -> Self {
        match error {
            DnsError::ZoneNotFound(zone) => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title("Hosted Zone Not Found")
                .with_detail(format!("Hosted zone for {} not found", zone)),
            DnsError::RecordNotFound(record) => problemdetails::new(StatusCode::NOT_FOUND)
                .with_title("Record Not Found")
                .with_detail(record),
            DnsError::ZoneAlreadyExists(zone) => problemdetails::new(StatusCode::CONFLICT)
                .with_title("Hosted Zone Already Exists")
                .with_detail(zone),
            DnsError::Validation(msg) => problemdetails::new(StatusCode::BAD_REQUEST)
                .with_title("Validation Error")
                .with_detail(msg),
            DnsError::PermissionDenied(msg) => problemdetails::new(StatusCode::FORBIDDEN)
                .with_title("Permission Denied")
                .with_detail(msg),
            DnsError::RateLimited(msg) => problemdetails::new(StatusCode::TOO_MANY_REQUESTS)
                .with_title("Rate Limited")
                .with_detail(msg),
            DnsError::ApiError(msg) => problemdetails::new(StatusCode::BAD_GATEWAY)
                .with_title("DNS Provider Error")
                .with_detail(msg),
            DnsError::Request(e) => problemdetails::new(StatusCode::BAD_GATEWAY)
                .with_title("DNS Provider Unreachable")
                .with_detail(e.to_string()),
            DnsError::Serialization(e) => {
                problemdetails::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_title("Internal Error")
                    .with_detail(e.to_string())
            }
        }
    }
}

// ========================================
// Handlers
// ========================================

/// Create a DNS record
///
/// Resolves the hosted zone for the domain, creating the zone on first use,
/// then submits a single CREATE change with a 300 second TTL.
#[utoipa::path(
    tag = "DNS Records",
    post,
    path = "/api/dns/create",
    request_body = CreateDnsRecordRequest,
    responses(
        (status = 200, description = "DNS record created", body = DnsMessageResponse),
        (status = 400, description = "Missing or malformed domain, type, or value", body = ProblemDetails),
        (status = 403, description = "Provider credentials rejected", body = ProblemDetails),
        (status = 502, description = "DNS provider rejected the change", body = ProblemDetails),
    )
)]
async fn create_dns_record(
    State(state): State<Arc<DnsAppState>>,
    Json(request): Json<CreateDnsRecordRequest>,
) -> Result<impl IntoResponse, Problem> {
    state
        .record_service
        .create_record(&request.domain, &request.record_type, &request.value)
        .await?;

    Ok(Json(DnsMessageResponse {
        message: "DNS record created successfully".to_string(),
    }))
}

/// List all DNS records
///
/// Flattens every record set across every hosted zone into display rows,
/// skipping the SOA and NS infrastructure records.
#[utoipa::path(
    tag = "DNS Records",
    get,
    path = "/api/dns",
    responses(
        (status = 200, description = "All DNS records", body = Vec<DnsRecordView>),
        (status = 403, description = "Provider credentials rejected", body = ProblemDetails),
        (status = 502, description = "DNS provider request failed", body = ProblemDetails),
    )
)]
async fn list_dns_records(
    State(state): State<Arc<DnsAppState>>,
) -> Result<impl IntoResponse, Problem> {
    let records = state.record_service.list_all_records().await?;
    Ok(Json(records))
}

/// Delete a DNS record
///
/// The values parameter must list every value in the stored record set,
/// comma-joined; a partial list is rejected by the provider.
#[utoipa::path(
    tag = "DNS Records",
    delete,
    path = "/api/dns/delete/{domain}",
    params(
        ("domain" = String, Path, description = "Domain of the record set"),
        ("type" = String, Query, description = "Record type"),
        ("values" = String, Query, description = "Comma-joined record values"),
    ),
    responses(
        (status = 200, description = "DNS record deleted", body = DnsMessageResponse),
        (status = 400, description = "Missing or malformed type or values", body = ProblemDetails),
        (status = 404, description = "Hosted zone or record not found", body = ProblemDetails),
        (status = 502, description = "DNS provider rejected the change", body = ProblemDetails),
    )
)]
async fn delete_dns_record(
    State(state): State<Arc<DnsAppState>>,
    Path(domain): Path<String>,
    Query(query): Query<DeleteDnsRecordQuery>,
) -> Result<impl IntoResponse, Problem> {
    state
        .record_service
        .delete_record(
            &domain,
            query.record_type.as_deref().unwrap_or(""),
            query.values.as_deref().unwrap_or(""),
        )
        .await?;

    Ok(Json(DnsMessageResponse {
        message: "DNS record deleted successfully".to_string(),
    }))
}

// ========================================
// Router Configuration
// ========================================

/// Configure DNS record routes
pub fn configure_routes() -> Router<Arc<DnsAppState>> {
    Router::new()
        .route("/api/dns/create", post(create_dns_record))
        .route("/api/dns", get(list_dns_records))
        .route("/api/dns/delete/{domain}", delete(delete_dns_record))
}

// ========================================
// OpenAPI Documentation
// ========================================

#[derive(OpenApi)]
#[openapi(
    paths(create_dns_record, list_dns_records, delete_dns_record),
    components(schemas(
        CreateDnsRecordRequest,
        DnsMessageResponse,
        DnsRecordView,
        ProblemDetails,
    )),
    tags(
        (name = "DNS Records", description = "DNS record management endpoints")
    )
)]
pub struct DnsApiDoc;
