//! AWS Route 53 DNS provider implementation
//!
//! Talks to the Route 53 REST API directly and signs every request with
//! AWS Signature V4. Requires IAM credentials with these permissions:
//! - route53:ListHostedZones
//! - route53:ListHostedZonesByName
//! - route53:CreateHostedZone
//! - route53:ListResourceRecordSets
//! - route53:ChangeResourceRecordSets

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::types::{DnsProvider, DnsRecordType, HostedZone, RecordSet};
use crate::errors::DnsError;

const AWS_ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";
// Route 53 is a global service; every request is signed for us-east-1
// regardless of where the caller runs
const ROUTE53_SIGNING_REGION: &str = "us-east-1";
const ROUTE53_XMLNS: &str = "https://route53.amazonaws.com/doc/2013-04-01/";

/// AWS IAM credentials for Route 53
#[derive(Debug, Clone)]
pub struct Route53Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// AWS Route 53 DNS provider
pub struct Route53Provider {
    client: Client,
    credentials: Route53Credentials,
    base_url: String,
    host: String,
}

/// AWS Signature V4 signing implementation
mod aws_signing {
    use chrono::Utc;
    use hmac::{Hmac, Mac};
    use sha2::{Digest, Sha256};

    type HmacSha256 = Hmac<Sha256>;

    pub fn sign_request(
        method: &str,
        uri: &str,
        query_string: &str,
        headers: &[(&str, &str)],
        payload: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
        service: &str,
    ) -> (String, String, String) {
        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        // Create canonical request
        let payload_hash = hex::encode(Sha256::digest(payload.as_bytes()));

        let mut signed_headers: Vec<&str> = headers.iter().map(|(k, _)| *k).collect();
        signed_headers.sort();
        let signed_headers_str = signed_headers.join(";");

        let mut canonical_headers = String::new();
        let mut sorted_headers: Vec<_> = headers.to_vec();
        sorted_headers.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in &sorted_headers {
            canonical_headers.push_str(&format!("{}:{}\n", key.to_lowercase(), value.trim()));
        }

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method, uri, query_string, canonical_headers, signed_headers_str, payload_hash
        );

        let canonical_request_hash = hex::encode(Sha256::digest(canonical_request.as_bytes()));

        // Create string to sign
        let credential_scope = format!("{}/{}/{}/aws4_request", date_stamp, region, service);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date, credential_scope, canonical_request_hash
        );

        // Calculate signature
        let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), &date_stamp);
        let k_region = hmac_sha256(&k_date, region);
        let k_service = hmac_sha256(&k_region, service);
        let k_signing = hmac_sha256(&k_service, "aws4_request");
        let signature = hex::encode(hmac_sha256(&k_signing, &string_to_sign));

        // Create authorization header
        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            access_key, credential_scope, signed_headers_str, signature
        );

        (authorization, amz_date, payload_hash)
    }

    fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(data.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Route 53 API response structures.
///
/// ListHostedZones and ListHostedZonesByName share the same envelope.
#[derive(Debug, Deserialize)]
struct ListHostedZonesResponse {
    #[serde(rename = "HostedZones")]
    hosted_zones: Option<HostedZonesWrapper>,
}

#[derive(Debug, Deserialize)]
struct HostedZonesWrapper {
    // An empty list arrives as a present-but-childless container element
    #[serde(rename = "HostedZone", default)]
    hosted_zone: Vec<HostedZoneElement>,
}

#[derive(Debug, Deserialize)]
struct HostedZoneElement {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreateHostedZoneResponse {
    #[serde(rename = "HostedZone")]
    hosted_zone: HostedZoneElement,
}

#[derive(Debug, Deserialize)]
struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets")]
    resource_record_sets: Option<ResourceRecordSetsWrapper>,
}

#[derive(Debug, Deserialize)]
struct ResourceRecordSetsWrapper {
    #[serde(rename = "ResourceRecordSet", default)]
    resource_record_set: Vec<ResourceRecordSetElement>,
}

#[derive(Debug, Deserialize, Clone)]
struct ResourceRecordSetElement {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "TTL")]
    ttl: Option<u32>,
    #[serde(rename = "ResourceRecords")]
    resource_records: Option<ResourceRecordsWrapper>,
}

#[derive(Debug, Deserialize, Clone)]
struct ResourceRecordsWrapper {
    #[serde(rename = "ResourceRecord")]
    resource_record: Vec<ResourceRecord>,
}

#[derive(Debug, Deserialize, Clone)]
struct ResourceRecord {
    #[serde(rename = "Value")]
    value: String,
}

/// Standard Route 53 error envelope
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Error")]
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

/// Rejected change batches come back in their own envelope, not the
/// standard ErrorResponse one
#[derive(Debug, Deserialize)]
struct InvalidChangeBatchResponse {
    #[serde(rename = "Messages")]
    messages: InvalidChangeBatchMessages,
}

#[derive(Debug, Deserialize)]
struct InvalidChangeBatchMessages {
    #[serde(rename = "Message")]
    message: Vec<String>,
}

/// Hosted zone creation request
#[derive(Debug, Serialize)]
struct CreateHostedZoneRequest {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "CallerReference")]
    caller_reference: String,
}

/// Change batch request for Route 53
#[derive(Debug, Serialize)]
struct ChangeResourceRecordSetsRequest {
    #[serde(rename = "ChangeBatch")]
    change_batch: ChangeBatch,
}

#[derive(Debug, Serialize)]
struct ChangeBatch {
    #[serde(rename = "Comment")]
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(rename = "Changes")]
    changes: Changes,
}

#[derive(Debug, Serialize)]
struct Changes {
    #[serde(rename = "Change")]
    change: Vec<Change>,
}

#[derive(Debug, Serialize)]
struct Change {
    #[serde(rename = "Action")]
    action: String,
    #[serde(rename = "ResourceRecordSet")]
    resource_record_set: ChangeResourceRecordSet,
}

#[derive(Debug, Serialize)]
struct ChangeResourceRecordSet {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    record_type: String,
    #[serde(rename = "TTL")]
    ttl: u32,
    #[serde(rename = "ResourceRecords")]
    resource_records: ChangeResourceRecords,
}

#[derive(Debug, Serialize)]
struct ChangeResourceRecords {
    #[serde(rename = "ResourceRecord")]
    resource_record: Vec<ChangeResourceRecord>,
}

#[derive(Debug, Serialize)]
struct ChangeResourceRecord {
    #[serde(rename = "Value")]
    value: String,
}

impl Route53Provider {
    /// Create a provider against the public Route 53 endpoint
    pub fn new(credentials: Route53Credentials) -> Result<Self, DnsError> {
        Self::with_endpoint(credentials, AWS_ROUTE53_ENDPOINT)
    }

    /// Create a provider against a custom endpoint. Tests point this at a
    /// local mock server.
    pub fn with_endpoint(
        credentials: Route53Credentials,
        endpoint: &str,
    ) -> Result<Self, DnsError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| DnsError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = endpoint.trim_end_matches('/').to_string();
        let host = base_url
            .split("://")
            .nth(1)
            .unwrap_or(base_url.as_str())
            .to_string();

        Ok(Self {
            client,
            credentials,
            base_url,
            host,
        })
    }

    /// Make a signed request to the Route 53 API
    async fn api_request(
        &self,
        method: &str,
        path: &str,
        query: &str,
        body: Option<&str>,
    ) -> Result<String, DnsError> {
        let url = if query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query)
        };
        let payload = body.unwrap_or("");

        let headers = vec![("host", self.host.as_str())];

        let (authorization, amz_date, _content_hash) = aws_signing::sign_request(
            method,
            path,
            query,
            &headers,
            payload,
            &self.credentials.access_key_id,
            &self.credentials.secret_access_key,
            ROUTE53_SIGNING_REGION,
            "route53",
        );

        let mut request = match method {
            "GET" => self.client.get(&url),
            "POST" => self.client.post(&url),
            _ => {
                return Err(DnsError::ApiError(format!(
                    "Unsupported method: {}",
                    method
                )))
            }
        };

        request = request
            .header("Host", self.host.as_str())
            .header("X-Amz-Date", amz_date)
            .header("Authorization", authorization)
            .header("Content-Type", "application/xml");

        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        debug!("Route53 API request: {} {}", method, path);

        let response = request.send().await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            return Err(Self::map_error(status, &response_body));
        }

        Ok(response_body)
    }

    /// Map a Route 53 error response onto the error taxonomy.
    ///
    /// Tries the standard ErrorResponse envelope first, then the separate
    /// InvalidChangeBatch envelope used by rejected change batches.
    fn map_error(status: reqwest::StatusCode, body: &str) -> DnsError {
        if let Ok(parsed) = quick_xml::de::from_str::<ErrorResponse>(body) {
            let message = parsed.error.message;
            return match parsed.error.code.as_str() {
                "NoSuchHostedZone" => DnsError::ZoneNotFound(message),
                "HostedZoneAlreadyExists" | "ConflictingDomainExists" => {
                    DnsError::ZoneAlreadyExists(message)
                }
                "Throttling" | "PriorRequestNotComplete" => DnsError::RateLimited(message),
                "AccessDenied" | "SignatureDoesNotMatch" | "InvalidClientTokenId"
                | "UnrecognizedClientException" => DnsError::PermissionDenied(message),
                _ => DnsError::ApiError(format!("Route53 returned {}: {}", status, message)),
            };
        }

        if let Ok(parsed) = quick_xml::de::from_str::<InvalidChangeBatchResponse>(body) {
            let message = parsed.messages.message.join("; ");
            // Deleting a record set that does not exist surfaces here
            if message.contains("but it was not found") {
                return DnsError::RecordNotFound(message);
            }
            return DnsError::ApiError(format!("Route53 returned {}: {}", status, message));
        }

        DnsError::ApiError(format!("Route53 returned {}: {}", status, body))
    }

    /// Normalize domain name (remove trailing dot, lowercase)
    fn normalize_domain(domain: &str) -> String {
        domain.trim_end_matches('.').to_lowercase()
    }

    /// Route 53 zone and record names carry a trailing dot
    fn build_fqdn(name: &str) -> String {
        if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{}.", name)
        }
    }

    /// Strip the /hostedzone/ path prefix off a zone ID
    fn into_zone(element: HostedZoneElement) -> HostedZone {
        HostedZone {
            id: element.id.trim_start_matches("/hostedzone/").to_string(),
            name: element.name,
        }
    }

    /// Convert a record set element, skipping alias sets and unknown types
    fn convert_record_set(element: ResourceRecordSetElement) -> Option<RecordSet> {
        let record_type = DnsRecordType::from_str(&element.record_type).ok()?;
        let values: Vec<String> = element
            .resource_records?
            .resource_record
            .into_iter()
            .map(|r| r.value)
            .collect();

        Some(RecordSet {
            name: element.name,
            record_type,
            ttl: element.ttl.unwrap_or(300),
            values,
        })
    }

    /// Serialize a single-change batch for ChangeResourceRecordSets
    fn change_batch_body(
        action: &str,
        comment: &str,
        record: &RecordSet,
    ) -> Result<String, DnsError> {
        let change_request = ChangeResourceRecordSetsRequest {
            change_batch: ChangeBatch {
                comment: Some(comment.to_string()),
                changes: Changes {
                    change: vec![Change {
                        action: action.to_string(),
                        resource_record_set: ChangeResourceRecordSet {
                            name: Self::build_fqdn(&record.name),
                            record_type: record.record_type.to_string(),
                            ttl: record.ttl,
                            resource_records: ChangeResourceRecords {
                                resource_record: record
                                    .values
                                    .iter()
                                    .map(|value| ChangeResourceRecord {
                                        value: value.clone(),
                                    })
                                    .collect(),
                            },
                        },
                    }],
                },
            },
        };

        let body = quick_xml::se::to_string(&change_request)
            .map_err(|e| DnsError::ApiError(format!("Failed to serialize request: {}", e)))?;

        // quick-xml does not emit namespaces, add it by hand
        Ok(body.replace(
            "<ChangeResourceRecordSetsRequest>",
            &format!("<ChangeResourceRecordSetsRequest xmlns=\"{}\">", ROUTE53_XMLNS),
        ))
    }

    /// Serialize a CreateHostedZone request
    fn create_zone_body(domain: &str, caller_reference: &str) -> Result<String, DnsError> {
        let request = CreateHostedZoneRequest {
            name: Self::build_fqdn(domain),
            caller_reference: caller_reference.to_string(),
        };

        let body = quick_xml::se::to_string(&request)
            .map_err(|e| DnsError::ApiError(format!("Failed to serialize request: {}", e)))?;

        Ok(body.replace(
            "<CreateHostedZoneRequest>",
            &format!("<CreateHostedZoneRequest xmlns=\"{}\">", ROUTE53_XMLNS),
        ))
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsError> {
        let response = self
            .api_request("GET", "/2013-04-01/hostedzone", "", None)
            .await?;

        let parsed: ListHostedZonesResponse = quick_xml::de::from_str(&response)
            .map_err(|e| DnsError::ApiError(format!("Failed to parse response: {}", e)))?;

        let zones = parsed
            .hosted_zones
            .map(|w| w.hosted_zone)
            .unwrap_or_default();

        Ok(zones.into_iter().map(Self::into_zone).collect())
    }

    async fn find_zone(&self, domain: &str) -> Result<Option<HostedZone>, DnsError> {
        let query = format!("dnsname={}", urlencoding::encode(domain));
        let response = self
            .api_request("GET", "/2013-04-01/hostedzonesbyname", &query, None)
            .await?;

        let parsed: ListHostedZonesResponse = quick_xml::de::from_str(&response)
            .map_err(|e| DnsError::ApiError(format!("Failed to parse response: {}", e)))?;

        let zones = parsed
            .hosted_zones
            .map(|w| w.hosted_zone)
            .unwrap_or_default();

        // The listing starts alphabetically at the queried name, so it can
        // contain unrelated zones; only an exact name match counts
        let wanted = Self::normalize_domain(domain);
        Ok(zones
            .into_iter()
            .find(|z| Self::normalize_domain(&z.name) == wanted)
            .map(Self::into_zone))
    }

    async fn create_zone(&self, domain: &str) -> Result<HostedZone, DnsError> {
        let caller_reference =
            format!("create-hosted-zone-{}", Utc::now().timestamp_millis());
        let body = Self::create_zone_body(domain, &caller_reference)?;

        let response = self
            .api_request("POST", "/2013-04-01/hostedzone", "", Some(&body))
            .await?;

        let parsed: CreateHostedZoneResponse = quick_xml::de::from_str(&response)
            .map_err(|e| DnsError::ApiError(format!("Failed to parse response: {}", e)))?;

        let zone = Self::into_zone(parsed.hosted_zone);
        info!("Created hosted zone {} for domain {}", zone.id, domain);

        Ok(zone)
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>, DnsError> {
        let path = format!("/2013-04-01/hostedzone/{}/rrset", zone_id);
        let response = self.api_request("GET", &path, "", None).await?;

        let parsed: ListResourceRecordSetsResponse = quick_xml::de::from_str(&response)
            .map_err(|e| DnsError::ApiError(format!("Failed to parse response: {}", e)))?;

        let record_sets = parsed
            .resource_record_sets
            .map(|w| w.resource_record_set)
            .unwrap_or_default();

        Ok(record_sets
            .into_iter()
            .filter_map(Self::convert_record_set)
            .collect())
    }

    async fn create_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError> {
        let body = Self::change_batch_body("CREATE", "Created by zonesmith", record)?;

        let path = format!("/2013-04-01/hostedzone/{}/rrset", zone_id);
        self.api_request("POST", &path, "", Some(&body)).await?;

        info!(
            "Created {} record {} in zone {}",
            record.record_type, record.name, zone_id
        );

        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError> {
        let body = Self::change_batch_body("DELETE", "Deleted by zonesmith", record)?;

        let path = format!("/2013-04-01/hostedzone/{}/rrset", zone_id);
        self.api_request("POST", &path, "", Some(&body)).await?;

        info!(
            "Deleted {} record {} in zone {}",
            record.record_type, record.name, zone_id
        );

        Ok(())
    }
}
