//! Hosted zone resolution
//!
//! Record creation needs a zone to write into. Resolution looks the zone up
//! by exact name and creates it on first use, so callers never manage zones
//! themselves.

use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::DnsError;
use crate::providers::{DnsProvider, HostedZone};

/// Resolves domains to hosted zones, creating zones on first use
#[derive(Clone)]
pub struct ZoneService {
    provider: Arc<dyn DnsProvider>,
}

impl ZoneService {
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self { provider }
    }

    /// Look up the hosted zone for a domain without creating it.
    pub async fn find(&self, domain: &str) -> Result<Option<HostedZone>, DnsError> {
        self.provider.find_zone(domain).await
    }

    /// Resolve the hosted zone for a domain, creating it when absent.
    ///
    /// Two concurrent calls for a fresh domain can both observe "absent" and
    /// race to create. The provider rejects the loser with a zone-exists
    /// conflict, which is folded back into a lookup of the winner's zone, so
    /// at most one zone ever exists per domain.
    pub async fn resolve(&self, domain: &str) -> Result<HostedZone, DnsError> {
        if let Some(zone) = self.provider.find_zone(domain).await? {
            debug!("Found existing hosted zone {} for {}", zone.id, domain);
            return Ok(zone);
        }

        info!("No hosted zone for {}, creating one", domain);
        match self.provider.create_zone(domain).await {
            Ok(zone) => Ok(zone),
            Err(DnsError::ZoneAlreadyExists(_)) => {
                debug!("Hosted zone for {} was created concurrently", domain);
                self.provider
                    .find_zone(domain)
                    .await?
                    .ok_or_else(|| DnsError::ZoneNotFound(domain.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::RecordSet;
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use mockall::{mock, Sequence};

    mock! {
        Provider {}

        #[async_trait]
        impl DnsProvider for Provider {
            async fn list_zones(&self) -> Result<Vec<HostedZone>, DnsError>;
            async fn find_zone(&self, domain: &str) -> Result<Option<HostedZone>, DnsError>;
            async fn create_zone(&self, domain: &str) -> Result<HostedZone, DnsError>;
            async fn list_records(&self, zone_id: &str) -> Result<Vec<RecordSet>, DnsError>;
            async fn create_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError>;
            async fn delete_record(&self, zone_id: &str, record: &RecordSet) -> Result<(), DnsError>;
        }
    }

    fn zone(id: &str, name: &str) -> HostedZone {
        HostedZone {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_existing_zone() {
        let mut provider = MockProvider::new();
        provider
            .expect_find_zone()
            .with(eq("example.com"))
            .times(1)
            .returning(|_| Ok(Some(zone("Z1", "example.com."))));
        provider.expect_create_zone().never();

        let service = ZoneService::new(Arc::new(provider));
        let resolved = service.resolve("example.com").await.unwrap();

        assert_eq!(resolved.id, "Z1");
    }

    #[tokio::test]
    async fn test_resolve_creates_missing_zone_once() {
        let mut provider = MockProvider::new();
        provider
            .expect_find_zone()
            .with(eq("fresh.example.com"))
            .times(1)
            .returning(|_| Ok(None));
        provider
            .expect_create_zone()
            .with(eq("fresh.example.com"))
            .times(1)
            .returning(|_| Ok(zone("Z2", "fresh.example.com.")));

        let service = ZoneService::new(Arc::new(provider));
        let resolved = service.resolve("fresh.example.com").await.unwrap();

        assert_eq!(resolved.id, "Z2");
        assert_eq!(resolved.name, "fresh.example.com.");
    }

    #[tokio::test]
    async fn test_resolve_treats_concurrent_create_as_success() {
        let mut seq = Sequence::new();
        let mut provider = MockProvider::new();

        provider
            .expect_find_zone()
            .with(eq("raced.example.com"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        provider
            .expect_create_zone()
            .with(eq("raced.example.com"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(DnsError::ZoneAlreadyExists(
                    "raced.example.com.".to_string(),
                ))
            });
        provider
            .expect_find_zone()
            .with(eq("raced.example.com"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(zone("Z3", "raced.example.com."))));

        let service = ZoneService::new(Arc::new(provider));
        let resolved = service.resolve("raced.example.com").await.unwrap();

        assert_eq!(resolved.id, "Z3");
    }

    #[tokio::test]
    async fn test_resolve_propagates_lookup_failure() {
        let mut provider = MockProvider::new();
        provider
            .expect_find_zone()
            .times(1)
            .returning(|_| Err(DnsError::ApiError("route53 unreachable".to_string())));
        provider.expect_create_zone().never();

        let service = ZoneService::new(Arc::new(provider));
        let result = service.resolve("example.com").await;

        assert!(matches!(result, Err(DnsError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_resolve_reports_missing_zone_after_conflict() {
        // The conflict said the zone exists but the follow-up lookup cannot
        // see it; surface that as not-found instead of pretending success
        let mut seq = Sequence::new();
        let mut provider = MockProvider::new();

        provider
            .expect_find_zone()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        provider
            .expect_create_zone()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(DnsError::ZoneAlreadyExists("ghost.example.".to_string())));
        provider
            .expect_find_zone()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));

        let service = ZoneService::new(Arc::new(provider));
        let result = service.resolve("ghost.example").await;

        assert!(matches!(result, Err(DnsError::ZoneNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_never_creates() {
        let mut provider = MockProvider::new();
        provider
            .expect_find_zone()
            .with(eq("absent.example.com"))
            .times(1)
            .returning(|_| Ok(None));
        provider.expect_create_zone().never();

        let service = ZoneService::new(Arc::new(provider));
        let found = service.find("absent.example.com").await.unwrap();

        assert!(found.is_none());
    }
}
