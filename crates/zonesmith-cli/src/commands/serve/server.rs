//! HTTP server assembly: provider, services, router, CORS, Swagger UI

use std::future::IntoFuture;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use zonesmith_dns::handlers::{configure_routes, DnsApiDoc, DnsAppState};
use zonesmith_dns::providers::{Route53Credentials, Route53Provider};
use zonesmith_dns::services::{RecordService, ZoneService};

use super::ServeCommand;

/// Build the CORS layer: permissive by default, restricted to one origin
/// when configured
fn build_cors_layer(cors_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    match cors_origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))?;

            Ok(CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
        }
        None => Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)),
    }
}

pub async fn start_server(command: ServeCommand) -> anyhow::Result<()> {
    let credentials = Route53Credentials {
        access_key_id: command.access_key_id.clone(),
        secret_access_key: command.secret_access_key.clone(),
    };

    let provider: Arc<dyn zonesmith_dns::DnsProvider> = Arc::new(Route53Provider::with_endpoint(
        credentials,
        &command.endpoint,
    )?);

    let zone_service = ZoneService::new(provider.clone());
    let record_service = Arc::new(RecordService::new(provider, zone_service));
    let state = Arc::new(DnsAppState { record_service });

    let cors = build_cors_layer(command.cors_origin.as_deref())?;
    match &command.cors_origin {
        Some(origin) => info!("CORS restricted to {}", origin),
        None => info!("CORS open to all origins"),
    }

    let app = Router::new()
        .merge(configure_routes().with_state(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", DnsApiDoc::openapi()))
        .layer(cors);

    let address = format!("{}:{}", command.host, command.port);
    let listener = TcpListener::bind(&address).await?;
    info!("DNS API server listening on {}", address);
    info!("Swagger UI available at http://{}/swagger-ui", address);

    axum::serve(listener, app).into_future().await?;

    Ok(())
}
