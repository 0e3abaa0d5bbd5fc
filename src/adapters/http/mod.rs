//! HTTP adapters - REST API implementations.
//!
//! `app_router` assembles the full service: payment routes, the health probe,
//! and the shared middleware stack (tracing, CORS, request timeout).

pub mod payments;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

pub use payments::{payments_router, PaymentsAppState};

/// GET /health - Liveness probe
pub async fn health() -> Json<payments::HealthResponse> {
    Json(payments::HealthResponse {
        status: "ok".to_string(),
    })
}

/// Build the application router with all middleware applied.
pub fn app_router(state: PaymentsAppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(payments_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&server.cors_origins_list()))
                .layer(TimeoutLayer::new(server.request_timeout())),
        )
        .with_state(state)
}

/// CORS policy from configured origins. `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::application::handlers::payments::CheckoutUrls;

    fn test_state() -> PaymentsAppState {
        PaymentsAppState::new(
            Arc::new(MockPaymentProvider::new()),
            Arc::new(InMemoryEventBus::new()),
            CheckoutUrls::new("https://shop.test/success", "https://shop.test/cancel"),
        )
    }

    fn server_config(cors_origins: Option<&str>) -> ServerConfig {
        ServerConfig {
            cors_origins: cors_origins.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = app_router(test_state(), &server_config(None));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = app_router(test_state(), &server_config(None));

        let response = app
            .oneshot(Request::get("/payments/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let app = app_router(test_state(), &server_config(Some("https://shop.test")));

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://shop.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://shop.test"
        );
    }

    #[tokio::test]
    async fn cors_omits_header_for_other_origins() {
        let app = app_router(test_state(), &server_config(Some("https://shop.test")));

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://evil.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn cors_wildcard_allows_any_origin() {
        let app = app_router(test_state(), &server_config(Some("*")));

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "https://anywhere.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
