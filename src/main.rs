use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use payments_service::adapters::events::RedisEventPublisher;
use payments_service::adapters::http::{app_router, PaymentsAppState};
use payments_service::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use payments_service::application::CheckoutUrls;
use payments_service::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let stripe = StripeConfig::new(
        config.payment.stripe_api_key.clone(),
        config.payment.stripe_webhook_secret.clone(),
    )
    .with_base_url(config.payment.stripe_api_base_url.clone())
    .with_require_livemode(config.payment.require_livemode);
    let payment_provider = Arc::new(StripePaymentAdapter::new(stripe));

    if config.payment.is_test_mode() {
        tracing::warn!("Stripe is configured with a test mode key");
    }

    let publisher = tokio::time::timeout(
        config.redis.timeout(),
        RedisEventPublisher::connect(&config.redis.url),
    )
    .await
    .map_err(|_| "Timed out connecting to Redis")??
    .with_channel_prefix(config.redis.channel_prefix.clone());
    tracing::info!(channel_prefix = %config.redis.channel_prefix, "Connected to message bus");

    let state = PaymentsAppState::new(
        payment_provider,
        Arc::new(publisher),
        CheckoutUrls::new(
            config.payment.stripe_success_url.clone(),
            config.payment.stripe_cancel_url.clone(),
        ),
    );

    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Payments service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// JSON logs in production, human-readable otherwise. `RUST_LOG` overrides the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
