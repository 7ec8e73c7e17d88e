//! checkout-server
//!
//! Axum demo server rendering each Stripe widget variant on its own page,
//! with a charge endpoint the forms post back to.

mod handlers;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use checkout_stripe::StripeKeys;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::{charge, checkout_page, health_check, index};
use crate::state::AppState;

/// Build the router over shared state
pub(crate) fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & index
        .route("/health", get(health_check))
        .route("/", get(index))
        // Widgets
        .route("/checkout/{variant}", get(checkout_page))
        .route("/charge", post(charge))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let keys = match StripeKeys::from_env() {
        Ok(keys) => {
            tracing::info!("✓ Stripe configured");
            Some(keys)
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - checkout pages disabled: {}", e);
            tracing::warn!("  Set STRIPE_PUBLISHABLE_KEY and STRIPE_SECRET_KEY in .env");
            None
        }
    };

    let app = app(AppState::new(keys));

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("checkout-server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health              - Health check");
    tracing::info!("  GET  /                    - Variant index");
    tracing::info!("  GET  /checkout/{{variant}}  - hosted | popup | fields | elements");
    tracing::info!("  POST /charge              - Accept a posted token");

    axum::serve(listener, app).await?;

    Ok(())
}
