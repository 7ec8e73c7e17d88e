//! HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Form, Json,
};
use checkout_core::{html, PageContext};
use checkout_stripe::{IntegrationConfig, IntegrationVariant, VariantKind};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Fields the rendered forms post back
#[derive(Debug, Default, Deserialize)]
pub struct ChargeForm {
    #[serde(rename = "stripeToken", default)]
    pub token: Option<String>,
    #[serde(rename = "stripeEmail", default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChargeResponse {
    pub received: bool,
    pub email: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: state.keys.is_some(),
    })
}

/// Index of the checkout variants
pub async fn index() -> Html<String> {
    let items: String = VariantKind::ALL
        .iter()
        .map(|kind| {
            let link = html::Tag::new("a")
                .attr("href", format!("/checkout/{kind}"))
                .text(kind.title())
                .render();
            html::Tag::new("li").html(link).render()
        })
        .collect();

    let page = PageContext::new();
    let body = format!(
        "{}{}",
        html::Tag::new("h1").text("Checkout variants").render(),
        html::Tag::new("ul").html(items).render()
    );
    match page.render_document("Checkout variants", &body) {
        Ok(document) => Html(document),
        Err(e) => {
            tracing::error!("Index render error: {}", e);
            Html(body)
        }
    }
}

/// Render one variant on a fresh page
pub async fn checkout_page(
    State(state): State<AppState>,
    Path(variant): Path<String>,
) -> Result<Html<String>, ApiError> {
    let kind: VariantKind = variant.parse().map_err(|e: checkout_stripe::StripeError| {
        tracing::warn!(variant = %variant, "Unknown checkout variant requested");
        api_error(StatusCode::NOT_FOUND, e.user_message(), "UNKNOWN_VARIANT")
    })?;

    let keys = state.keys.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Payments not configured",
            "PAYMENTS_DISABLED",
        )
    })?;

    let config = IntegrationConfig {
        action: Some(state.charge_action.clone()),
        display: state.display.clone(),
        ..IntegrationConfig::new(kind)
    };

    let render_error = |e: &dyn std::fmt::Display, message: &str| {
        tracing::error!("Checkout render error: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, message, "RENDER_ERROR")
    };

    let mut page = PageContext::new();
    let widget = IntegrationVariant::select(keys, config).map_err(|e| render_error(&e, e.user_message()))?;
    let body = widget.render(&mut page).map_err(|e| render_error(&e, e.user_message()))?;
    let body = format!("{}{body}", html::Tag::new("h1").text(kind.title()).render());
    let document = page
        .render_document(kind.title(), &body)
        .map_err(|e| render_error(&e, e.user_message()))?;

    Ok(Html(document))
}

/// Accept a posted form; never contacts Stripe
pub async fn charge(Form(form): Form<ChargeForm>) -> Result<Json<ChargeResponse>, ApiError> {
    let Some(token) = form.token.filter(|t| !t.trim().is_empty()) else {
        tracing::warn!("Charge posted without a token");
        return Err(api_error(StatusCode::BAD_REQUEST, "No payment token received", "MISSING_TOKEN"));
    };

    tracing::info!(token_len = token.len(), email = ?form.email, "Received payment token");
    Ok(Json(ChargeResponse {
        received: true,
        email: form.email,
    }))
}
