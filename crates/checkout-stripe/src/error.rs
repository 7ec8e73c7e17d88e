//! Stripe Widget Error Types

use checkout_core::WidgetError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, StripeError>;

/// Stripe widget errors
#[derive(Error, Debug)]
pub enum StripeError {
    /// Publishable or secret key not configured
    #[error("Stripe key not set: {0}")]
    MissingKey(String),

    /// Invalid widget options
    #[error("Configuration error: {0}")]
    Config(String),

    /// Variant name not recognized
    #[error("Unknown integration variant: {0}")]
    UnknownVariant(String),

    /// Markup or script rendering failed
    #[error(transparent)]
    Widget(#[from] WidgetError),
}

impl StripeError {
    /// Whether the error stems from configuration (as opposed to wiring)
    pub fn is_configuration(&self) -> bool {
        match self {
            StripeError::MissingKey(_) | StripeError::Config(_) | StripeError::UnknownVariant(_) => true,
            StripeError::Widget(err) => err.is_configuration(),
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            StripeError::MissingKey(_) => "Payments are not configured.",
            StripeError::UnknownVariant(_) => "Unknown checkout type.",
            StripeError::Config(_) => "Payment form configuration error.",
            StripeError::Widget(err) => err.user_message(),
        }
    }
}
