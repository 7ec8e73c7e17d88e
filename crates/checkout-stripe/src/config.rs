//! Stripe Keys & Display Options

use std::fmt;

use checkout_core::JsExpr;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StripeError};

/// Publishable and secret key pair.
///
/// Only the publishable key is ever written into markup or scripts.
#[derive(Clone)]
pub struct StripeKeys {
    publishable_key: String,
    secret_key: String,
}

impl StripeKeys {
    /// Create a key pair; both keys must be non-empty
    pub fn new(publishable_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let publishable_key = publishable_key.into();
        let secret_key = secret_key.into();

        if publishable_key.trim().is_empty() {
            return Err(StripeError::MissingKey("publishable key".into()));
        }
        if secret_key.trim().is_empty() {
            return Err(StripeError::MissingKey("secret key".into()));
        }

        Ok(Self {
            publishable_key,
            secret_key,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let publishable_key = std::env::var("STRIPE_PUBLISHABLE_KEY")
            .map_err(|_| StripeError::MissingKey("STRIPE_PUBLISHABLE_KEY not set".into()))?;
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| StripeError::MissingKey("STRIPE_SECRET_KEY not set".into()))?;

        Self::new(publishable_key, secret_key)
    }

    pub fn publishable_key(&self) -> &str {
        &self.publishable_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for StripeKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeKeys")
            .field("publishable_key", &self.publishable_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// What the hosted checkout modal shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutDisplay {
    /// Amount in cents shown to the user (the charge must still set it)
    pub amount: Option<i64>,

    /// Company or site name
    pub name: String,

    /// Product or service being purchased
    pub description: String,

    /// Square brand image, at least 128x128px
    pub image: String,

    /// 3-letter ISO currency code
    pub currency: Option<String>,

    /// Text on the trigger button
    pub label: String,

    /// Label of the modal's pay button; `{{amount}}` is substituted
    pub panel_label: Option<String>,

    pub validate_zip_code: Option<bool>,

    /// Pre-filled email address
    pub user_email: Option<String>,

    /// Offer "Remember Me"
    pub allow_remember: Option<bool>,

    pub collect_billing_address: Option<bool>,
}

impl Default for CheckoutDisplay {
    fn default() -> Self {
        Self {
            amount: None,
            name: "Demo Site".into(),
            description: "2 widgets ($20.00)".into(),
            image: "/128x128.png".into(),
            currency: None,
            label: "Pay".into(),
            panel_label: None,
            validate_zip_code: None,
            user_email: None,
            allow_remember: None,
            collect_billing_address: None,
        }
    }
}

/// Callbacks the hosted modal invokes, as JS function source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutHooks {
    /// `function(token)`; `token.id` is the single-use token
    pub token: JsExpr,
    pub opened: JsExpr,
    pub closed: JsExpr,
}

impl Default for CheckoutHooks {
    fn default() -> Self {
        Self {
            token: JsExpr::new("function(token) { alert(\"Define your token handler\"); }"),
            opened: JsExpr::new("function() { }"),
            closed: JsExpr::new("function() { }"),
        }
    }
}
