//! Application State

use std::sync::Arc;

use checkout_stripe::{CheckoutDisplay, StripeKeys};

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Stripe keys (optional - None if not configured)
    pub keys: Option<Arc<StripeKeys>>,

    /// Endpoint every rendered form posts to
    pub charge_action: String,

    /// What the hosted modal shows on the demo pages
    pub display: CheckoutDisplay,
}

impl AppState {
    pub fn new(keys: Option<StripeKeys>) -> Self {
        Self {
            keys: keys.map(Arc::new),
            charge_action: "/charge".into(),
            display: CheckoutDisplay {
                amount: Some(2000),
                currency: Some("usd".into()),
                ..Default::default()
            },
        }
    }
}
