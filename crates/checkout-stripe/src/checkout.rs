//! Hosted Checkout (simple integration)
//!
//! A form holding a single script tag; Stripe's `checkout.js` reads its
//! configuration from the tag's `data-*` attributes, renders the pay button
//! and the modal, and submits the form with the token appended.

use checkout_core::{html, AttrValue, AttributeMap};

use crate::config::{CheckoutDisplay, StripeKeys};

/// Stripe's hosted checkout script
pub const CHECKOUT_JS: &str = "https://checkout.stripe.com/checkout.js";

/// Class `checkout.js` looks for on its script tag
pub const BUTTON_CLASS: &str = "stripe-button";

/// Hosted-redirect checkout widget
#[derive(Clone, Debug)]
pub struct HostedCheckout {
    publishable_key: String,

    /// URL of the endpoint performing the charge
    pub action: String,

    /// Extra attributes for the opening form tag
    pub form_options: AttributeMap,

    pub stripe_js: String,

    pub display: CheckoutDisplay,
}

impl HostedCheckout {
    pub fn new(keys: &StripeKeys) -> Self {
        Self {
            publishable_key: keys.publishable_key().to_string(),
            action: "/".into(),
            form_options: AttributeMap::new(),
            stripe_js: CHECKOUT_JS.into(),
            display: CheckoutDisplay::default(),
        }
    }

    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    #[must_use]
    pub fn display(mut self, display: CheckoutDisplay) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn form_options(mut self, form_options: AttributeMap) -> Self {
        self.form_options = form_options;
        self
    }

    /// Attributes of the configuring script tag; unset options are omitted
    pub fn script_attributes(&self) -> AttributeMap {
        let display = &self.display;
        let flag = |value: Option<bool>| value.map(|b| AttrValue::Bool(b).into_text_bool());

        let mut attrs = AttributeMap::new()
            .with("src", self.stripe_js.as_str())
            .with("data-key", self.publishable_key.as_str());
        attrs.set_opt("data-amount", display.amount);
        attrs.set("data-name", display.name.as_str());
        attrs.set("data-description", display.description.as_str());
        attrs.set("data-image", display.image.as_str());
        attrs.set_opt("data-currency", display.currency.clone());
        attrs.set_opt("data-panel-label", display.panel_label.clone());
        attrs.set_opt("data-zip-code", flag(display.validate_zip_code));
        attrs.set_opt("data-email", display.user_email.clone());
        attrs.set("data-label", display.label.as_str());
        attrs.set_opt("data-allow-remember-me", flag(display.allow_remember));
        attrs.set_opt("data-billing-address", flag(display.collect_billing_address));
        attrs.set("class", BUTTON_CLASS);
        attrs
    }

    pub fn render(&self) -> String {
        tracing::debug!(action = %self.action, "Rendering hosted checkout");

        let script = html::Tag::new("script").attrs(&self.script_attributes()).render();
        format!(
            "{}{script}{}",
            html::begin_form(&self.action, "POST", &self.form_options),
            html::end_form()
        )
    }
}
