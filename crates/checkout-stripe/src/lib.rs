//! # checkout-stripe
//!
//! Server-rendered Stripe payment widgets built on checkout-core.
//!
//! ## Integration Variants
//!
//! One variant is chosen per form at configuration time:
//!
//! ### 1. Hosted checkout - simplest
//!
//! **Flow:** a script tag inside your form renders Stripe's button; the
//! modal posts the form back with the token appended.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │  Your Form  │────▶│  Stripe Modal   │────▶│  POST action │
//! │ (script tag)│     │  (checkout.js)  │     │ + stripeToken│
//! └─────────────┘     └─────────────────┘     └─────────────┘
//! ```
//!
//! ### 2. Checkout popup - your own button
//!
//! One page-global `StripeCheckout` handler, one click binding per button.
//! The `token` hook decides what happens with the token.
//!
//! ### 3. Card fields - raw inputs, Stripe.js v2
//!
//! Inputs carry `data-stripe` roles and never a `name`; the submit handler
//! tokenizes, appends the hidden token input and submits. Optional
//! jquery.payment formatting and advisory validation.
//!
//! ### 4. Managed elements - Stripe.js v3
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │           Your Checkout Form            │
//! │  ┌────────────────────────────────┐    │
//! │  │   <div id="card-element">      │    │
//! │  │   Card Number: ████ ████ ████  │    │
//! │  └────────────────────────────────┘    │
//! └────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_core::PageContext;
//! use checkout_stripe::{IntegrationConfig, IntegrationVariant, StripeKeys, VariantKind};
//!
//! let keys = StripeKeys::from_env()?;
//! let mut page = PageContext::new();
//!
//! let widget = IntegrationVariant::select(&keys, IntegrationConfig::new(VariantKind::Elements))?;
//! let body = widget.render(&mut page)?;
//! let html = page.render_document("Checkout", &body)?;
//! ```

pub mod checkout;
pub mod config;
pub mod custom;
pub mod elements;
pub mod error;
pub mod expiry;
pub mod fields;
pub mod form;
mod tokenize;
pub mod variant;

pub use checkout::HostedCheckout;
pub use config::{CheckoutDisplay, CheckoutHooks, StripeKeys};
pub use custom::{PopupCheckout, PopupOptions};
pub use elements::{ElementEvent, ElementKind, ElementSpec, ElementsForm, ElementsFormOptions};
pub use error::{Result, StripeError};
pub use expiry::{split_combined_expiry, SplitExpiry};
pub use fields::{CardField, FieldOptions};
pub use form::{TokenForm, TokenFormOptions};
pub use variant::{IntegrationConfig, IntegrationVariant, VariantKind};
