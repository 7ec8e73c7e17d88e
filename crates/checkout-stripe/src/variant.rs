//! Integration Variant Selection
//!
//! One configuration struct, one variant chosen at configuration time. Each
//! variant composes the shared attribute merging, form rendering and script
//! emission differently; there are no transitions between variants.

use std::fmt;
use std::str::FromStr;

use checkout_core::attributes::{self, AttributeMap};
use checkout_core::PageContext;
use serde::{Deserialize, Serialize};

use crate::checkout::HostedCheckout;
use crate::config::{CheckoutDisplay, StripeKeys};
use crate::custom::{PopupCheckout, PopupOptions};
use crate::elements::{ElementsForm, ElementsFormOptions};
use crate::error::{Result, StripeError};
use crate::form::{TokenForm, TokenFormOptions};

/// Integration styles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// Provider-rendered button inside a form; the provider posts the token
    #[default]
    Hosted,
    /// Page-owned button opening the hosted modal
    Popup,
    /// Raw card inputs tokenized by Stripe.js v2
    Fields,
    /// SDK-managed inputs mounted into containers (Stripe.js v3)
    Elements,
}

impl VariantKind {
    pub const ALL: [VariantKind; 4] = [
        VariantKind::Hosted,
        VariantKind::Popup,
        VariantKind::Fields,
        VariantKind::Elements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Hosted => "hosted",
            VariantKind::Popup => "popup",
            VariantKind::Fields => "fields",
            VariantKind::Elements => "elements",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            VariantKind::Hosted => "Hosted checkout",
            VariantKind::Popup => "Checkout popup",
            VariantKind::Fields => "Card fields",
            VariantKind::Elements => "Managed elements",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = StripeError;

    fn from_str(s: &str) -> Result<Self> {
        VariantKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StripeError::UnknownVariant(s.to_string()))
    }
}

/// Configuration of one payment form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub variant: VariantKind,

    /// Form action for the form-based variants; when unset each variant
    /// keeps its own action
    pub action: Option<String>,

    /// Attributes of the enclosing form; win over variant-level attributes
    pub form_attributes: AttributeMap,

    /// Hosted modal display (hosted and popup)
    pub display: CheckoutDisplay,

    pub popup: PopupOptions,

    pub fields: TokenFormOptions,

    pub elements: ElementsFormOptions,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            variant: VariantKind::default(),
            action: None,
            form_attributes: AttributeMap::new(),
            display: CheckoutDisplay::default(),
            popup: PopupOptions::default(),
            fields: TokenFormOptions::default(),
            elements: ElementsFormOptions::default(),
        }
    }
}

impl IntegrationConfig {
    pub fn new(variant: VariantKind) -> Self {
        Self {
            variant,
            ..Default::default()
        }
    }
}

/// A configured widget, ready to render
#[derive(Clone, Debug)]
pub enum IntegrationVariant {
    Hosted(HostedCheckout),
    Popup(PopupCheckout),
    Fields { keys: StripeKeys, options: TokenFormOptions },
    Elements(ElementsForm),
}

impl IntegrationVariant {
    /// Build the variant named by `config.variant`
    pub fn select(keys: &StripeKeys, config: IntegrationConfig) -> Result<Self> {
        tracing::info!(variant = %config.variant, action = ?config.action, "Selected payment integration");

        let selected = match config.variant {
            VariantKind::Hosted => {
                let mut hosted = HostedCheckout::new(keys)
                    .display(config.display)
                    .form_options(config.form_attributes);
                if let Some(action) = config.action {
                    hosted = hosted.action(action);
                }
                IntegrationVariant::Hosted(hosted)
            }
            VariantKind::Popup => {
                IntegrationVariant::Popup(PopupCheckout::new(keys).display(config.display).options(config.popup))
            }
            VariantKind::Fields => IntegrationVariant::Fields {
                keys: keys.clone(),
                options: TokenFormOptions {
                    action: config.action.unwrap_or(config.fields.action),
                    attributes: attributes::merge(&config.fields.attributes, &config.form_attributes),
                    ..config.fields
                },
            },
            VariantKind::Elements => {
                if config.elements.elements.is_empty() {
                    return Err(StripeError::Config("managed-elements form needs at least one element".into()));
                }
                IntegrationVariant::Elements(ElementsForm::new(
                    keys,
                    ElementsFormOptions {
                        action: config.action.unwrap_or(config.elements.action),
                        attributes: attributes::merge(&config.elements.attributes, &config.form_attributes),
                        ..config.elements
                    },
                ))
            }
        };
        Ok(selected)
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            IntegrationVariant::Hosted(_) => VariantKind::Hosted,
            IntegrationVariant::Popup(_) => VariantKind::Popup,
            IntegrationVariant::Fields { .. } => VariantKind::Fields,
            IntegrationVariant::Elements(_) => VariantKind::Elements,
        }
    }

    /// Render markup into the page, scheduling scripts on its emitter
    pub fn render(&self, page: &mut PageContext) -> Result<String> {
        match self {
            IntegrationVariant::Hosted(hosted) => Ok(hosted.render()),
            IntegrationVariant::Popup(popup) => popup.render(page),
            IntegrationVariant::Fields { keys, options } => TokenForm::render(keys, options.clone(), page),
            IntegrationVariant::Elements(form) => form.render(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::Phase;

    fn keys() -> StripeKeys {
        StripeKeys::new("pk_test_123", "sk_test_123").unwrap()
    }

    fn render(config: IntegrationConfig) -> (String, PageContext) {
        let mut page = PageContext::new();
        let html = IntegrationVariant::select(&keys(), config)
            .unwrap()
            .render(&mut page)
            .unwrap();
        (html, page)
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("hosted".parse::<VariantKind>().unwrap(), VariantKind::Hosted);
        assert_eq!(" Elements ".parse::<VariantKind>().unwrap(), VariantKind::Elements);
        assert!(matches!("paypal".parse::<VariantKind>(), Err(StripeError::UnknownVariant(_))));
    }

    #[test]
    fn test_variant_from_json() {
        let config: IntegrationConfig =
            serde_json::from_str(r#"{"variant": "fields", "action": "/charge"}"#).unwrap();

        assert_eq!(config.variant, VariantKind::Fields);
        assert_eq!(config.action.as_deref(), Some("/charge"));
        assert_eq!(config.fields.token_input_name, "stripeToken");
    }

    #[test]
    fn test_nested_action_kept_without_override() {
        let config: IntegrationConfig =
            serde_json::from_str(r#"{"variant": "fields", "fields": {"action": "/pay"}}"#).unwrap();
        assert_eq!(config.action, None);

        let (html, _) = render(config);
        assert!(html.starts_with("<form action=\"&#x2f;pay\""));
    }

    #[test]
    fn test_top_level_action_overrides_nested() {
        let mut config = IntegrationConfig::new(VariantKind::Elements);
        config.elements.action = "/pay".into();
        config.action = Some("/charge".into());

        let (html, _) = render(config);
        assert!(html.contains("action=\"&#x2f;charge\""));
        assert!(!html.contains("&#x2f;pay"));
    }

    #[test]
    fn test_hosted_emits_no_scripts() {
        let (html, page) = render(IntegrationConfig::new(VariantKind::Hosted));

        assert!(html.contains("class=\"stripe-button\""));
        for phase in Phase::ALL {
            assert_eq!(page.scripts().pending(phase), 0);
        }
    }

    #[test]
    fn test_popup_binds_ready_scripts() {
        let (html, page) = render(IntegrationConfig::new(VariantKind::Popup));

        assert!(html.starts_with("<button"));
        assert_eq!(page.scripts().pending(Phase::Ready), 2);
    }

    #[test]
    fn test_fields_takes_action_and_form_attributes() {
        let mut config = IntegrationConfig::new(VariantKind::Fields);
        config.action = Some("/charge".into());
        config.form_attributes = AttributeMap::new().with("class", "payment");
        let (html, page) = render(config);

        assert!(html.contains("class=\"payment\""));
        assert!(html.contains("data-stripe=\"number\""));
        assert_eq!(page.scripts().pending(Phase::Begin), 1);
    }

    #[test]
    fn test_elements_requires_an_element() {
        let mut config = IntegrationConfig::new(VariantKind::Elements);
        config.elements.elements.clear();

        let err = IntegrationVariant::select(&keys(), config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_every_variant_renders_a_document() {
        for kind in VariantKind::ALL {
            let (body, page) = render(IntegrationConfig::new(kind));
            let doc = page.render_document(kind.title(), &body).unwrap();

            assert!(doc.starts_with("<!DOCTYPE html>"));
            assert!(!doc.contains("sk_test_123"));
        }
    }
}
