//! Card Input Fields
//!
//! Typed per-field options for the raw card inputs. Caller overrides are
//! expressed as `Some(..)` fields laid over each kind's defaults; anything
//! not covered by a typed field goes into `extra`.

use checkout_core::attributes::{self, AttributeMap};
use checkout_core::FieldSpec;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Attribute Stripe.js v2 reads card values from
pub const ROLE_ATTRIBUTE: &str = "data-stripe";

/// Logical card input kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardField {
    Number,
    Cvc,
    Month,
    Year,
    /// Combined `MM / YY` input backed by hidden month and year inputs
    MonthYear,
}

impl CardField {
    /// `data-stripe` value, also the default DOM id
    pub fn data_stripe(&self) -> &'static str {
        match self {
            CardField::Number => "number",
            CardField::Cvc => "cvc",
            CardField::Month => "exp-month",
            CardField::Year => "exp-year",
            CardField::MonthYear => "exp-month-year",
        }
    }

    /// jquery.payment formatter applied to this input
    pub fn formatter(&self) -> &'static str {
        match self {
            CardField::Number => "formatCardNumber",
            CardField::Cvc => "formatCardCVC",
            CardField::MonthYear => "formatCardExpiry",
            CardField::Month | CardField::Year => "restrictNumeric",
        }
    }

    /// Defaults before caller overrides
    pub fn defaults(&self) -> FieldOptions {
        let base = FieldOptions {
            id: Some(self.data_stripe().into()),
            class: Some("form-control".into()),
            required: Some(true),
            input_type: Some("tel".into()),
            ..Default::default()
        };

        match self {
            CardField::Number => FieldOptions {
                autocomplete: Some("cc-number".into()),
                placeholder: Some("•••• •••• •••• ••••".into()),
                size: Some(20),
                ..base
            },
            CardField::Cvc => FieldOptions {
                autocomplete: Some("off".into()),
                placeholder: Some("•••".into()),
                size: Some(4),
                ..base
            },
            CardField::Month => FieldOptions {
                autocomplete: Some("cc-exp-month".into()),
                placeholder: Some("••".into()),
                maxlength: Some(2),
                size: Some(2),
                ..base
            },
            CardField::Year => FieldOptions {
                autocomplete: Some("cc-exp-year".into()),
                placeholder: Some("••••".into()),
                maxlength: Some(4),
                size: Some(4),
                ..base
            },
            CardField::MonthYear => FieldOptions {
                autocomplete: Some("cc-exp".into()),
                placeholder: Some("•• / ••".into()),
                ..base
            },
        }
    }
}

/// Per-field options; `None` keeps the default
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub id: Option<String>,
    pub class: Option<String>,
    pub autocomplete: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub size: Option<u32>,
    pub maxlength: Option<u32>,
    /// Any other attribute; never `name`
    pub extra: AttributeMap,
}

impl FieldOptions {
    /// Options for the hidden inputs behind a combined expiry
    pub fn hidden() -> Self {
        Self {
            input_type: Some("hidden".into()),
            ..Default::default()
        }
    }

    /// Lay these overrides over `defaults`
    #[must_use]
    pub fn merged_over(self, defaults: FieldOptions) -> FieldOptions {
        FieldOptions {
            id: self.id.or(defaults.id),
            class: self.class.or(defaults.class),
            autocomplete: self.autocomplete.or(defaults.autocomplete),
            placeholder: self.placeholder.or(defaults.placeholder),
            required: self.required.or(defaults.required),
            input_type: self.input_type.or(defaults.input_type),
            size: self.size.or(defaults.size),
            maxlength: self.maxlength.or(defaults.maxlength),
            extra: attributes::merge(&defaults.extra, &self.extra),
        }
    }

    /// HTML attributes, excluding `id` and `required`
    pub fn to_attributes(&self) -> AttributeMap {
        let mut attrs = AttributeMap::new();
        attrs.set_opt("class", self.class.clone());
        attrs.set_opt("autocomplete", self.autocomplete.clone());
        attrs.set_opt("placeholder", self.placeholder.clone());
        attrs.set_opt("type", self.input_type.clone());
        attrs.set_opt("size", self.size);
        attrs.set_opt("maxlength", self.maxlength);
        attributes::merge(&attrs, &self.extra)
    }
}

/// Merge overrides onto the kind's defaults and validate the result
pub fn field_spec(kind: CardField, overrides: FieldOptions) -> Result<FieldSpec> {
    let merged = overrides.merged_over(kind.defaults());
    let attributes = merged.to_attributes();
    attributes::validate_card_field(kind.data_stripe(), &attributes)?;

    Ok(FieldSpec::new(
        kind.data_stripe(),
        merged.id.unwrap_or_else(|| kind.data_stripe().to_string()),
    )
    .attributes(attributes)
    .required(merged.required.unwrap_or(false))
    .sensitive(true))
}
