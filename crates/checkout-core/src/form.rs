//! Form Rendering
//!
//! Renders inputs, mount containers and the enclosing form, registering
//! every DOM id with the page's script emitter so scripts can be checked
//! against the markup they select.

use serde::{Deserialize, Serialize};

use crate::attributes::{self, AttributeMap};
use crate::error::{Result, WidgetError};
use crate::html;
use crate::page::PageContext;

/// One field as it will be rendered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Logical role, written to the renderer's role attribute
    pub role: String,
    /// DOM id
    pub id: String,
    /// Merged HTML attributes (without id and role)
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub required: bool,
    /// Carries card data; must never be named
    #[serde(default)]
    pub sensitive: bool,
}

impl FieldSpec {
    pub fn new(role: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            id: id.into(),
            attributes: AttributeMap::new(),
            required: false,
            sensitive: false,
        }
    }

    #[must_use]
    pub fn attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }
}

/// Renders fields tagged with a provider role attribute (e.g. `data-stripe`)
#[derive(Clone, Copy, Debug)]
pub struct FormRenderer {
    role_attribute: &'static str,
}

impl FormRenderer {
    pub const fn new(role_attribute: &'static str) -> Self {
        Self { role_attribute }
    }

    pub fn role_attribute(&self) -> &'static str {
        self.role_attribute
    }

    /// Render an input for `spec`.
    ///
    /// Sensitive fields are validated first; the role attribute is set last
    /// and cannot be overridden by caller attributes.
    pub fn render_field(&self, page: &mut PageContext, spec: &FieldSpec) -> Result<String> {
        if spec.id.trim().is_empty() {
            return Err(WidgetError::Config(format!("{} input needs a DOM id", spec.role)));
        }
        if spec.sensitive {
            attributes::validate_card_field(&spec.role, &spec.attributes)?;
        }

        let mut attrs = AttributeMap::new().with("id", spec.id.as_str());
        for (key, value) in spec.attributes.iter() {
            if key != "id" && key != "required" && key != self.role_attribute {
                attrs.set(key, value.clone());
            }
        }
        if spec.required {
            attrs.set("required", true);
        }
        attrs.set(self.role_attribute, spec.role.as_str());

        page.scripts_mut().register_id(spec.id.as_str())?;
        Ok(html::input("text", &attrs))
    }

    /// Render an empty `<div>` an SDK-managed element mounts into
    pub fn render_container(&self, page: &mut PageContext, id: &str, attributes: &AttributeMap) -> Result<String> {
        page.scripts_mut().register_id(id)?;
        Ok(html::Tag::new("div").attr("id", id).attrs(attributes).render())
    }

    /// Render a text container scripts write into (errors, card brand)
    pub fn render_message(&self, page: &mut PageContext, id: &str, class: &str) -> Result<String> {
        page.scripts_mut().register_id(id)?;
        Ok(html::Tag::new("span").attr("id", id).attr("class", class).render())
    }

    /// Wrap rendered fields in a POST form; the form's `id`, if any, is registered
    pub fn render_form(
        &self,
        page: &mut PageContext,
        action: &str,
        attributes: &AttributeMap,
        body: &str,
    ) -> Result<String> {
        if let Some(id) = attributes.get_text("id") {
            page.scripts_mut().register_id(id)?;
        }
        Ok(format!("{}{body}{}", html::begin_form(action, "POST", attributes), html::end_form()))
    }
}
