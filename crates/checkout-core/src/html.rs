//! Tag Building
//!
//! Minimal HTML primitives: escaping, attribute rendering and the handful of
//! tags the widgets emit.

use crate::attributes::{self, AttrValue, AttributeMap};

/// Elements rendered without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// HTML-escape text for element content or attribute values
pub fn encode(text: &str) -> String {
    v_htmlescape::escape(text).to_string()
}

/// Render attributes as ` key="value"` pairs in map order.
///
/// `true` renders the bare attribute name, `false` omits it. Keys that are
/// not valid attribute names are dropped.
pub fn render_attributes(attributes: &AttributeMap) -> String {
    let mut out = String::new();
    for (key, value) in attributes.iter() {
        if !attributes::is_valid_name(key) {
            tracing::warn!(attribute = %key, "Dropped malformed attribute name");
            continue;
        }
        match value {
            AttrValue::Bool(false) => {}
            AttrValue::Bool(true) => {
                out.push(' ');
                out.push_str(&encode(key));
            }
            AttrValue::Int(n) => {
                out.push_str(&format!(" {}=\"{}\"", encode(key), n));
            }
            AttrValue::Text(text) => {
                out.push_str(&format!(" {}=\"{}\"", encode(key), encode(text)));
            }
        }
    }
    out
}

/// A single HTML element
#[derive(Clone, Debug, Default)]
pub struct Tag {
    name: String,
    attributes: AttributeMap,
    content: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Apply a whole attribute map; later keys win
    #[must_use]
    pub fn attrs(mut self, attributes: &AttributeMap) -> Self {
        for (key, value) in attributes.iter() {
            self.attributes.set(key, value.clone());
        }
        self
    }

    /// Set escaped text content
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.content = encode(text);
        self
    }

    /// Set raw (already safe) HTML content
    #[must_use]
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.content = html.into();
        self
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn render(&self) -> String {
        let open = format!("<{}{}>", self.name, render_attributes(&self.attributes));
        if VOID_ELEMENTS.contains(&self.name.as_str()) {
            open
        } else {
            format!("{open}{}</{}>", self.content, self.name)
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Opening form tag; `action` and `method` precede caller attributes
pub fn begin_form(action: &str, method: &str, attributes: &AttributeMap) -> String {
    let mut merged = AttributeMap::new()
        .with("action", action)
        .with("method", method.to_lowercase());
    for (key, value) in attributes.iter() {
        merged.set(key, value.clone());
    }
    format!("<form{}>", render_attributes(&merged))
}

pub fn end_form() -> &'static str {
    "</form>"
}

/// An input whose `type` defaults to `input_type` unless the attributes set one
pub fn input(input_type: &str, attributes: &AttributeMap) -> String {
    let mut merged = AttributeMap::new().with("type", input_type);
    for (key, value) in attributes.iter() {
        merged.set(key, value.clone());
    }
    Tag::new("input").attrs(&merged).render()
}

pub fn hidden_input(name: &str, value: &str) -> String {
    input(
        "hidden",
        &AttributeMap::new().with("name", name).with("value", value),
    )
}

/// A button; the label is escaped unless `encode_label` is false
pub fn button(label: &str, attributes: &AttributeMap, encode_label: bool) -> String {
    let tag = Tag::new("button").attrs(attributes);
    if encode_label {
        tag.text(label).render()
    } else {
        tag.html(label).render()
    }
}

/// A `<script>` tag loading an external file
pub fn script_file(src: &str, attributes: &AttributeMap) -> String {
    let mut merged = AttributeMap::new().with("src", src);
    for (key, value) in attributes.iter() {
        merged.set(key, value.clone());
    }
    Tag::new("script").attrs(&merged).render()
}

/// An inline `<script>` block
pub fn inline_script(js: &str) -> String {
    format!("<script>{js}</script>")
}
