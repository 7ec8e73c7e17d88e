//! HTML Attribute Maps
//!
//! Ordered attribute maps and the merge/validate rules every widget applies
//! to caller-supplied options before rendering a tag.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, WidgetError};

/// Attributes that must never appear on an input carrying card data.
///
/// A `name` would make the browser post the raw value to the origin server.
pub const FORBIDDEN_CARD_ATTRIBUTES: &[&str] = &["name"];

/// A single attribute value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// `true` renders the bare attribute, `false` omits it
    Bool(bool),
    Int(i64),
    Text(String),
}

impl AttrValue {
    /// Render booleans as the strings `"true"` / `"false"`.
    ///
    /// Data attributes read by the provider SDK expect the text form rather
    /// than HTML boolean-attribute semantics.
    pub fn into_text_bool(self) -> Self {
        match self {
            AttrValue::Bool(b) => AttrValue::Text(if b { "true" } else { "false" }.into()),
            other => other,
        }
    }

    /// Text form of the value (`None` for `false`)
    pub fn as_text(&self) -> Option<String> {
        match self {
            AttrValue::Bool(true) => Some(String::new()),
            AttrValue::Bool(false) => None,
            AttrValue::Int(n) => Some(n.to_string()),
            AttrValue::Text(s) => Some(s.clone()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<u32> for AttrValue {
    fn from(value: u32) -> Self {
        AttrValue::Int(i64::from(value))
    }
}

/// Insertion-ordered attribute map
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, AttrValue)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`AttributeMap::set`]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Set an attribute only when a value is present
    pub fn set_opt<V: Into<AttrValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Set an attribute only if the key is not present yet
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        let key = key.into();
        if !self.contains(&key) {
            self.entries.push((key, value.into()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Text value of an attribute, if it is set to something renderable
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(AttrValue::as_text)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.set(key, value);
        }
        map
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = AttributeMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of HTML attributes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<AttributeMap, A::Error> {
                let mut map = AttributeMap::new();
                while let Some((key, value)) = access.next_entry::<String, AttrValue>()? {
                    map.set(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

// ============================================================================
// Merge & Validate
// ============================================================================

/// Merge caller overrides onto defaults.
///
/// Overrides win key by key; keys only present in `defaults` keep their
/// default value and position.
pub fn merge(defaults: &AttributeMap, overrides: &AttributeMap) -> AttributeMap {
    let mut merged = defaults.clone();
    for (key, value) in overrides.iter() {
        merged.set(key, value.clone());
    }
    merged
}

/// Whether `key` is a well-formed HTML attribute name.
///
/// Browsers split a malformed name into several attributes, so such keys
/// are never rendered.
pub fn is_valid_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '\'' | '=' | '<' | '>' | '/'))
}

/// Reject attribute maps that would leak card data to the origin server.
///
/// Attribute names are case-insensitive in HTML, and a malformed key can
/// smuggle in a second attribute, so both are rejected.
pub fn validate_card_field(field: &str, attributes: &AttributeMap) -> Result<()> {
    let rejected = attributes.keys().find(|key| {
        !is_valid_name(key)
            || FORBIDDEN_CARD_ATTRIBUTES
                .iter()
                .any(|forbidden| key.eq_ignore_ascii_case(forbidden))
    });

    if let Some(attribute) = rejected {
        tracing::warn!(field = %field, attribute = %attribute, "Rejected card field attributes");
        return Err(WidgetError::ForbiddenAttribute {
            field: field.to_string(),
            attribute: attribute.to_string(),
        });
    }

    Ok(())
}
