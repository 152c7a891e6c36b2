//! Inline style dictionaries.
//!
//! Configuration accepts the camelCase keys used by `element.style` in
//! JavaScript (`boxSizing`) as well as plain CSS property names
//! (`box-sizing`). Keys are normalised to CSS property names on insert so
//! hosts can pass them straight to `style.setProperty`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// An ordered map of CSS property names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleMap(BTreeMap<String, String>);

impl StyleMap {
    /// Create an empty style map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, normalising the key to its CSS name.
    pub fn insert(&mut self, property: &str, value: impl Into<String>) {
        self.0.insert(css_property_name(property), value.into());
    }

    /// Look up a property by CSS or camelCase name.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(&css_property_name(property)).map(String::as_str)
    }

    /// Overlay `other` on top of `self`: keys in `other` win, others are kept.
    pub fn merge(&mut self, other: &StyleMap) {
        for (property, value) in &other.0 {
            self.0.insert(property.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = StyleMap::new();
        for (property, value) in iter {
            map.insert(property.as_ref(), value);
        }
        map
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, StyleValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(property, value)| (property, value.into_css()))
            .collect())
    }
}

/// Style values may be written as strings or bare numbers (`zIndex: 10`).
#[derive(Deserialize)]
#[serde(untagged)]
enum StyleValue {
    Text(String),
    Number(f64),
}

impl StyleValue {
    fn into_css(self) -> String {
        match self {
            StyleValue::Text(text) => text,
            StyleValue::Number(n) => n.to_string(),
        }
    }
}

/// Convert a camelCase style key into a CSS property name.
///
/// Vendor-prefixed keys (`webkitUserSelect`, `mozUserSelect`,
/// `msUserSelect`) gain the leading dash. Names that already contain a dash
/// or have no uppercase letters pass through unchanged.
pub fn css_property_name(key: &str) -> String {
    if key.contains('-') || !key.chars().any(|c| c.is_ascii_uppercase()) {
        return key.to_string();
    }

    let mut name = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            if i == 0 && is_vendor_prefixed(key) {
                name.push('-');
            }
            name.push(c);
        }
    }
    name
}

fn is_vendor_prefixed(key: &str) -> bool {
    ["webkit", "moz", "ms"].iter().any(|prefix| {
        key.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase())
    })
}

/// Format a pixel length the way `${value}px` renders in the browser.
pub fn px(value: f64) -> String {
    // -0 would render as "-0px"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}px", value)
}
