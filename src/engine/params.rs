use std::collections::BTreeMap;

use crate::foundation::core::Rgba8;

/// A single animation parameter value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean toggle.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Free text, colors (`#RRGGBB`) and select options.
    Text(String),
}

impl ParamValue {
    /// Interpret a command-line style value: `true`/`false`, a number, or text.
    pub fn parse_loose(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_owned()),
        }
    }

    /// Numeric view of the value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean view of the value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view of the value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Mapping from parameter name to value.
///
/// Lookups take a fallback so modules keep working when a key is missing or has the wrong type.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, ParamValue>);

impl Parameters {
    /// Empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace one value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Shallow merge: every key of `partial` overwrites the key here.
    pub fn merge(&mut self, partial: &Parameters) {
        for (k, v) in &partial.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no key is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Numeric value or `fallback`.
    pub fn number(&self, key: &str, fallback: f64) -> f64 {
        self.get(key).and_then(ParamValue::as_f64).unwrap_or(fallback)
    }

    /// Boolean value or `fallback`.
    pub fn boolean(&self, key: &str, fallback: bool) -> bool {
        self.get(key)
            .and_then(ParamValue::as_bool)
            .unwrap_or(fallback)
    }

    /// Text value or `fallback`.
    pub fn text<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).and_then(ParamValue::as_str).unwrap_or(fallback)
    }

    /// Hex color value or `fallback` when missing or unparsable.
    pub fn color(&self, key: &str, fallback: Rgba8) -> Rgba8 {
        self.get(key)
            .and_then(ParamValue::as_str)
            .and_then(|s| Rgba8::from_hex(s).ok())
            .unwrap_or(fallback)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/params.rs"]
mod tests;
