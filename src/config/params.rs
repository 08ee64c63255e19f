use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Free-form parameter table attached to a layout or animation entry
///
/// Each layout strategy and animation kind defines its own parameters; they
/// are read through a [`ParamReader`] which reports offending fields by their
/// full path in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value
    pub fn set<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Flexible parameter value that can hold different types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl ParamValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Non-negative whole number; floats are accepted when integral
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ParamValue::Integer(i) if *i >= 0 => Some(*i as u64),
            ParamValue::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Integer(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

/// Typed, bounds-checked access to a [`Params`] table
///
/// Every key that is read is remembered so [`ParamReader::finish`] can reject
/// keys the consumer never asked for.
pub struct ParamReader<'a> {
    params: &'a Params,
    path: String,
    consumed: Vec<&'static str>,
}

impl<'a> ParamReader<'a> {
    /// `path` is the document location of the table, e.g. `layout.config`
    pub fn new<S: Into<String>>(params: &'a Params, path: S) -> Self {
        Self {
            params,
            path: path.into(),
            consumed: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Full document path for a key in this table
    pub fn field(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Error naming `key` and the received value
    pub fn invalid<V: ToString>(&self, key: &str, value: V) -> crate::error::CompositorError {
        ConfigError::InvalidValue {
            key: self.field(key),
            value: value.to_string(),
        }
        .into()
    }

    fn take(&mut self, key: &'static str) -> Option<&'a ParamValue> {
        self.consumed.push(key);
        self.params.get(key)
    }

    /// Which of `key` or its older spelling `alias` to read
    ///
    /// Setting both is rejected.
    pub fn pick(&mut self, key: &'static str, alias: &'static str) -> Result<&'static str> {
        match (self.params.get(key), self.params.get(alias)) {
            (Some(_), Some(value)) => Err(self.invalid(alias, value)),
            (None, Some(_)) => {
                self.consumed.push(key);
                Ok(alias)
            }
            _ => {
                self.consumed.push(alias);
                Ok(key)
            }
        }
    }

    pub fn f64_or(&mut self, key: &'static str, default: f64) -> Result<f64> {
        match self.take(key) {
            None => Ok(default),
            Some(value) => match value.as_f64() {
                Some(v) if v.is_finite() => Ok(v),
                _ => Err(self.invalid(key, value)),
            },
        }
    }

    /// Float that must be `>= 0`
    pub fn non_negative_or(&mut self, key: &'static str, default: f64) -> Result<f64> {
        let value = self.f64_or(key, default)?;
        if value < 0.0 {
            return Err(self.invalid(key, value));
        }
        Ok(value)
    }

    /// Float in `[0, max]`
    pub fn at_most_or(&mut self, key: &'static str, default: f64, max: f64) -> Result<f64> {
        let value = self.non_negative_or(key, default)?;
        if value > max {
            return Err(self.invalid(key, value));
        }
        Ok(value)
    }

    /// Fraction in `(0, 1]`
    pub fn unit_fraction_or(&mut self, key: &'static str, default: f64) -> Result<f64> {
        let value = self.f64_or(key, default)?;
        if !(value > 0.0 && value <= 1.0) {
            return Err(self.invalid(key, value));
        }
        Ok(value)
    }

    /// Fraction in `[0, 1)`
    pub fn margin_or(&mut self, key: &'static str, default: f64) -> Result<f64> {
        let value = self.f64_or(key, default)?;
        if !(0.0..1.0).contains(&value) {
            return Err(self.invalid(key, value));
        }
        Ok(value)
    }

    pub fn bool_or(&mut self, key: &'static str, default: bool) -> Result<bool> {
        match self.take(key) {
            None => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| self.invalid(key, value)),
        }
    }

    pub fn u32_or(&mut self, key: &'static str, default: u32) -> Result<u32> {
        match self.take(key) {
            None => Ok(default),
            Some(value) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| self.invalid(key, value)),
        }
    }

    pub fn optional_u64(&mut self, key: &'static str) -> Result<Option<u64>> {
        match self.take(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| self.invalid(key, value)),
        }
    }

    pub fn str_or(&mut self, key: &'static str, default: &'a str) -> Result<&'a str> {
        match self.take(key) {
            None => Ok(default),
            Some(value) => value.as_str().ok_or_else(|| self.invalid(key, value)),
        }
    }

    /// Reject any key that was never read
    pub fn finish(self) -> Result<()> {
        if let Some(unknown) = self
            .params
            .keys()
            .find(|key| !self.consumed.iter().any(|consumed| consumed == key))
        {
            let value = self.params.get(unknown).map(ToString::to_string).unwrap_or_default();
            return Err(ConfigError::InvalidValue {
                key: self.field(unknown),
                value,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompositorError;

    fn invalid_key(err: CompositorError) -> String {
        match err {
            CompositorError::Config(ConfigError::InvalidValue { key, .. }) => key,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_integer_and_float_parse_distinctly() {
        let params: Params = toml::from_str("a = 2\nb = 0.5\nc = true\nd = \"x\"").unwrap();
        assert_eq!(params.get("a"), Some(&ParamValue::Integer(2)));
        assert_eq!(params.get("b"), Some(&ParamValue::Float(0.5)));
        assert_eq!(params.get("c"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("d"), Some(&ParamValue::String("x".into())));
    }

    #[test]
    fn test_reader_defaults_and_bounds() {
        let params = Params::new().set("intensity", -0.5).set("frames", 4i64);
        let mut reader = ParamReader::new(&params, "strip_animations.Cam[0]");

        assert_eq!(reader.u32_or("frames", 2).unwrap(), 4);
        assert_eq!(reader.f64_or("missing", 1.5).unwrap(), 1.5);

        let err = reader.non_negative_or("intensity", 0.3).unwrap_err();
        assert_eq!(invalid_key(err), "strip_animations.Cam[0].intensity");
    }

    #[test]
    fn test_at_most_rejects_huge_values() {
        let params = Params::new().set("intensity", 1e308).set("degrees", 5.0);
        let mut reader = ParamReader::new(&params, "strip_animations.Cam[0]");

        assert_eq!(reader.at_most_or("degrees", 1.0, 360.0).unwrap(), 5.0);
        let err = reader.at_most_or("intensity", 10.0, 1e5).unwrap_err();
        assert_eq!(invalid_key(err), "strip_animations.Cam[0].intensity");
    }

    #[test]
    fn test_unit_fraction_rejects_zero() {
        let params = Params::new().set("pip_scale", 0.0);
        let mut reader = ParamReader::new(&params, "layout.config");
        assert!(reader.unit_fraction_or("pip_scale", 0.25).is_err());
    }

    #[test]
    fn test_finish_rejects_unknown_keys() {
        let params = Params::new().set("intensity", 0.2).set("speed", 3i64);
        let mut reader = ParamReader::new(&params, "layout.config");
        reader.f64_or("intensity", 0.0).unwrap();

        let err = reader.finish().unwrap_err();
        assert_eq!(invalid_key(err), "layout.config.speed");
    }

    #[test]
    fn test_pick_prefers_present_spelling() {
        let params = Params::new().set("degrees", 4.0);
        let mut reader = ParamReader::new(&params, "x");
        let key = reader.pick("wobble_degrees", "degrees").unwrap();
        assert_eq!(key, "degrees");
        assert_eq!(reader.f64_or(key, 1.0).unwrap(), 4.0);
        assert!(reader.finish().is_ok());

        let both = Params::new().set("degrees", 4.0).set("wobble_degrees", 2.0);
        let mut reader = ParamReader::new(&both, "x");
        assert!(reader.pick("wobble_degrees", "degrees").is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let params = Params::new().set("oscillate", "yes");
        let mut reader = ParamReader::new(&params, "x");
        assert!(reader.bool_or("oscillate", true).is_err());
    }
}
