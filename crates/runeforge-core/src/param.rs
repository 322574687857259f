//! Typed parameter bags attached to effect instances
//!
//! Parameters are authored loosely (a radius may be written as `4`, `4.0` or
//! `"3.0 + {level}"`), so every accessor takes a default and falls back to it
//! instead of failing.

use crate::formula::{self, Variables};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Free text: names (`"NIGHT_VISION"`) or formulas (`"damage * 0.25"`)
    Text(String),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Float(f) if f.is_finite() => Some(*f as i64),
            ParamValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            ParamValue::Text(s) => s.trim().parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(fl) => write!(f, "{}", fl),
            ParamValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Insertion-ordered parameter bag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectParams(IndexMap<String, ParamValue>);

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(ParamValue::as_int).unwrap_or(default)
    }

    pub fn float(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(ParamValue::as_float).unwrap_or(default)
    }

    pub fn boolean(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(ParamValue::as_bool).unwrap_or(default)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.text(key).unwrap_or(default)
    }

    /// Read a numeric parameter that may be written as a formula
    ///
    /// Numbers are returned as-is; text is evaluated against `vars` (so a
    /// malformed formula reads as `0.0`, not as the default). Absent keys and
    /// booleans yield `default`.
    pub fn number(&self, key: &str, vars: &Variables, default: f64) -> f64 {
        match self.get(key) {
            Some(ParamValue::Int(i)) => *i as f64,
            Some(ParamValue::Float(f)) => *f,
            Some(ParamValue::Text(s)) => formula::evaluate(s, vars),
            Some(ParamValue::Bool(_)) | None => default,
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for EffectParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors_fall_back_to_default() {
        let params = EffectParams::new()
            .with("radius", 4)
            .with("chance", 0.8)
            .with("ambient", false)
            .with("type", "night_vision");

        assert_eq!(params.int("radius", 1), 4);
        assert_eq!(params.float("radius", 1.0), 4.0);
        assert_eq!(params.float("chance", 1.0), 0.8);
        assert!(!params.boolean("ambient", true));
        assert_eq!(params.text("type"), Some("night_vision"));

        // Wrong type or absent
        assert_eq!(params.int("type", 7), 7);
        assert_eq!(params.float("missing", 2.5), 2.5);
        assert!(params.boolean("radius", true));
        assert_eq!(params.text_or("radius", "ENCHANT"), "ENCHANT");
    }

    #[test]
    fn test_numeric_text_is_parsed() {
        let params = EffectParams::new().with("amount", "3").with("flag", "true");
        assert_eq!(params.int("amount", 0), 3);
        assert_eq!(params.float("amount", 0.0), 3.0);
        assert!(params.boolean("flag", false));
    }

    #[test]
    fn test_number_evaluates_formulas() {
        let mut vars = Variables::new();
        vars.insert("level".to_string(), 2.0);
        vars.insert("damage".to_string(), 8.0);

        let params = EffectParams::new()
            .with("amount", "damage * 0.25")
            .with("radius", "3.0 + {level} * 1.0")
            .with("fixed", 4)
            .with("bad", "abc");

        assert_eq!(params.number("amount", &vars, 0.0), 2.0);
        assert_eq!(params.number("radius", &vars, 0.0), 5.0);
        assert_eq!(params.number("fixed", &vars, 0.0), 4.0);
        assert_eq!(params.number("bad", &vars, 9.0), 0.0);
        assert_eq!(params.number("missing", &vars, 9.0), 9.0);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let params: EffectParams = [("b", 1), ("a", 2)].into_iter().collect();
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
