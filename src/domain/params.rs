//! Named indicator parameters.

use crate::domain::error::TaframeError;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl ParamValue {
    /// Infer the narrowest type for a raw string: bool, then int, then float.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.to_lowercase().as_str() {
            "true" | "yes" => return ParamValue::Bool(true),
            "false" | "no" => return ParamValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return ParamValue::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return ParamValue::Float(f);
        }
        ParamValue::Text(raw.to_string())
    }
}

/// Parameter bag keyed by lowercase name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: ParamValue) {
        self.values.insert(key.to_lowercase(), value);
    }

    pub fn with(mut self, key: &str, value: ParamValue) -> Self {
        self.set(key, value);
        self
    }

    /// Parse `key=value` pairs as given on the command line.
    pub fn parse_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self, TaframeError> {
        let mut params = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                TaframeError::validation(format!("parameter '{pair}' is not key=value"))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(TaframeError::validation(format!(
                    "parameter '{pair}' has an empty key"
                )));
            }
            params.set(key, ParamValue::parse(value));
        }
        Ok(params)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(&key.to_lowercase())
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(ParamValue::Bool(b)) => *b,
            Some(ParamValue::Int(i)) => *i != 0,
            _ => default,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// A strictly positive window length; anything else falls back to `default`.
    pub fn length(&self, key: &str, default: usize) -> usize {
        match self.int(key) {
            Some(n) if n > 0 => n as usize,
            _ => default,
        }
    }

    /// Result shift in rows; 0 when absent.
    pub fn offset(&self) -> i64 {
        self.int("offset").unwrap_or(0)
    }
}
