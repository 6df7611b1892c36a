//! Parse results.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;
use serde_json::Value;

use crate::value::is_truthy;

static NULL: Value = Value::Null;

/// Values bound by one parse, keyed by name and alias.
///
/// The argument bag also carries the leftover positional tokens, exposed
/// through [`rest`](ParsedBag::rest) and serialized under `_`. Indexing with a
/// missing key yields `Value::Null`, mirroring [`serde_json::Value`].
///
/// # Examples
///
/// ```
/// use argflags_core::{Binder, OptionSpec, OptionType, Schema};
///
/// let schema = Schema::new(
///     Vec::new(),
///     vec![OptionSpec::typed("int", OptionType::Integer).with_alias("i")],
/// )
/// .unwrap();
/// let parsed = Binder::new(schema).parse(["-i", "17"]).unwrap();
///
/// assert_eq!(parsed.flags.get_i64("int"), Some(17));
/// assert_eq!(parsed.flags["i"], 17);
/// assert!(parsed.flags["missing"].is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedBag {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
    #[serde(rename = "_", skip_serializing_if = "Option::is_none")]
    rest: Option<Vec<Value>>,
}

impl ParsedBag {
    pub(crate) fn from_values(values: BTreeMap<String, Value>) -> Self {
        Self { values, rest: None }
    }

    pub(crate) fn with_rest(rest: Vec<Value>) -> Self {
        Self {
            values: BTreeMap::new(),
            rest: Some(rest),
        }
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Returns the value bound under `key`, if any was bound.
    ///
    /// An option that was resolved without a value is bound to `Value::Null`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns `true` if `key` was bound, even to `Value::Null`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns `true` if `key` holds a truthy value.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    /// Leftover positional tokens, in input order. Empty for the flag bag.
    pub fn rest(&self) -> &[Value] {
        self.rest.as_deref().unwrap_or(&[])
    }

    /// All bound values, sorted by key.
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<&str> for ParsedBag {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }
}

/// Result of [`Binder::parse`](crate::Binder::parse).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Parsed {
    /// Positional arguments, plus the leftover tokens under `_`.
    pub args: ParsedBag,
    /// Flags.
    pub flags: ParsedBag,
}
