//! Schema type definitions for argument and flag declarations.
//!
//! This module defines the data model a caller uses to describe what a
//! command line is expected to contain: positional arguments bound by order
//! and named flags bound by name or alias. The types deserialize from YAML and
//! JSON documents with [`serde`], so a schema can live next to the program
//! that uses it.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::validate::{ValidationError, validate_schema};

/// Caller-supplied predicate used by [`OptionType::Function`].
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Zero-argument producer used by [`DefaultValue::Thunk`].
pub type Thunk = Arc<dyn Fn() -> Value + Send + Sync>;

/// Declared type of an argument or flag.
///
/// In a schema document the type is written as a name (`"string"`,
/// `"integer"`, `"number"`, `"boolean"`, `"array"`) or as a `/pattern/`
/// string. Names the validator does not know are kept as
/// [`OptionType::Other`] and rejected when a value is checked against them.
///
/// # Examples
///
/// ```
/// use argflags_core::OptionType;
///
/// let kind = OptionType::try_from("integer".to_string()).unwrap();
/// assert!(matches!(kind, OptionType::Integer));
/// assert_eq!(kind.to_string(), "integer");
///
/// let pattern = OptionType::try_from("/^v\\d+$/".to_string()).unwrap();
/// assert!(matches!(pattern, OptionType::Pattern(_)));
/// ```
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub enum OptionType {
    /// Value must be a string.
    String,
    /// Value must be a whole number.
    Integer,
    /// Value must be numeric.
    Number,
    /// Value must be a boolean.
    Boolean,
    /// Value must be an array (repeated flag).
    Array,
    /// Value must satisfy a caller-supplied predicate.
    Function(Predicate),
    /// Value must be a string matching the pattern.
    Pattern(Regex),
    /// A type name the validator does not support.
    Other(String),
}

impl OptionType {
    /// Wraps a predicate closure as a [`OptionType::Function`].
    ///
    /// # Examples
    ///
    /// ```
    /// use argflags_core::OptionType;
    ///
    /// let even = OptionType::function(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
    /// assert_eq!(even.to_string(), "function");
    /// ```
    pub fn function<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Function(Arc::new(predicate))
    }
}

impl TryFrom<String> for OptionType {
    type Error = regex::Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        let kind = match name.as_str() {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            _ => match name
                .strip_prefix('/')
                .and_then(|rest| rest.strip_suffix('/'))
            {
                Some(pattern) => Self::Pattern(Regex::new(pattern)?),
                None => Self::Other(name),
            },
        };
        Ok(kind)
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Array => f.write_str("array"),
            Self::Function(_) => f.write_str("function"),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
            Self::Other(name) => f.write_str(name),
        }
    }
}

impl fmt::Debug for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Other(name) => f.debug_tuple("Other").field(name).finish(),
            other => write!(f, "{}", capitalize(&other.to_string())),
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Default for an option that was not supplied.
///
/// A [`Thunk`](DefaultValue::Thunk) is evaluated every time it is needed and
/// its result is never cached between parses. Schema documents can only carry
/// literals.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value.
    Literal(Value),
    /// A function producing the value on demand.
    Thunk(Thunk),
}

impl DefaultValue {
    /// Produces the default, calling the thunk if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use argflags_core::DefaultValue;
    /// use serde_json::json;
    ///
    /// assert_eq!(DefaultValue::Literal(json!(5)).resolve(), json!(5));
    /// let lazy = DefaultValue::Thunk(Arc::new(|| json!("hi")));
    /// assert_eq!(lazy.resolve(), json!("hi"));
    /// ```
    pub fn resolve(&self) -> Value {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Thunk(produce) => produce(),
        }
    }
}

impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::Literal)
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

/// One declared argument or flag.
///
/// Build specs with [`new`](OptionSpec::new) and chain builder methods, or
/// deserialize them from a schema document where `alias` may be a single
/// string or a list and `description` is accepted in place of `help`.
///
/// # Examples
///
/// ```
/// use argflags_core::{OptionSpec, OptionType};
///
/// let int = OptionSpec::new("int")
///     .with_type(OptionType::Integer)
///     .with_aliases(["i", "integer"])
///     .with_default(1)
///     .with_help("an integer argument");
///
/// assert_eq!(int.identifiers().collect::<Vec<_>>(), vec!["int", "i", "integer"]);
/// assert!(int.matches("integer"));
/// assert!(!int.required);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct OptionSpec {
    /// Canonical name; the key the value is bound under.
    pub name: String,
    /// Alternate identifiers that mirror the canonical value.
    #[serde(default, alias = "alias", deserialize_with = "one_or_many")]
    pub aliases: Vec<String>,
    /// Declared type (`None` accepts anything).
    #[serde(default, rename = "type")]
    pub kind: Option<OptionType>,
    /// Whether a value (supplied or defaulted) must be present.
    #[serde(default)]
    pub required: bool,
    /// Value used when none was supplied.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Help text shown in the right column.
    #[serde(default, alias = "description")]
    pub help: Option<String>,
}

impl OptionSpec {
    /// Creates an untyped, optional spec with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            kind: None,
            required: false,
            default: None,
            help: None,
        }
    }

    /// Creates a spec with a declared type.
    ///
    /// # Examples
    ///
    /// ```
    /// use argflags_core::{OptionSpec, OptionType};
    ///
    /// let flag = OptionSpec::typed("message", OptionType::Boolean);
    /// assert!(matches!(flag.kind, Some(OptionType::Boolean)));
    /// ```
    pub fn typed(name: &str, kind: OptionType) -> Self {
        Self::new(name).with_type(kind)
    }

    /// Sets the declared type.
    pub fn with_type(mut self, kind: OptionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Adds one alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds several aliases, keeping their order.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets a literal default.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Sets a default computed on each parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use argflags_core::OptionSpec;
    /// use serde_json::json;
    ///
    /// let spec = OptionSpec::new("hello").with_default_fn(|| json!("hi"));
    /// assert_eq!(spec.default.unwrap().resolve(), json!("hi"));
    /// ```
    pub fn with_default_fn<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Thunk(Arc::new(produce)));
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Canonical name followed by every alias.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Checks if `id` is the name or one of the aliases.
    pub fn matches(&self, id: &str) -> bool {
        self.identifiers().any(|candidate| candidate == id)
    }

    /// Returns `true` if the declared type is boolean.
    pub fn is_boolean(&self) -> bool {
        matches!(self.kind, Some(OptionType::Boolean))
    }

    /// Returns `true` if the declared type is string.
    pub fn is_string(&self) -> bool {
        matches!(self.kind, Some(OptionType::String))
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(alias) => vec![alias],
        OneOrMany::Many(aliases) => aliases,
    })
}

/// Complete declaration of a command line: positional arguments and flags.
///
/// A schema is validated once on construction and never changes afterwards,
/// so it can be shared freely between threads and parses.
///
/// # Examples
///
/// ```
/// use argflags_core::{OptionSpec, OptionType, Schema};
///
/// let schema = Schema::new(
///     vec![OptionSpec::typed("hello", OptionType::String)],
///     vec![OptionSpec::typed("message", OptionType::Boolean).with_alias("m")],
/// )
/// .unwrap();
///
/// assert_eq!(schema.args().len(), 1);
/// assert_eq!(schema.find_flag("m").unwrap().name, "message");
/// assert!(schema.find_flag("x").is_none());
/// assert_eq!(schema.find_arg("hello").unwrap().name, "hello");
/// assert!(schema.find_arg("message").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    args: Vec<OptionSpec>,
    flags: Vec<OptionSpec>,
}

impl Schema {
    /// Creates a schema, rejecting duplicate or colliding identifiers.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in either list.
    pub fn new(args: Vec<OptionSpec>, flags: Vec<OptionSpec>) -> Result<Self, ValidationError> {
        if let Some(error) = validate_schema(&args, &flags).into_iter().next() {
            return Err(error);
        }
        Ok(Self { args, flags })
    }

    /// Positional argument specs in binding order.
    pub fn args(&self) -> &[OptionSpec] {
        &self.args
    }

    /// Flag specs in display order.
    pub fn flags(&self) -> &[OptionSpec] {
        &self.flags
    }

    /// Finds a positional argument spec by name or alias.
    pub fn find_arg(&self, id: &str) -> Option<&OptionSpec> {
        self.args.iter().find(|spec| spec.matches(id))
    }

    /// Finds a flag spec by name or alias.
    pub fn find_flag(&self, id: &str) -> Option<&OptionSpec> {
        self.flags.iter().find(|spec| spec.matches(id))
    }

    /// Returns `true` if the schema declares nothing.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_option_spec_builder() {
        let spec = OptionSpec::typed("int", OptionType::Integer)
            .with_alias("i")
            .required()
            .with_help("an integer argument");

        assert_eq!(spec.name, "int");
        assert_eq!(spec.aliases, vec!["i"]);
        assert!(spec.required);
        assert_eq!(spec.help.as_deref(), Some("an integer argument"));
        assert!(!spec.is_boolean());
    }

    #[test]
    fn test_option_type_from_name() {
        assert!(matches!(
            OptionType::try_from("boolean".to_string()),
            Ok(OptionType::Boolean)
        ));
        assert!(matches!(
            OptionType::try_from("date".to_string()),
            Ok(OptionType::Other(name)) if name == "date"
        ));
        assert!(OptionType::try_from("/[unclosed/".to_string()).is_err());
    }

    #[test]
    fn test_option_type_debug() {
        assert_eq!(format!("{:?}", OptionType::Integer), "Integer");
        assert_eq!(
            format!("{:?}", OptionType::function(|_| true)),
            "Function(..)"
        );
    }

    #[test]
    fn test_deserialize_alias_forms() {
        let single: OptionSpec =
            serde_yaml::from_str("{ name: message, alias: m, type: boolean }").unwrap();
        assert_eq!(single.aliases, vec!["m"]);
        assert!(single.is_boolean());

        let many: OptionSpec = serde_json::from_value(json!({
            "name": "int",
            "alias": ["i", "integer"],
            "type": "integer",
            "default": 1,
            "description": "an integer argument"
        }))
        .unwrap();
        assert_eq!(many.aliases, vec!["i", "integer"]);
        assert_eq!(many.default.unwrap().resolve(), json!(1));
        assert_eq!(many.help.as_deref(), Some("an integer argument"));
    }

    #[test]
    fn test_default_thunk_is_not_cached() {
        let counter = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = Arc::clone(&counter);
        let spec = OptionSpec::new("n").with_default_fn(move || {
            json!(seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
        });
        let default = spec.default.unwrap();

        assert_eq!(default.resolve(), json!(0));
        assert_eq!(default.resolve(), json!(1));
    }

    #[test]
    fn test_schema_rejects_duplicate_flag() {
        let result = Schema::new(
            Vec::new(),
            vec![OptionSpec::new("int"), OptionSpec::new("int")],
        );
        assert_eq!(
            result.unwrap_err(),
            ValidationError::DuplicateIdentifier("int".to_string())
        );
    }
}
