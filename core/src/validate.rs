//! Schema and value validation.
//!
//! Two kinds of checks live here. [`validate_schema`] catches structural
//! problems in the declared options (empty names, duplicate identifiers,
//! aliases that collide) before a [`Schema`](crate::Schema) is built.
//! [`validate_value`] checks a bound value against an option's declared
//! [`OptionType`] at parse time.
//!
//! # Examples
//!
//! ```
//! use argflags_core::*;
//!
//! let flags = vec![OptionSpec::new("message").with_alias("m")];
//! assert!(validate_schema(&[], &flags).is_empty());
//!
//! // Invalid: alias reused by a second flag
//! let flags = vec![
//!     OptionSpec::new("message").with_alias("m"),
//!     OptionSpec::new("mode").with_alias("m"),
//! ];
//! assert!(!validate_schema(&[], &flags).is_empty());
//! ```

use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use crate::error::ParseError;
use crate::value::render_value;
use crate::{OptionSpec, OptionType};

/// Key reserved in the argument bag for leftover positional tokens.
pub const REST_KEY: &str = "_";

/// Schema validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Option name is empty or whitespace-only.
    #[error("option name cannot be empty")]
    EmptyName,
    /// An alias of the named option is empty or whitespace-only.
    #[error("alias of `{0}` cannot be empty")]
    EmptyAlias(String),
    /// An option lists its own name among its aliases.
    #[error("`{0}` lists itself as an alias")]
    AliasShadowsName(String),
    /// Two options in the same list share a name or alias.
    #[error("duplicate identifier in scope: {0}")]
    DuplicateIdentifier(String),
    /// A positional argument uses the key reserved for leftover tokens.
    #[error("argument name `{0}` is reserved")]
    ReservedName(String),
}

/// Validates both option lists of a schema.
///
/// Arguments and flags are separate scopes: an argument and a flag may share
/// an identifier because they bind into different bags. Validation stops at
/// the first problem.
///
/// # Examples
///
/// ```
/// use argflags_core::*;
///
/// let args = vec![OptionSpec::new("_")];
/// assert_eq!(
///     validate_schema(&args, &[]),
///     vec![ValidationError::ReservedName("_".to_string())]
/// );
///
/// // Same identifier in both scopes is fine
/// let args = vec![OptionSpec::new("name")];
/// let flags = vec![OptionSpec::new("name")];
/// assert!(validate_schema(&args, &flags).is_empty());
/// ```
pub fn validate_schema(args: &[OptionSpec], flags: &[OptionSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(reserved) = args.iter().find(|spec| spec.matches(REST_KEY)) {
        errors.push(ValidationError::ReservedName(reserved.name.clone()));
        return errors;
    }

    errors.extend(validate_options(args));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_options(flags));

    errors
}

fn validate_options(options: &[OptionSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for option in options {
        let name = option.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyName);
            return errors;
        }

        if !seen.insert(option.name.as_str()) {
            errors.push(ValidationError::DuplicateIdentifier(option.name.clone()));
            return errors;
        }

        for alias in &option.aliases {
            if alias.trim().is_empty() {
                errors.push(ValidationError::EmptyAlias(option.name.clone()));
                return errors;
            }
            if *alias == option.name {
                errors.push(ValidationError::AliasShadowsName(option.name.clone()));
                return errors;
            }
            if !seen.insert(alias.as_str()) {
                errors.push(ValidationError::DuplicateIdentifier(alias.clone()));
                return errors;
            }
        }
    }

    errors
}

/// Checks `value` against a declared type.
///
/// An undeclared type accepts every value. A pattern only accepts strings.
///
/// # Errors
///
/// Returns [`ParseError::UnsupportedType`] for [`OptionType::Other`].
///
/// # Examples
///
/// ```
/// use argflags_core::{OptionType, validate_value};
/// use serde_json::json;
///
/// assert!(validate_value(Some(&OptionType::Integer), &json!(17)).unwrap());
/// assert!(!validate_value(Some(&OptionType::Integer), &json!(1.5)).unwrap());
/// assert!(validate_value(None, &json!("anything")).unwrap());
/// assert!(validate_value(Some(&OptionType::Other("date".into())), &json!("x")).is_err());
/// ```
pub fn validate_value(kind: Option<&OptionType>, value: &Value) -> Result<bool, ParseError> {
    let Some(kind) = kind else {
        return Ok(true);
    };

    let valid = match kind {
        OptionType::String => value.is_string(),
        OptionType::Integer => is_integer(value),
        OptionType::Number => value.is_number(),
        OptionType::Boolean => value.is_boolean(),
        OptionType::Array => value.is_array(),
        OptionType::Function(predicate) => predicate(value),
        OptionType::Pattern(pattern) => value.as_str().is_some_and(|s| pattern.is_match(s)),
        OptionType::Other(name) => {
            return Err(ParseError::UnsupportedType {
                kind: name.clone(),
                value: render_value(value),
            });
        }
    };

    Ok(valid)
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_validate_schema_rejects_alias_collision() {
        let flags = vec![
            OptionSpec::new("int").with_aliases(["i", "integer"]),
            OptionSpec::new("input").with_alias("i"),
        ];

        let errors = validate_schema(&[], &flags);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateIdentifier("i".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_alias_matching_other_name() {
        let flags = vec![
            OptionSpec::new("message").with_alias("mode"),
            OptionSpec::new("mode"),
        ];

        let errors = validate_schema(&[], &flags);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateIdentifier("mode".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_self_alias() {
        let args = vec![OptionSpec::new("hello").with_alias("hello")];

        let errors = validate_schema(&args, &[]);
        assert_eq!(
            errors,
            vec![ValidationError::AliasShadowsName("hello".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_empty_names() {
        assert_eq!(
            validate_schema(&[OptionSpec::new("  ")], &[]),
            vec![ValidationError::EmptyName]
        );
        assert_eq!(
            validate_schema(&[], &[OptionSpec::new("x").with_alias("")]),
            vec![ValidationError::EmptyAlias("x".to_string())]
        );
    }

    #[test]
    fn test_validate_schema_rejects_reserved_alias() {
        let args = vec![OptionSpec::new("rest").with_alias("_")];

        assert_eq!(
            validate_schema(&args, &[]),
            vec![ValidationError::ReservedName("rest".to_string())]
        );
    }

    #[test]
    fn test_validate_value_builtin_types() {
        assert!(validate_value(Some(&OptionType::String), &json!("hi")).unwrap());
        assert!(!validate_value(Some(&OptionType::String), &json!(17)).unwrap());
        assert!(validate_value(Some(&OptionType::Integer), &json!(17)).unwrap());
        assert!(validate_value(Some(&OptionType::Integer), &json!(1000.0)).unwrap());
        assert!(!validate_value(Some(&OptionType::Integer), &json!("17")).unwrap());
        assert!(validate_value(Some(&OptionType::Number), &json!(1.5)).unwrap());
        assert!(!validate_value(Some(&OptionType::Number), &json!(true)).unwrap());
        assert!(validate_value(Some(&OptionType::Boolean), &json!(false)).unwrap());
        assert!(!validate_value(Some(&OptionType::Boolean), &json!("true")).unwrap());
        assert!(validate_value(Some(&OptionType::Array), &json!(["a", "b"])).unwrap());
        assert!(!validate_value(Some(&OptionType::Array), &json!("a")).unwrap());
    }

    #[test]
    fn test_validate_value_function_and_pattern() {
        let positive = OptionType::function(|v| v.as_f64().is_some_and(|n| n > 0.0));
        assert!(validate_value(Some(&positive), &json!(3)).unwrap());
        assert!(!validate_value(Some(&positive), &json!(-3)).unwrap());

        let version = OptionType::Pattern(Regex::new(r"^v\d+$").unwrap());
        assert!(validate_value(Some(&version), &json!("v12")).unwrap());
        assert!(!validate_value(Some(&version), &json!("12")).unwrap());
        assert!(!validate_value(Some(&version), &json!(12)).unwrap());
    }

    #[test]
    fn test_validate_value_unsupported_type() {
        let err = validate_value(Some(&OptionType::Other("date".into())), &json!("today"))
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnsupportedType { ref kind, ref value } if kind == "date" && value == "today"
        ));
    }
}
