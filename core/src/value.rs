//! Helpers for loosely typed values produced by the tokenizer.

use serde_json::Value;

/// Returns `true` unless the value is null, `false`, zero, NaN or `""`.
///
/// Empty arrays and objects count as truthy.
///
/// # Examples
///
/// ```
/// use argflags_core::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!("hi")));
/// assert!(is_truthy(&json!([])));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(null)));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a value the way it reads on a command line.
///
/// Strings are shown without quotes, arrays as comma-separated items and
/// null as the empty string.
///
/// # Examples
///
/// ```
/// use argflags_core::render_value;
/// use serde_json::json;
///
/// assert_eq!(render_value(&json!("hi")), "hi");
/// assert_eq!(render_value(&json!(17)), "17");
/// assert_eq!(render_value(&json!(["a", 1])), "a,1");
/// ```
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
