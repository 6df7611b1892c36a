//! Splitting raw command-line tokens into positionals and flag values.
//!
//! The binder never looks at raw tokens itself. It hands them to a
//! [`Tokenizer`] together with a [`TokenizerConfig`] derived from the flag
//! schema and works from the resulting [`Tokenized`] output.
//! [`DefaultTokenizer`] understands the common Unix conventions:
//!
//! - `--name=value`, `--name value`, bare `--name` and `--no-name`
//! - short clusters (`-abc`), attached values (`-n5`, `-o=out.txt`)
//! - `--` stops flag parsing; everything after it is positional
//! - numeric-looking values become numbers unless the flag is string-typed
//! - repeating a flag collects its values into an array
//! - every value is written under the flag's name and all of its aliases
//!
//! # Examples
//!
//! ```
//! use argflags_core::{DefaultTokenizer, Tokenizer, TokenizerConfig};
//! use serde_json::json;
//!
//! let mut config = TokenizerConfig::default();
//! config.boolean.insert("message".to_string());
//! config.alias.insert("message".to_string(), vec!["m".to_string()]);
//!
//! let tokens: Vec<String> = ["hi", "-m", "--int", "17"].map(String::from).to_vec();
//! let out = DefaultTokenizer.tokenize(&tokens, &config);
//!
//! assert_eq!(out.positionals, vec![json!("hi")]);
//! assert_eq!(out.flags["message"], json!(true));
//! assert_eq!(out.flags["m"], json!(true));
//! assert_eq!(out.flags["int"], json!(17));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};
use tracing::{debug, trace};

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?$").expect("static regex must compile")
});
static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^0x[0-9a-f]+$").expect("static regex must compile"));
static ATTACHED_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d+(?:\.\d*)?(?:e-?\d+)?$").expect("static regex must compile")
});

/// Tokenizer hints derived from the flag schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Flags that never take a value.
    pub boolean: BTreeSet<String>,
    /// Flags whose values stay strings even when they look numeric.
    pub string: BTreeSet<String>,
    /// Canonical flag name to its aliases.
    pub alias: BTreeMap<String, Vec<String>>,
}

/// Output of a [`Tokenizer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokenized {
    /// Tokens that were not consumed as flags or flag values, in order.
    pub positionals: Vec<Value>,
    /// Raw flag values keyed by every name and alias that was set.
    pub flags: BTreeMap<String, Value>,
}

/// Turns raw tokens into positionals and flag values.
///
/// Implement this to swap in different token conventions; the binder only
/// relies on the [`Tokenized`] shape.
pub trait Tokenizer {
    /// Tokenizes `tokens` using the hints in `config`.
    fn tokenize(&self, tokens: &[String], config: &TokenizerConfig) -> Tokenized;
}

/// Tokenizer used by [`Binder::new`](crate::Binder::new).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTokenizer;

impl Tokenizer for DefaultTokenizer {
    fn tokenize(&self, tokens: &[String], config: &TokenizerConfig) -> Tokenized {
        let mut session = Session::new(config);
        for name in &config.boolean {
            session.set_arg(name, Value::Bool(false));
        }

        let mut index = 0;
        while index < tokens.len() {
            let token = tokens[index].as_str();
            let next = tokens.get(index + 1).map(String::as_str);

            if token == "--" {
                trace!(remaining = tokens.len() - index - 1, "end of flags");
                session
                    .out
                    .positionals
                    .extend(tokens[index + 1..].iter().cloned().map(Value::String));
                break;
            }

            if let Some(body) = token.strip_prefix("--") {
                if let Some((key, raw)) = body.split_once('=') {
                    session.set_assigned(key, raw);
                } else if let Some(key) = body.strip_prefix("no-") {
                    session.set_arg(key, Value::Bool(false));
                } else {
                    index += session.set_with_next(body, next);
                }
            } else if token.len() > 1 && token.starts_with('-') {
                index += session.set_cluster(&token[1..], next);
            } else {
                let value = coerce_number(token).unwrap_or_else(|| Value::String(token.to_string()));
                session.out.positionals.push(value);
            }

            index += 1;
        }

        debug!(
            positionals = session.out.positionals.len(),
            flags = session.out.flags.len(),
            "Tokenized input"
        );
        session.out
    }
}

/// State for a single tokenize call.
struct Session<'a> {
    config: &'a TokenizerConfig,
    /// Every identifier mapped to the other members of its alias group.
    groups: HashMap<&'a str, Vec<&'a str>>,
    out: Tokenized,
}

impl<'a> Session<'a> {
    fn new(config: &'a TokenizerConfig) -> Self {
        let mut groups: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for (name, aliases) in &config.alias {
            let members: Vec<&'a str> = std::iter::once(name.as_str())
                .chain(aliases.iter().map(String::as_str))
                .collect();
            for &member in &members {
                let group = groups.entry(member).or_default();
                for &other in &members {
                    if other != member && !group.contains(&other) {
                        group.push(other);
                    }
                }
            }
        }

        Self {
            config,
            groups,
            out: Tokenized::default(),
        }
    }

    fn aliases_of(&self, key: &str) -> &[&'a str] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn in_group(&self, set: &BTreeSet<String>, key: &str) -> bool {
        set.contains(key) || self.aliases_of(key).iter().any(|alias| set.contains(*alias))
    }

    fn is_boolean(&self, key: &str) -> bool {
        self.in_group(&self.config.boolean, key)
    }

    fn is_string(&self, key: &str) -> bool {
        self.in_group(&self.config.string, key)
    }

    /// Value of a flag given without a value.
    fn bare_value(&self, key: &str) -> Value {
        if self.is_string(key) {
            Value::String(String::new())
        } else {
            Value::Bool(true)
        }
    }

    /// Handles `key=raw`; boolean flags read anything but `false` as true.
    fn set_assigned(&mut self, key: &str, raw: &str) {
        let value = if self.is_boolean(key) {
            Value::Bool(raw != "false")
        } else {
            Value::String(raw.to_string())
        };
        self.set_arg(key, value);
    }

    /// Sets `key`, consuming the following token as its value when it can.
    /// Returns the number of extra tokens consumed.
    fn set_with_next(&mut self, key: &str, next: Option<&str>) -> usize {
        match next {
            Some(next) if !looks_like_flag(next) && !self.is_boolean(key) => {
                self.set_arg(key, Value::String(next.to_string()));
                1
            }
            Some(next @ ("true" | "false")) => {
                self.set_arg(key, Value::Bool(next == "true"));
                1
            }
            _ => {
                let bare = self.bare_value(key);
                self.set_arg(key, bare);
                0
            }
        }
    }

    /// Handles a short cluster such as `abc`, `n5` or `o=file`.
    fn set_cluster(&mut self, body: &str, next: Option<&str>) -> usize {
        let chars: Vec<char> = body.chars().collect();
        let Some((&last, letters)) = chars.split_last() else {
            return 0;
        };

        for (j, &letter) in letters.iter().enumerate() {
            let key = letter.to_string();
            let tail: String = chars[j + 1..].iter().collect();

            if tail == "-" {
                self.set_arg(&key, Value::String(tail));
                continue;
            }
            if letter.is_ascii_alphabetic() {
                if let Some(raw) = tail.strip_prefix('=') {
                    self.set_assigned(&key, raw);
                    return 0;
                }
                if ATTACHED_NUMBER_RE.is_match(&tail) {
                    self.set_arg(&key, Value::String(tail));
                    return 0;
                }
            }
            if letters
                .get(j + 1)
                .is_some_and(|c| !(c.is_alphanumeric() || *c == '_'))
            {
                self.set_arg(&key, Value::String(tail));
                return 0;
            }

            let bare = self.bare_value(&key);
            self.set_arg(&key, bare);
        }

        if last == '-' {
            return 0;
        }
        self.set_with_next(&last.to_string(), next)
    }

    /// Writes a value under `key` and every alias of `key`.
    fn set_arg(&mut self, key: &str, value: Value) {
        let value = match value {
            Value::String(raw) if !self.is_string(key) => {
                coerce_number(&raw).unwrap_or(Value::String(raw))
            }
            other => other,
        };
        trace!(key, value = %value, "Setting flag");

        let boolean = self.is_boolean(key);
        let aliases = self.aliases_of(key).to_vec();
        self.set_key(key, value.clone(), boolean);
        for alias in aliases {
            self.set_key(alias, value.clone(), boolean);
        }
    }

    /// Stores a value, turning repeated non-boolean values into an array.
    fn set_key(&mut self, key: &str, value: Value, boolean: bool) {
        let accumulate = !boolean
            && self
                .out
                .flags
                .get(key)
                .is_some_and(|existing| !existing.is_boolean());
        if !accumulate {
            self.out.flags.insert(key.to_string(), value);
            return;
        }

        if let Some(existing) = self.out.flags.get_mut(key) {
            match existing {
                Value::Array(items) => items.push(value),
                _ => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }
    }
}

/// Matches `-x` and `--x` but not `-`, `--` or `---x`.
fn looks_like_flag(token: &str) -> bool {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c != '-')
}

/// Converts a numeric-looking token (decimal, exponent or `0x` hex).
fn coerce_number(raw: &str) -> Option<Value> {
    if HEX_RE.is_match(raw) {
        return i64::from_str_radix(&raw[2..], 16).ok().map(Value::from);
    }
    if !NUMBER_RE.is_match(raw) {
        return None;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Value::from(n));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
