//! Binds tokenized input onto a [`Schema`].
//!
//! Parsing runs in three steps:
//!
//! 1. The [`Tokenizer`] splits the raw tokens into positionals and raw flag
//!    values, using hints derived from the flag schema.
//! 2. Positionals are bound to the declared arguments by index. A positional
//!    past the declared arguments is keyed by its own text, except `_`,
//!    which always holds the leftover sequence.
//! 3. Defaults and required checks are applied to both bags. Every value is
//!    checked against the option's type; the first failure aborts the parse.

use serde_json::Value;
use tracing::{debug, trace};

use crate::bag::{Parsed, ParsedBag};
use crate::error::{ParseError, Result};
use crate::help::{HelpOptions, render_args_help, render_flags_help, render_help};
use crate::tokenize::{DefaultTokenizer, Tokenizer, TokenizerConfig};
use crate::validate::{REST_KEY, validate_value};
use crate::value::{is_truthy, render_value};
use crate::{DefaultValue, OptionSpec, Schema};

/// Parses token lists against one immutable [`Schema`].
///
/// A binder holds no per-call state, so one instance can serve any number
/// of [`parse`](Binder::parse) and [`help`](Binder::help) calls, including
/// from several threads at once.
///
/// # Examples
///
/// ```
/// use argflags_core::{Binder, OptionSpec, OptionType, Schema};
/// use serde_json::json;
///
/// let schema = Schema::new(
///     vec![OptionSpec::typed("hello", OptionType::String)],
///     vec![
///         OptionSpec::typed("message", OptionType::Boolean).with_alias("m"),
///         OptionSpec::typed("int", OptionType::Integer).with_aliases(["i", "integer"]),
///     ],
/// )
/// .unwrap();
///
/// let parsed = Binder::new(schema).parse(["hi", "-m", "--int", "17"]).unwrap();
/// assert_eq!(parsed.args["hello"], "hi");
/// assert_eq!(parsed.args.rest(), &[json!("hi")]);
/// assert_eq!(parsed.flags["message"], true);
/// assert_eq!(parsed.flags["integer"], 17);
/// ```
#[derive(Debug, Clone)]
pub struct Binder<T = DefaultTokenizer> {
    schema: Schema,
    tokenizer: T,
    config: TokenizerConfig,
}

impl Binder<DefaultTokenizer> {
    /// Creates a binder using the [`DefaultTokenizer`].
    pub fn new(schema: Schema) -> Self {
        Self::with_tokenizer(schema, DefaultTokenizer)
    }
}

impl<T: Tokenizer> Binder<T> {
    /// Creates a binder with a custom tokenizer.
    pub fn with_tokenizer(schema: Schema, tokenizer: T) -> Self {
        let config = tokenizer_config(schema.flags());
        Self {
            schema,
            tokenizer,
            config,
        }
    }

    /// The schema every parse is checked against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Hints handed to the tokenizer on every parse.
    pub fn tokenizer_config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Parses `tokens` into bound arguments and flags.
    ///
    /// Default thunks are called once per option per call. Fails with the
    /// first [`ParseError`] encountered; no partial result is returned.
    pub fn parse<I>(&self, tokens: I) -> Result<Parsed>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let tokenized = self.tokenizer.tokenize(&tokens, &self.config);

        let mut args = self.bind_positionals(&tokenized.positionals)?;
        let mut flags = ParsedBag::from_values(tokenized.flags);

        resolve_options(self.schema.args(), &mut args)?;
        resolve_options(self.schema.flags(), &mut flags)?;

        debug!(
            args = args.len(),
            flags = flags.len(),
            rest = args.rest().len(),
            "Parsed input"
        );
        Ok(Parsed { args, flags })
    }

    /// Renders help for both sections. See [`render_help`].
    pub fn help(&self, options: &HelpOptions) -> String {
        render_help(&self.schema, options)
    }

    /// Renders only the argument section. See [`render_args_help`].
    pub fn args_help(&self, options: &HelpOptions) -> String {
        render_args_help(&self.schema, options)
    }

    /// Renders only the flag section. See [`render_flags_help`].
    pub fn flags_help(&self, options: &HelpOptions) -> String {
        render_flags_help(&self.schema, options)
    }

    fn bind_positionals(&self, positionals: &[Value]) -> Result<ParsedBag> {
        let mut bag = ParsedBag::with_rest(positionals.to_vec());

        for (index, token) in positionals.iter().enumerate() {
            let Some(spec) = self.schema.args().get(index) else {
                let key = render_value(token);
                trace!(index, key = %key, "extra positional");
                if key != REST_KEY {
                    bag.insert(key, token.clone());
                }
                continue;
            };

            check_type(spec, token)?;
            trace!(index, name = %spec.name, "bound positional");
            for id in spec.identifiers() {
                bag.insert(id, token.clone());
            }
        }

        Ok(bag)
    }
}

/// Applies defaults and required checks to every identifier of every option.
fn resolve_options(options: &[OptionSpec], bag: &mut ParsedBag) -> Result<()> {
    for option in options {
        let default = option
            .default
            .as_ref()
            .map(DefaultValue::resolve)
            .unwrap_or(Value::Null);

        for id in option.identifiers() {
            let present = bag.get(id).filter(|value| is_truthy(value)).cloned();
            match present {
                Some(value) => check_type(option, &value)?,
                None if option.required && !is_truthy(&default) => {
                    return Err(ParseError::MissingRequired(option.name.clone()));
                }
                None => {
                    trace!(option = %option.name, id, "applied default");
                    bag.insert(id, default.clone());
                }
            }
        }
    }
    Ok(())
}

fn check_type(option: &OptionSpec, value: &Value) -> Result<()> {
    if validate_value(option.kind.as_ref(), value)? {
        return Ok(());
    }

    let expected = option
        .kind
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    Err(ParseError::TypeMismatch {
        option: option.name.clone(),
        value: render_value(value),
        expected,
    })
}

fn tokenizer_config(flags: &[OptionSpec]) -> TokenizerConfig {
    let mut config = TokenizerConfig::default();
    for flag in flags {
        if flag.is_boolean() {
            config.boolean.insert(flag.name.clone());
        }
        if flag.is_string() {
            config.string.insert(flag.name.clone());
        }
        if !flag.aliases.is_empty() {
            config.alias.insert(flag.name.clone(), flag.aliases.clone());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::OptionType;
    use crate::tokenize::Tokenized;

    fn hello_schema() -> Schema {
        Schema::new(
            vec![OptionSpec::typed("hello", OptionType::String).with_help("an argument for saying hello")],
            vec![
                OptionSpec::typed("message", OptionType::Boolean)
                    .with_alias("m")
                    .with_help("a boolean argument"),
                OptionSpec::typed("int", OptionType::Integer)
                    .with_aliases(["i", "integer"])
                    .with_help("an integer argument"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_binds_args_and_flags() {
        let parsed = Binder::new(hello_schema())
            .parse(["hi", "-m", "--int", "17"])
            .unwrap();

        assert_eq!(parsed.args.get_str("hello"), Some("hi"));
        assert_eq!(parsed.args.rest(), &[json!("hi")]);
        assert_eq!(parsed.args.len(), 1);

        for id in ["message", "m"] {
            assert_eq!(parsed.flags[id], true, "flag {id}");
        }
        for id in ["int", "i", "integer"] {
            assert_eq!(parsed.flags[id], 17, "flag {id}");
        }
    }

    #[test]
    fn test_parse_serializes_like_a_plain_object() {
        let parsed = Binder::new(hello_schema())
            .parse(["hi", "-m", "--int", "17"])
            .unwrap();

        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            json!({
                "args": {"hello": "hi", "_": ["hi"]},
                "flags": {"message": true, "m": true, "int": 17, "i": 17, "integer": 17}
            })
        );
    }

    #[test]
    fn test_function_defaults() {
        let schema = Schema::new(
            vec![
                OptionSpec::typed("hello", OptionType::String)
                    .with_aliases(["hey", "hi"])
                    .with_default_fn(|| json!("hi")),
            ],
            vec![
                OptionSpec::typed("int", OptionType::Integer)
                    .with_aliases(["i", "integer"])
                    .with_default_fn(|| json!(1)),
            ],
        )
        .unwrap();

        let parsed = Binder::new(schema).parse(Vec::<String>::new()).unwrap();
        for id in ["hello", "hey", "hi"] {
            assert_eq!(parsed.args[id], "hi");
        }
        assert_eq!(parsed.flags.get_i64("int"), Some(1));
        assert!(parsed.flags.is_set("integer"));
        assert!(parsed.args.rest().is_empty());
    }

    #[test]
    fn test_empty_input_binds_every_flag_to_its_default() {
        let schema = Schema::new(
            Vec::new(),
            vec![
                OptionSpec::typed("toggle", OptionType::Boolean)
                    .with_alias("t")
                    .with_default(true),
                OptionSpec::typed("name", OptionType::String).with_default("anon"),
                OptionSpec::typed("quiet", OptionType::Boolean),
            ],
        )
        .unwrap();

        let parsed = Binder::new(schema).parse(Vec::<String>::new()).unwrap();
        assert_eq!(parsed.flags["toggle"], true);
        assert_eq!(parsed.flags["t"], true);
        assert_eq!(parsed.flags["name"], "anon");
        assert!(parsed.flags.contains("quiet"));
        assert!(parsed.flags["quiet"].is_null());
        assert!(parsed.args.rest().is_empty());
    }

    #[test]
    fn test_positional_integer_coercion() {
        let schema = Schema::new(
            vec![OptionSpec::typed("integer", OptionType::Integer)],
            Vec::new(),
        )
        .unwrap();
        let binder = Binder::new(schema);

        let parsed = binder.parse(["17"]).unwrap();
        assert_eq!(parsed.args.get_i64("integer"), Some(17));

        let err = binder.parse(["hi"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::TypeMismatch {
                option: "integer".to_string(),
                value: "hi".to_string(),
                expected: "integer".to_string(),
            }
        );
    }

    #[test]
    fn test_extra_positionals_are_keyed_by_themselves() {
        let schema = Schema::new(vec![OptionSpec::new("first")], Vec::new()).unwrap();
        let parsed = Binder::new(schema).parse(["a", "b", "7"]).unwrap();

        assert_eq!(parsed.args["first"], "a");
        assert_eq!(parsed.args["b"], "b");
        assert_eq!(parsed.args["7"], 7);
        assert_eq!(parsed.args.rest(), &[json!("a"), json!("b"), json!(7)]);
    }

    #[test]
    fn test_extra_underscore_positional_keeps_rest() {
        let schema = Schema::new(vec![OptionSpec::new("first")], Vec::new()).unwrap();
        let parsed = Binder::new(schema).parse(["a", "_"]).unwrap();

        assert!(!parsed.args.contains("_"));
        assert_eq!(parsed.args.rest(), &[json!("a"), json!("_")]);
        assert_eq!(
            serde_json::to_value(&parsed.args).unwrap(),
            json!({"first": "a", "_": ["a", "_"]})
        );
    }

    #[test]
    fn test_help_wrappers_match_renderers() {
        let binder = Binder::new(hello_schema());
        let options = HelpOptions::default();

        assert_eq!(binder.schema().flags().len(), 2);
        assert_eq!(binder.args_help(&options), render_args_help(binder.schema(), &options));
        assert_eq!(binder.flags_help(&options), render_flags_help(binder.schema(), &options));
        assert_eq!(
            binder.help(&options),
            format!("{}\n\n{}", binder.args_help(&options), binder.flags_help(&options))
        );
    }

    #[test]
    fn test_missing_required_flag() {
        let schema = Schema::new(
            Vec::new(),
            vec![OptionSpec::typed("message", OptionType::String).with_alias("m").required()],
        )
        .unwrap();
        let binder = Binder::new(schema);

        let err = binder.parse(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, ParseError::MissingRequired("message".to_string()));
        assert_eq!(err.to_string(), "`message` is required");

        let parsed = binder.parse(["-m", "ok"]).unwrap();
        assert_eq!(parsed.flags["message"], "ok");
    }

    #[test]
    fn test_required_satisfied_by_default() {
        let schema = Schema::new(
            Vec::new(),
            vec![
                OptionSpec::typed("d", OptionType::String)
                    .required()
                    .with_default_fn(|| json!("hi")),
            ],
        )
        .unwrap();

        let parsed = Binder::new(schema).parse(Vec::<String>::new()).unwrap();
        assert_eq!(parsed.flags["d"], "hi");
    }

    #[test]
    fn test_default_thunk_called_once_per_parse() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::new(
            Vec::new(),
            vec![
                OptionSpec::typed("int", OptionType::Integer)
                    .with_aliases(["i", "integer"])
                    .with_default_fn(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                        json!(3)
                    }),
            ],
        )
        .unwrap();
        let binder = Binder::new(schema);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        binder.parse(Vec::<String>::new()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        binder.parse(["--int", "4"]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_flag_type_mismatch_is_fatal() {
        let err = Binder::new(hello_schema())
            .parse(["--int", "1.5"])
            .unwrap_err();
        assert!(matches!(err, ParseError::TypeMismatch { ref option, .. } if option == "int"));
        assert_eq!(err.to_string(), "`int`: 1.5 must be a integer");
    }

    #[test]
    fn test_unsupported_type() {
        let schema = Schema::new(
            vec![OptionSpec::typed("when", OptionType::Other("date".to_string()))],
            Vec::new(),
        )
        .unwrap();

        let err = Binder::new(schema).parse(["today"]).unwrap_err();
        assert_eq!(err.to_string(), "type \"date\" and value today not supported");
    }

    #[test]
    fn test_function_and_pattern_types() {
        let schema = Schema::new(
            vec![
                OptionSpec::typed("even", OptionType::function(|v| v.as_i64().is_some_and(|n| n % 2 == 0))),
                OptionSpec::typed("word", OptionType::try_from("/^[a-z]+$/".to_string()).unwrap()),
            ],
            Vec::new(),
        )
        .unwrap();
        let binder = Binder::new(schema);

        let parsed = binder.parse(["4", "abc"]).unwrap();
        assert_eq!(parsed.args["even"], 4);
        assert_eq!(parsed.args["word"], "abc");

        assert!(binder.parse(["3", "abc"]).is_err());
        assert!(binder.parse(["4", "ABC"]).is_err());
    }

    #[test]
    fn test_tokenizer_config_from_flags() {
        let binder = Binder::new(
            Schema::new(
                Vec::new(),
                vec![
                    OptionSpec::typed("message", OptionType::String).with_alias("m"),
                    OptionSpec::typed("toggle", OptionType::Boolean),
                ],
            )
            .unwrap(),
        );

        let config = binder.tokenizer_config();
        assert!(config.boolean.contains("toggle"));
        assert!(config.string.contains("message"));
        assert_eq!(config.alias.get("message"), Some(&vec!["m".to_string()]));
        assert!(!config.alias.contains_key("toggle"));
    }

    struct Fixed(Tokenized);

    impl Tokenizer for Fixed {
        fn tokenize(&self, _tokens: &[String], _config: &TokenizerConfig) -> Tokenized {
            self.0.clone()
        }
    }

    #[test]
    fn test_custom_tokenizer() {
        let tokenized = Tokenized {
            positionals: vec![json!("x")],
            flags: [("verbose".to_string(), json!(true))].into_iter().collect(),
        };
        let schema = Schema::new(
            vec![OptionSpec::new("target")],
            vec![OptionSpec::typed("verbose", OptionType::Boolean)],
        )
        .unwrap();

        let parsed = Binder::with_tokenizer(schema, Fixed(tokenized))
            .parse(["ignored"])
            .unwrap();
        assert_eq!(parsed.args["target"], "x");
        assert_eq!(parsed.flags["verbose"], true);
    }

    #[test]
    fn test_binder_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Binder>();
    }
}
