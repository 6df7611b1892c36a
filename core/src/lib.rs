//! Declarative argument and flag schemas for command-line tools.
//!
//! A caller describes the command line once as a [`Schema`]: positional
//! arguments bound by order and flags bound by name or alias, each with an
//! optional type, default, required marker and help text. A [`Binder`] then
//! turns raw tokens into typed values and renders aligned help text.
//!
//! - [`OptionSpec`]: one argument or flag declaration.
//! - [`OptionType`]: built-in types, a predicate, or a regex pattern.
//! - [`DefaultValue`]: a literal or a function evaluated at parse time.
//! - [`Tokenizer`] / [`DefaultTokenizer`]: splits tokens into positionals
//!   and raw flag values.
//! - [`Parsed`] / [`ParsedBag`]: bound values, keyed by name and alias.
//! - [`HelpOptions`]: headers and column geometry for [`render_help`].
//!
//! Structural schema problems are caught by [`validate_schema`] when the
//! schema is built. Bad input surfaces as a [`ParseError`] from
//! [`Binder::parse`].
//!
//! # Example
//!
//! ```
//! use argflags_core::*;
//! use serde_json::json;
//!
//! let schema = Schema::new(
//!     vec![OptionSpec::typed("hello", OptionType::String).with_help("say hello")],
//!     vec![
//!         OptionSpec::typed("message", OptionType::String)
//!             .with_alias("m")
//!             .required(),
//!         OptionSpec::typed("toggle", OptionType::Boolean)
//!             .with_alias("t")
//!             .with_default(true),
//!     ],
//! )
//! .unwrap();
//! let binder = Binder::new(schema);
//!
//! let parsed = binder.parse(["hi", "-m", "ok"]).unwrap();
//! assert_eq!(parsed.args["hello"], "hi");
//! assert_eq!(parsed.flags["message"], "ok");
//! assert_eq!(parsed.flags["t"], true);
//!
//! assert_eq!(
//!     binder.parse(["hi"]).unwrap_err(),
//!     ParseError::MissingRequired("message".to_string())
//! );
//!
//! let help = binder.help(&HelpOptions::default());
//! assert!(help.contains("--message, -m"));
//! assert_eq!(json!(parsed.args.rest()), json!(["hi"]));
//! ```

mod bag;
mod bind;
mod document;
mod error;
mod help;
mod tokenize;
mod types;
mod validate;
mod value;

pub use bag::{Parsed, ParsedBag};
pub use bind::Binder;
pub use error::{ParseError, Result, SchemaError};
pub use help::{
    DEFAULT_DISPLAY_WIDTH, DEFAULT_GUTTER, DEFAULT_INDENT, HelpOptions, render_args_help,
    render_flags_help, render_help,
};
pub use tokenize::{DefaultTokenizer, Tokenized, Tokenizer, TokenizerConfig};
pub use types::*;
pub use validate::{REST_KEY, ValidationError, validate_schema, validate_value};
pub use value::{is_truthy, render_value};
