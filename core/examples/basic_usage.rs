//! Basic schema binding example.
//!
//! Declares a few arguments and flags in code, parses the process arguments
//! against them and prints the bound values followed by the help text.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argflags-core --example basic_usage -- hi -m ok
//! ```

use argflags_core::{Binder, HelpOptions, OptionSpec, OptionType, Schema};
use serde_json::json;

fn main() {
    let schema = Schema::new(
        vec![
            OptionSpec::typed("required-arg", OptionType::String)
                .required()
                .with_help("an argument for saying hello"),
            OptionSpec::typed("hello", OptionType::String)
                .with_default("hey")
                .with_help("an argument for saying hello"),
            OptionSpec::typed("integer", OptionType::Integer)
                .with_default(5)
                .with_help("an integer argument"),
        ],
        vec![
            OptionSpec::typed("toggle", OptionType::Boolean)
                .with_alias("t")
                .with_default(true)
                .with_help("a boolean argument"),
            OptionSpec::typed("message", OptionType::String)
                .with_alias("m")
                .required()
                .with_help("a string argument"),
            OptionSpec::typed("defaultValueFunction", OptionType::String)
                .with_alias("d")
                .required()
                .with_default_fn(|| json!("hi"))
                .with_help("a string argument"),
        ],
    );
    let schema = match schema {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("invalid schema: {err}");
            std::process::exit(1);
        }
    };

    let binder = Binder::new(schema);
    let help = binder.help(&HelpOptions::default());

    match binder.parse(std::env::args().skip(1)) {
        Ok(parsed) => {
            println!("args  {}", json!(parsed.args));
            println!("flags {}", json!(parsed.flags));
            println!();
            println!("{help}");
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{help}");
            std::process::exit(1);
        }
    }
}
