use std::env;
use std::path::{Path, PathBuf};

use argflags_core::{Binder, DEFAULT_DISPLAY_WIDTH, HelpOptions, Parsed, Schema};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argflags")]
#[command(about = "Bind command-line tokens against a declarative args/flags schema")]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Enable debug logging on stderr (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens against a schema and print the bound args and flags.
    Parse(ParseArgs),
    /// Print two-column help text for a schema.
    Help(HelpArgs),
    /// Check a schema file for structural problems.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (YAML, or JSON when the extension is .json).
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Tokens to parse, given after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Schema file (YAML, or JSON when the extension is .json).
    #[arg(long)]
    schema: PathBuf,
    /// Display width in columns (default: $COLUMNS or 80).
    #[arg(long)]
    width: Option<usize>,
    /// Fixed width of the label column.
    #[arg(long)]
    left_width: Option<usize>,
    /// Fixed width of the description column.
    #[arg(long)]
    right_width: Option<usize>,
    /// Columns between labels and descriptions.
    #[arg(long)]
    gutter: Option<usize>,
    /// Header above the argument list.
    #[arg(long)]
    args_header: Option<String>,
    /// Header above the flag list.
    #[arg(long)]
    flags_header: Option<String>,
    /// List every flag alias instead of only the first.
    #[arg(long)]
    all_aliases: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Help(args) => run_help(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;
    debug!(tokens = args.tokens.len(), "Parsing tokens");

    let parsed = Binder::new(schema)
        .parse(args.tokens)
        .map_err(|err| err.to_string())?;
    println!("{}", format_parsed(&parsed, args.format)?);
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;

    let mut options = HelpOptions::default().with_display_width(display_width(args.width));
    if let Some(width) = args.left_width {
        options = options.with_left_column_width(width);
    }
    if let Some(width) = args.right_width {
        options = options.with_right_column_width(width);
    }
    if let Some(gutter) = args.gutter {
        options = options.with_gutter(gutter);
    }
    if let Some(header) = &args.args_header {
        options = options.with_args_header(header);
    }
    if let Some(header) = &args.flags_header {
        options = options.with_flags_header(header);
    }
    if args.all_aliases {
        options = options.with_all_aliases();
    }

    println!("{}", Binder::new(schema).help(&options));
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut options = 0usize;
    for path in &args.inputs {
        let schema = load_schema(path)?;
        options += schema.args().len() + schema.flags().len();
    }

    println!(
        "Validated {} schema file(s) declaring {options} option(s).",
        args.inputs.len()
    );
    Ok(())
}

fn load_schema(path: &Path) -> Result<Schema, String> {
    let schema = Schema::load(path)
        .map_err(|err| format!("Failed to load schema '{}': {err}", path.display()))?;
    info!(
        path = %path.display(),
        args = schema.args().len(),
        flags = schema.flags().len(),
        "Loaded schema"
    );
    Ok(schema)
}

fn format_parsed(parsed: &Parsed, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(parsed)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        CliOutputFormat::Yaml => {
            serde_yaml::to_string(parsed).map_err(|e| format!("YAML serialization failed: {e}"))
        }
    }
}

/// Explicit width, then `COLUMNS`, then the library default.
fn display_width(explicit: Option<usize>) -> usize {
    explicit
        .or_else(|| env::var("COLUMNS").ok()?.trim().parse().ok())
        .filter(|width| *width > 0)
        .unwrap_or(DEFAULT_DISPLAY_WIDTH)
}
