//! Two-column help text for a [`Schema`].
//!
//! Each option renders as an indented label (the argument name, or `--name`
//! plus its alias for flags) padded to a shared description column. Long
//! descriptions are word-wrapped and continuation lines are aligned under
//! the description column. Rendering depends only on the schema and the
//! [`HelpOptions`]; the display width is passed in rather than queried.
//!
//! # Examples
//!
//! ```
//! use argflags_core::{HelpOptions, OptionSpec, OptionType, Schema, render_help};
//!
//! let schema = Schema::new(
//!     vec![OptionSpec::typed("hello", OptionType::String).with_help("say hello")],
//!     vec![OptionSpec::typed("message", OptionType::Boolean).with_alias("m")],
//! )
//! .unwrap();
//!
//! let text = render_help(&schema, &HelpOptions::default());
//! assert!(text.starts_with("Arguments:\n  hello"));
//! assert!(text.contains("\n\nFlags:\n  --message, -m"));
//! ```

use crate::value::{is_truthy, render_value};
use crate::{OptionSpec, Schema};

/// Default width of the display surface, in columns.
pub const DEFAULT_DISPLAY_WIDTH: usize = 80;

/// Default space between the label column and the description column.
pub const DEFAULT_GUTTER: usize = 4;

/// Default indentation of option lines.
pub const DEFAULT_INDENT: usize = 2;

/// Settings for help rendering.
///
/// # Examples
///
/// ```
/// use argflags_core::HelpOptions;
///
/// let options = HelpOptions::default()
///     .with_display_width(100)
///     .with_flags_header("Options:");
/// assert_eq!(options.display_width, 100);
/// assert_eq!(options.gutter, 4);
/// assert_eq!(options.args_header, "Arguments:");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOptions {
    /// Header above the argument section.
    pub args_header: String,
    /// Header above the flag section.
    pub flags_header: String,
    /// Fixed label column width; computed from the labels when `None`.
    pub left_column_width: Option<usize>,
    /// Fixed description column width; `display_width` minus the label
    /// column when `None`.
    pub right_column_width: Option<usize>,
    /// Width of the display surface.
    pub display_width: usize,
    /// Columns between labels and descriptions.
    pub gutter: usize,
    /// Columns before each option label.
    pub indent: usize,
    /// List every flag alias instead of only the first.
    pub all_aliases: bool,
}

impl Default for HelpOptions {
    fn default() -> Self {
        Self {
            args_header: "Arguments:".to_string(),
            flags_header: "Flags:".to_string(),
            left_column_width: None,
            right_column_width: None,
            display_width: DEFAULT_DISPLAY_WIDTH,
            gutter: DEFAULT_GUTTER,
            indent: DEFAULT_INDENT,
            all_aliases: false,
        }
    }
}

impl HelpOptions {
    pub fn with_args_header(mut self, header: &str) -> Self {
        self.args_header = header.to_string();
        self
    }

    pub fn with_flags_header(mut self, header: &str) -> Self {
        self.flags_header = header.to_string();
        self
    }

    pub fn with_left_column_width(mut self, width: usize) -> Self {
        self.left_column_width = Some(width);
        self
    }

    pub fn with_right_column_width(mut self, width: usize) -> Self {
        self.right_column_width = Some(width);
        self
    }

    pub fn with_display_width(mut self, width: usize) -> Self {
        self.display_width = width;
        self
    }

    pub fn with_gutter(mut self, gutter: usize) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_all_aliases(mut self) -> Self {
        self.all_aliases = true;
        self
    }
}

/// Column geometry shared by both sections of one help call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HelpLayout {
    left: usize,
    right: usize,
    gutter: usize,
}

impl HelpLayout {
    fn compute(schema: &Schema, options: &HelpOptions) -> Self {
        let left = options.left_column_width.unwrap_or_else(|| {
            schema
                .args()
                .iter()
                .map(|spec| arg_label(spec, options))
                .chain(schema.flags().iter().map(|spec| flag_label(spec, options)))
                .map(|label| label.chars().count())
                .max()
                .unwrap_or(0)
        });
        let right = options
            .right_column_width
            .unwrap_or_else(|| options.display_width.saturating_sub(left));

        Self {
            left,
            right,
            gutter: options.gutter,
        }
    }

    fn description_column(&self) -> usize {
        self.left + self.gutter
    }

    fn wrap_width(&self) -> usize {
        self.right.saturating_sub(self.gutter).max(1)
    }
}

/// Renders the argument section, a blank line, then the flag section.
///
/// Sections with no options are left out.
pub fn render_help(schema: &Schema, options: &HelpOptions) -> String {
    let layout = HelpLayout::compute(schema, options);
    let sections = [
        render_section(&options.args_header, schema.args(), options, layout, arg_label),
        render_section(&options.flags_header, schema.flags(), options, layout, flag_label),
    ];

    sections
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders only the argument section; empty if there are no arguments.
///
/// Column widths are computed over arguments and flags together so the
/// section lines up with [`render_flags_help`].
pub fn render_args_help(schema: &Schema, options: &HelpOptions) -> String {
    let layout = HelpLayout::compute(schema, options);
    render_section(&options.args_header, schema.args(), options, layout, arg_label)
}

/// Renders only the flag section; empty if there are no flags.
pub fn render_flags_help(schema: &Schema, options: &HelpOptions) -> String {
    let layout = HelpLayout::compute(schema, options);
    render_section(&options.flags_header, schema.flags(), options, layout, flag_label)
}

fn render_section(
    header: &str,
    specs: &[OptionSpec],
    options: &HelpOptions,
    layout: HelpLayout,
    label: fn(&OptionSpec, &HelpOptions) -> String,
) -> String {
    if specs.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = specs
        .iter()
        .map(|spec| render_line(&label(spec, options), &describe(spec), layout))
        .collect();

    format!("{header}\n{}", lines.join("\n"))
}

fn render_line(label: &str, description: &str, layout: HelpLayout) -> String {
    if description.is_empty() {
        return label.to_string();
    }

    let padding = layout
        .description_column()
        .saturating_sub(label.chars().count())
        .max(1);
    let mut line = format!("{label}{}", " ".repeat(padding));

    if description.chars().count() > layout.wrap_width() {
        let continuation = format!("\n{}", " ".repeat(layout.description_column()));
        line.push_str(&wrap_words(description, layout.wrap_width()).join(&continuation));
    } else {
        line.push_str(description);
    }

    line
}

fn arg_label(spec: &OptionSpec, options: &HelpOptions) -> String {
    format!("{}{}", " ".repeat(options.indent), spec.name)
}

fn flag_label(spec: &OptionSpec, options: &HelpOptions) -> String {
    let shown = if options.all_aliases {
        spec.aliases.len()
    } else {
        spec.aliases.len().min(1)
    };

    let mut label = format!("{}--{}", " ".repeat(options.indent), spec.name);
    for alias in &spec.aliases[..shown] {
        label.push_str(", ");
        label.push_str(&dashed(alias));
    }
    label
}

/// Single-letter identifiers get one dash, longer ones two.
fn dashed(id: &str) -> String {
    if id.chars().count() == 1 {
        format!("-{id}")
    } else {
        format!("--{id}")
    }
}

/// `(type, required, default: value) help`, omitting absent parts.
fn describe(spec: &OptionSpec) -> String {
    let mut meta = Vec::new();
    if let Some(kind) = &spec.kind {
        meta.push(kind.to_string());
    }
    if spec.required {
        meta.push("required".to_string());
    }
    if let Some(default) = spec.default.as_ref().map(|d| d.resolve()) {
        if is_truthy(&default) {
            meta.push(format!("default: {}", render_value(&default)));
        }
    }

    let help = spec.help.as_deref().unwrap_or("");
    if meta.is_empty() {
        help.to_string()
    } else {
        format!("({}) {help}", meta.join(", ")).trim_end().to_string()
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
