//! Loading schemas from YAML and JSON documents.
//!
//! A document has two optional lists, `args` and `flags`, of option specs:
//!
//! ```yaml
//! args:
//!   - name: hello
//!     type: string
//!     help: an argument for saying hello
//! flags:
//!   - name: int
//!     alias: [i, integer]
//!     type: integer
//!     default: 1
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::SchemaError;
use crate::{OptionSpec, Schema};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    #[serde(default)]
    args: Vec<OptionSpec>,
    #[serde(default)]
    flags: Vec<OptionSpec>,
}

impl SchemaDocument {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        Ok(Schema::new(self.args, self.flags)?)
    }
}

impl Schema {
    /// Parses and validates a YAML schema document.
    ///
    /// # Examples
    ///
    /// ```
    /// use argflags_core::Schema;
    ///
    /// let schema = Schema::from_yaml_str(
    ///     "flags:\n  - name: message\n    alias: m\n    type: boolean\n",
    /// )
    /// .unwrap();
    /// assert!(schema.args().is_empty());
    /// assert_eq!(schema.flags()[0].aliases, vec!["m"]);
    /// ```
    pub fn from_yaml_str(raw: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_yaml::from_str(raw)?;
        document.into_schema()
    }

    /// Parses and validates a JSON schema document.
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let document: SchemaDocument = serde_json::from_str(raw)?;
        document.into_schema()
    }

    /// Reads a schema file. Files ending in `.json` are parsed as JSON,
    /// anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let raw = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), is_json, "Loading schema");

        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        }
    }
}
