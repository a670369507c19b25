//! Compile configuration.
//!
//! ```toml
//! column_naming = "snake_case"
//! order_columns = true
//! ```

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use serde::{Deserialize, Serialize};

use crate::error::WeaveResult;

/// How payload field names without an explicit rename become column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnNaming {
    #[default]
    AsIs,
    SnakeCase,
    CamelCase,
    PascalCase,
}

impl ColumnNaming {
    pub fn apply(self, name: &str) -> String {
        match self {
            ColumnNaming::AsIs => name.to_string(),
            ColumnNaming::SnakeCase => name.to_snake_case(),
            ColumnNaming::CamelCase => name.to_lower_camel_case(),
            ColumnNaming::PascalCase => name.to_upper_camel_case(),
        }
    }
}

/// Settings attached to a statement with [`Statement::config`](crate::Statement::config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub column_naming: ColumnNaming,
    /// Sort payload columns by name instead of first-seen order.
    pub order_columns: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_naming(mut self, naming: ColumnNaming) -> Self {
        self.column_naming = naming;
        self
    }

    pub fn order_columns(mut self, enabled: bool) -> Self {
        self.order_columns = enabled;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> WeaveResult<Self> {
        Ok(toml::from_str(raw)?)
    }
}
