//! Grammar configuration
//!
//! Configuration is read-only after a grammar is constructed. It arrives as a
//! value (usually deserialized from the application's database config); this
//! crate never reads the environment or files itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::binder::MarkerStyle;
use crate::error::GrammarError;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    Postgres,
}

impl Dialect {
    /// Placeholder style the dialect's native drivers expect
    pub fn default_marker(&self) -> MarkerStyle {
        match self {
            Dialect::MySql => MarkerStyle::Question,
            Dialect::Postgres => MarkerStyle::Numbered,
        }
    }

    /// Identifier quote character
    pub fn identifier_quote(&self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Postgres => write!(f, "postgres"),
        }
    }
}

impl FromStr for Dialect {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgresql" | "postgres" | "pgsql" => Ok(Dialect::Postgres),
            _ => Err(GrammarError::unsupported(format!("database dialect '{}'", s))),
        }
    }
}

/// Settings shared by query and schema grammars
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Prefix prepended to every wrapped table name
    pub table_prefix: String,
    /// Placeholder style; `None` uses the dialect default
    pub marker: Option<MarkerStyle>,
}

impl GrammarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Resolve the marker style for a dialect
    pub fn marker_for(&self, dialect: Dialect) -> MarkerStyle {
        self.marker.unwrap_or_else(|| dialect.default_marker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("Postgres".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mysql".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_marker_resolution() {
        let config = GrammarConfig::default();
        assert_eq!(config.marker_for(Dialect::Postgres), MarkerStyle::Numbered);
        assert_eq!(config.marker_for(Dialect::MySql), MarkerStyle::Question);

        let config = config.with_marker(MarkerStyle::Format);
        assert_eq!(config.marker_for(Dialect::Postgres), MarkerStyle::Format);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: GrammarConfig =
            serde_json::from_str(r#"{"table_prefix": "app_", "marker": "format"}"#).unwrap();
        assert_eq!(config.table_prefix, "app_");
        assert_eq!(config.marker, Some(MarkerStyle::Format));

        let config: GrammarConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GrammarConfig::default());
    }
}
