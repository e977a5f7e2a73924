//! SQL grammars
//!
//! A grammar is a stateless, dialect-specific strategy that renders a
//! [`Statement`](crate::query::Statement) into SQL text plus ordered bind
//! parameters. Base behaviour lives in the provided methods of [`Grammar`]
//! and [`QueryGrammar`]; dialects override the pieces their engine spells
//! differently.

pub mod mysql;
pub mod postgres;
pub mod query;

pub use mysql::MySqlQueryGrammar;
pub use postgres::PostgresQueryGrammar;
pub use query::{QueryGrammar, SelectComponent};

use tracing::{debug, trace};

use crate::binder::{Binder, CompiledSql, MarkerStyle};
use crate::config::{Dialect, GrammarConfig};
use crate::expression::Identifier;
use crate::schema::{MySqlSchemaGrammar, PostgresSchemaGrammar, SchemaGrammar};
use crate::security::escape_identifier;

/// Identifier handling shared by query and schema grammars
pub trait Grammar: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn config(&self) -> &GrammarConfig;

    /// Placeholder style for bound parameters
    fn marker(&self) -> MarkerStyle {
        self.config().marker_for(self.dialect())
    }

    /// Fresh binder for one compile call
    fn binder(&self) -> Binder {
        Binder::new(self.marker())
    }

    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Wrap a single identifier segment; `*` is never quoted
    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        escape_identifier(value, self.identifier_quote())
    }

    /// Wrap a column reference, handling `table.column` and `x as y`
    fn wrap(&self, value: &str) -> String {
        if let Some((name, alias)) = split_alias(value) {
            return format!("{} AS {}", self.wrap(name), self.wrap_value(alias));
        }

        let segments: Vec<&str> = value.split('.').collect();
        let table_index = segments.len().checked_sub(2);
        segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                if Some(index) == table_index {
                    self.wrap_table(segment)
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Wrap a table reference, applying the configured prefix
    fn wrap_table(&self, table: &str) -> String {
        let prefix = &self.config().table_prefix;

        if let Some((name, alias)) = split_alias(table) {
            return format!(
                "{} AS {}",
                self.wrap_table(name),
                self.wrap_value(&format!("{}{}", prefix, alias))
            );
        }

        match table.rsplit_once('.') {
            Some((schema, name)) => format!(
                "{}.{}",
                self.wrap_value(schema),
                self.wrap_value(&format!("{}{}", prefix, name))
            ),
            None => self.wrap_value(&format!("{}{}", prefix, table)),
        }
    }

    fn wrap_identifier(&self, identifier: &Identifier) -> String {
        match identifier {
            Identifier::Name(name) => self.wrap(name),
            Identifier::Raw(expression) => expression.value().to_string(),
        }
    }

    /// Comma-join wrapped identifiers
    fn columnize(&self, columns: &[Identifier]) -> String {
        columns
            .iter()
            .map(|column| self.wrap_identifier(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Comma-join wrapped plain names
    fn columnize_names(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|column| self.wrap(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Pair compiled text with the binder's parameters and log the result
    fn finish(&self, kind: &str, sql: String, binder: Binder) -> CompiledSql {
        debug!("Compiled {} {} statement: {}", self.dialect(), kind, sql);
        trace!("{} parameter(s) bound for {} statement", binder.len(), kind);
        binder.finish(sql)
    }
}

/// Split `name as alias`, case-insensitively
fn split_alias(value: &str) -> Option<(&str, &str)> {
    let lower = value.to_ascii_lowercase();
    let index = lower.find(" as ")?;
    Some((value[..index].trim(), value[index + 4..].trim()))
}

/// Strip a leading `AND ` or `OR ` connector
pub fn remove_leading_boolean(sql: &str) -> &str {
    let trimmed = sql.trim_start();
    trimmed
        .strip_prefix("AND ")
        .or_else(|| trimmed.strip_prefix("OR "))
        .unwrap_or(trimmed)
}

impl Dialect {
    /// Build the query grammar for this dialect
    pub fn query_grammar(&self, config: GrammarConfig) -> Box<dyn QueryGrammar> {
        match self {
            Dialect::MySql => Box::new(MySqlQueryGrammar::new(config)),
            Dialect::Postgres => Box::new(PostgresQueryGrammar::new(config)),
        }
    }

    /// Build the schema grammar for this dialect
    pub fn schema_grammar(&self, config: GrammarConfig) -> Box<dyn SchemaGrammar> {
        match self {
            Dialect::MySql => Box::new(MySqlSchemaGrammar::new(config)),
            Dialect::Postgres => Box::new(PostgresSchemaGrammar::new(config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::raw;

    #[test]
    fn test_wrap_segments_and_aliases() {
        let grammar = PostgresQueryGrammar::default();

        assert_eq!(grammar.wrap("id"), "\"id\"");
        assert_eq!(grammar.wrap("*"), "*");
        assert_eq!(grammar.wrap("users.id"), "\"users\".\"id\"");
        assert_eq!(grammar.wrap("users.*"), "\"users\".*");
        assert_eq!(grammar.wrap("name AS label"), "\"name\" AS \"label\"");
        assert_eq!(grammar.wrap("name as label"), "\"name\" AS \"label\"");
    }

    #[test]
    fn test_wrap_escapes_embedded_quotes() {
        let postgres = PostgresQueryGrammar::default();
        assert_eq!(postgres.wrap("we\"ird"), "\"we\"\"ird\"");

        let mysql = MySqlQueryGrammar::default();
        assert_eq!(mysql.wrap("we`ird"), "`we``ird`");
        assert_eq!(mysql.wrap("*"), "*");
    }

    #[test]
    fn test_wrap_table_applies_prefix() {
        let grammar = PostgresQueryGrammar::new(GrammarConfig::new().with_table_prefix("app_"));

        assert_eq!(grammar.wrap_table("users"), "\"app_users\"");
        assert_eq!(grammar.wrap_table("public.users"), "\"public\".\"app_users\"");
        assert_eq!(grammar.wrap_table("users as u"), "\"app_users\" AS \"app_u\"");
        assert_eq!(grammar.wrap("users.id"), "\"app_users\".\"id\"");
    }

    #[test]
    fn test_raw_identifiers_bypass_quoting() {
        let grammar = MySqlQueryGrammar::default();
        let columns = vec![Identifier::from("id"), Identifier::from(raw("COUNT(*) AS total"))];

        assert_eq!(grammar.columnize(&columns), "`id`, COUNT(*) AS total");
    }

    #[test]
    fn test_remove_leading_boolean() {
        assert_eq!(remove_leading_boolean("AND a = b AND c = d"), "a = b AND c = d");
        assert_eq!(remove_leading_boolean("OR a = b"), "a = b");
        assert_eq!(remove_leading_boolean("a = b"), "a = b");
    }

    #[test]
    fn test_dialect_factories() {
        let grammar = Dialect::MySql.query_grammar(GrammarConfig::default());
        assert_eq!(grammar.dialect(), Dialect::MySql);
        assert_eq!(grammar.wrap("id"), "`id`");

        let schema = Dialect::Postgres.schema_grammar(GrammarConfig::default());
        assert_eq!(schema.dialect(), Dialect::Postgres);
    }
}
