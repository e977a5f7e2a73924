//! # elif-grammar: SQL grammars for elif.rs
//!
//! Dialect-specific translators that turn an abstract [`Statement`] or
//! schema [`Blueprint`] into SQL text plus ordered bind parameters.
//!
//! Grammars are stateless strategies. Everything mutable during a compile
//! call lives in a per-call [`Binder`], so a single grammar instance can be
//! shared across threads.
//!
//! ```
//! use elif_grammar::{Dialect, GrammarConfig, QueryGrammar, Statement};
//!
//! let grammar = Dialect::Postgres.query_grammar(GrammarConfig::default());
//! let query = Statement::table("users").where_eq("id", 5);
//!
//! let compiled = grammar.compile_select(&query).unwrap();
//! assert_eq!(compiled.sql, r#"SELECT * FROM "users" WHERE "id" = $1"#);
//! assert_eq!(compiled.params.len(), 1);
//! ```

pub mod binder;
pub mod config;
pub mod error;
pub mod expression;
pub mod grammar;
pub mod query;
pub mod schema;
pub mod security;
pub mod value;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod security_injection_tests;

// Re-export core types
pub use binder::{Binder, CompiledSql, MarkerStyle};
pub use config::{Dialect, GrammarConfig};
pub use error::{GrammarError, GrammarResult};
pub use expression::{raw, Expression, Identifier, Operand};
pub use grammar::{Grammar, MySqlQueryGrammar, PostgresQueryGrammar, QueryGrammar};
pub use query::{Row, Statement};
pub use schema::{Blueprint, MySqlSchemaGrammar, PostgresSchemaGrammar, SchemaGrammar};
pub use value::BindValue;
