//! Schema blueprints and the DDL grammars that compile them

pub mod blueprint;
pub mod column;
pub mod grammar;
pub mod mysql;
pub mod postgres;

pub use blueprint::{Blueprint, Command, ForeignKey, IndexKind, ReferentialAction};
pub use column::{ColumnDefinition, ColumnType, Modifier};
pub use grammar::SchemaGrammar;
pub use mysql::MySqlSchemaGrammar;
pub use postgres::PostgresSchemaGrammar;
