//! PostgreSQL schema grammar

use once_cell::sync::Lazy;

use super::blueprint::Blueprint;
use super::column::{
    default_value, ColumnDefinition, ColumnType, Modifier, DEFAULT_DECIMAL_PLACES,
    DEFAULT_DECIMAL_TOTAL,
};
use super::grammar::{column_definitions, ModifierTable, SchemaGrammar, TypeTable};
use crate::binder::CompiledSql;
use crate::config::{Dialect, GrammarConfig};
use crate::error::GrammarResult;
use crate::grammar::Grammar;
use crate::security::{escape_identifier, quote_literal};
use crate::value::BindValue;

const POSTGRES_MODIFIERS: &[Modifier] =
    &[Modifier::Increment, Modifier::Nullable, Modifier::Default];

static POSTGRES_TYPES: Lazy<TypeTable> = Lazy::new(|| {
    let mut types = TypeTable::new();
    types.insert(ColumnType::Char, type_char);
    types.insert(ColumnType::String, type_string);
    types.insert(ColumnType::Text, type_text);
    types.insert(ColumnType::MediumText, type_text);
    types.insert(ColumnType::LongText, type_text);
    types.insert(ColumnType::Integer, type_integer);
    types.insert(ColumnType::MediumInteger, type_integer);
    types.insert(ColumnType::BigInteger, type_big_integer);
    types.insert(ColumnType::SmallInteger, type_small_integer);
    types.insert(ColumnType::TinyInteger, type_small_integer);
    types.insert(ColumnType::Float, type_double);
    types.insert(ColumnType::Double, type_double);
    types.insert(ColumnType::Decimal, type_decimal);
    types.insert(ColumnType::Boolean, type_boolean);
    types.insert(ColumnType::Enum, type_enum);
    types.insert(ColumnType::Json, type_json);
    types.insert(ColumnType::Date, type_date);
    types.insert(ColumnType::DateTime, type_datetime);
    types.insert(ColumnType::Time, type_time);
    types.insert(ColumnType::Timestamp, type_timestamp);
    types.insert(ColumnType::Binary, type_binary);
    types.insert(ColumnType::Uuid, type_uuid);
    types
});

static POSTGRES_MODIFIER_RENDERERS: Lazy<ModifierTable> = Lazy::new(|| {
    let mut modifiers = ModifierTable::new();
    modifiers.insert(Modifier::Increment, modify_increment);
    modifiers.insert(Modifier::Nullable, modify_nullable);
    modifiers.insert(Modifier::Default, modify_default);
    modifiers
});

fn type_char(column: &ColumnDefinition) -> String {
    format!("CHAR({})", column.length_or_default())
}

fn type_string(column: &ColumnDefinition) -> String {
    format!("VARCHAR({})", column.length_or_default())
}

fn type_text(_: &ColumnDefinition) -> String {
    "TEXT".to_string()
}

fn type_integer(column: &ColumnDefinition) -> String {
    let sql = if column.auto_increment { "SERIAL" } else { "INTEGER" };
    sql.to_string()
}

fn type_big_integer(column: &ColumnDefinition) -> String {
    let sql = if column.auto_increment { "BIGSERIAL" } else { "BIGINT" };
    sql.to_string()
}

fn type_small_integer(column: &ColumnDefinition) -> String {
    let sql = if column.auto_increment { "SMALLSERIAL" } else { "SMALLINT" };
    sql.to_string()
}

fn type_double(_: &ColumnDefinition) -> String {
    "DOUBLE PRECISION".to_string()
}

fn type_decimal(column: &ColumnDefinition) -> String {
    format!(
        "DECIMAL({}, {})",
        column.total.unwrap_or(DEFAULT_DECIMAL_TOTAL),
        column.places.unwrap_or(DEFAULT_DECIMAL_PLACES)
    )
}

fn type_boolean(_: &ColumnDefinition) -> String {
    "BOOLEAN".to_string()
}

/// Postgres has no inline enum type; a check constraint restricts the values
fn type_enum(column: &ColumnDefinition) -> String {
    let allowed = column
        .allowed
        .iter()
        .map(|value| quote_literal(value))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "VARCHAR(255) CHECK ({} IN ({}))",
        escape_identifier(&column.name, '"'),
        allowed
    )
}

fn type_json(_: &ColumnDefinition) -> String {
    "JSON".to_string()
}

fn type_date(_: &ColumnDefinition) -> String {
    "DATE".to_string()
}

fn type_datetime(_: &ColumnDefinition) -> String {
    "TIMESTAMP(6) WITHOUT TIME ZONE".to_string()
}

fn type_time(_: &ColumnDefinition) -> String {
    "TIME(6) WITHOUT TIME ZONE".to_string()
}

fn type_timestamp(column: &ColumnDefinition) -> String {
    if column.use_current {
        "TIMESTAMP(6) WITHOUT TIME ZONE DEFAULT CURRENT_TIMESTAMP(6)".to_string()
    } else {
        "TIMESTAMP(6) WITHOUT TIME ZONE".to_string()
    }
}

fn type_binary(_: &ColumnDefinition) -> String {
    "BYTEA".to_string()
}

fn type_uuid(_: &ColumnDefinition) -> String {
    "UUID".to_string()
}

fn modify_increment(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    if column.column_type.is_integer() && column.auto_increment {
        Ok(" PRIMARY KEY".to_string())
    } else {
        Ok(String::new())
    }
}

fn modify_nullable(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    Ok(if column.nullable { " NULL" } else { " NOT NULL" }.to_string())
}

fn modify_default(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    match &column.default {
        Some(value) => Ok(format!(" DEFAULT {}", default_value(value, quote_literal)?)),
        None => Ok(String::new()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostgresSchemaGrammar {
    config: GrammarConfig,
}

impl PostgresSchemaGrammar {
    pub fn new(config: GrammarConfig) -> Self {
        Self { config }
    }

    fn prefixed(&self, table: &str) -> String {
        format!("{}{}", self.config.table_prefix, table)
    }
}

impl Grammar for PostgresSchemaGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn config(&self) -> &GrammarConfig {
        &self.config
    }
}

impl SchemaGrammar for PostgresSchemaGrammar {
    fn modifiers(&self) -> &'static [Modifier] {
        POSTGRES_MODIFIERS
    }

    fn type_renderers(&self) -> &'static TypeTable {
        &POSTGRES_TYPES
    }

    fn modifier_renderers(&self) -> &'static ModifierTable {
        &POSTGRES_MODIFIER_RENDERERS
    }

    fn get_columns(&self, blueprint: &Blueprint) -> GrammarResult<Vec<String>> {
        column_definitions(self, blueprint)
    }

    fn compile_table_exists(&self, table: &str) -> CompiledSql {
        let mut binder = self.binder();
        let marker = binder.bind(BindValue::from(self.prefixed(table)));
        let sql = format!("SELECT * FROM information_schema.tables WHERE table_name = {}", marker);
        self.finish("table exists", sql, binder)
    }

    fn compile_column_listing(&self, table: &str) -> CompiledSql {
        let mut binder = self.binder();
        let marker = binder.bind(BindValue::from(self.prefixed(table)));
        let sql = format!(
            "SELECT column_name FROM information_schema.columns WHERE table_name = {}",
            marker
        );
        self.finish("column listing", sql, binder)
    }

    fn compile_truncate(&self, blueprint: &Blueprint) -> String {
        format!("TRUNCATE {} RESTART IDENTITY", self.wrap_table(blueprint.table()))
    }
}
