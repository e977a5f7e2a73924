//! MySQL schema grammar

use once_cell::sync::Lazy;

use super::blueprint::Blueprint;
use super::column::{
    default_value, ColumnDefinition, ColumnType, Modifier, DEFAULT_DECIMAL_PLACES,
    DEFAULT_DECIMAL_TOTAL,
};
use super::grammar::{column_definitions, prefix_list, ModifierTable, SchemaGrammar, TypeTable};
use crate::binder::CompiledSql;
use crate::config::{Dialect, GrammarConfig};
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::Grammar;
use crate::security::{quote_mysql_literal, validate_identifier};
use crate::value::BindValue;

const MYSQL_MODIFIERS: &[Modifier] = &[
    Modifier::Unsigned,
    Modifier::Charset,
    Modifier::Collate,
    Modifier::Nullable,
    Modifier::Default,
    Modifier::Increment,
    Modifier::Comment,
    Modifier::After,
];

static MYSQL_TYPES: Lazy<TypeTable> = Lazy::new(|| {
    let mut types = TypeTable::new();
    types.insert(ColumnType::Char, type_char);
    types.insert(ColumnType::String, type_string);
    types.insert(ColumnType::Text, type_text);
    types.insert(ColumnType::MediumText, type_medium_text);
    types.insert(ColumnType::LongText, type_long_text);
    types.insert(ColumnType::BigInteger, type_big_integer);
    types.insert(ColumnType::Integer, type_integer);
    types.insert(ColumnType::MediumInteger, type_medium_integer);
    types.insert(ColumnType::SmallInteger, type_small_integer);
    types.insert(ColumnType::TinyInteger, type_tiny_integer);
    types.insert(ColumnType::Float, type_float);
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

static MYSQL_MODIFIER_RENDERERS: Lazy<ModifierTable> = Lazy::new(|| {
    let mut modifiers = ModifierTable::new();
    modifiers.insert(Modifier::Unsigned, modify_unsigned);
    modifiers.insert(Modifier::Charset, modify_charset);
    modifiers.insert(Modifier::Collate, modify_collate);
    modifiers.insert(Modifier::Nullable, modify_nullable);
    modifiers.insert(Modifier::Default, modify_default);
    modifiers.insert(Modifier::Increment, modify_increment);
    modifiers.insert(Modifier::Comment, modify_comment);
    modifiers.insert(Modifier::After, modify_after);
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

fn type_medium_text(_: &ColumnDefinition) -> String {
    "MEDIUMTEXT".to_string()
}

fn type_long_text(_: &ColumnDefinition) -> String {
    "LONGTEXT".to_string()
}

fn type_big_integer(_: &ColumnDefinition) -> String {
    "BIGINT".to_string()
}

fn type_integer(_: &ColumnDefinition) -> String {
    "INT".to_string()
}

fn type_medium_integer(_: &ColumnDefinition) -> String {
    "MEDIUMINT".to_string()
}

fn type_small_integer(_: &ColumnDefinition) -> String {
    "SMALLINT".to_string()
}

fn type_tiny_integer(_: &ColumnDefinition) -> String {
    "TINYINT".to_string()
}

fn type_float(_: &ColumnDefinition) -> String {
    "FLOAT".to_string()
}

fn type_double(_: &ColumnDefinition) -> String {
    "DOUBLE".to_string()
}

fn type_decimal(column: &ColumnDefinition) -> String {
    format!(
        "DECIMAL({}, {})",
        column.total.unwrap_or(DEFAULT_DECIMAL_TOTAL),
        column.places.unwrap_or(DEFAULT_DECIMAL_PLACES)
    )
}

fn type_boolean(_: &ColumnDefinition) -> String {
    "TINYINT(1)".to_string()
}

fn type_enum(column: &ColumnDefinition) -> String {
    let allowed = column
        .allowed
        .iter()
        .map(|value| quote_mysql_literal(value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("ENUM({})", allowed)
}

fn type_json(_: &ColumnDefinition) -> String {
    "JSON".to_string()
}

fn type_date(_: &ColumnDefinition) -> String {
    "DATE".to_string()
}

fn type_datetime(_: &ColumnDefinition) -> String {
    "DATETIME(6)".to_string()
}

fn type_time(_: &ColumnDefinition) -> String {
    "TIME(6)".to_string()
}

fn type_timestamp(column: &ColumnDefinition) -> String {
    if column.use_current {
        "TIMESTAMP(6) DEFAULT CURRENT_TIMESTAMP(6)".to_string()
    } else {
        "TIMESTAMP(6)".to_string()
    }
}

fn type_binary(_: &ColumnDefinition) -> String {
    "BLOB".to_string()
}

fn type_uuid(_: &ColumnDefinition) -> String {
    "CHAR(36)".to_string()
}

fn modify_unsigned(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    if column.unsigned && column.column_type.is_integer() {
        Ok(" UNSIGNED".to_string())
    } else {
        Ok(String::new())
    }
}

fn modify_charset(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    match &column.charset {
        Some(charset) => {
            validate_identifier(charset)?;
            Ok(format!(" CHARACTER SET {}", charset))
        }
        None => Ok(String::new()),
    }
}

fn modify_collate(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    match &column.collation {
        Some(collation) => {
            validate_identifier(collation)?;
            Ok(format!(" COLLATE {}", collation))
        }
        None => Ok(String::new()),
    }
}

fn modify_nullable(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    Ok(if column.nullable { " NULL" } else { " NOT NULL" }.to_string())
}

fn modify_default(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    match &column.default {
        Some(value) => Ok(format!(" DEFAULT {}", default_value(value, quote_mysql_literal)?)),
        None => Ok(String::new()),
    }
}

fn modify_increment(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    if column.column_type.is_integer() && column.auto_increment {
        Ok(" AUTO_INCREMENT PRIMARY KEY".to_string())
    } else {
        Ok(String::new())
    }
}

fn modify_comment(_: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    match &column.comment {
        Some(comment) => Ok(format!(" COMMENT {}", quote_mysql_literal(comment))),
        None => Ok(String::new()),
    }
}

fn modify_after(grammar: &dyn SchemaGrammar, column: &ColumnDefinition) -> GrammarResult<String> {
    match &column.after {
        Some(after) => Ok(format!(" AFTER {}", grammar.wrap(after))),
        None => Ok(String::new()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MySqlSchemaGrammar {
    config: GrammarConfig,
}

impl MySqlSchemaGrammar {
    pub fn new(config: GrammarConfig) -> Self {
        Self { config }
    }

    fn prefixed(&self, table: &str) -> String {
        format!("{}{}", self.config.table_prefix, table)
    }

    /// `ALTER TABLE t ADD <kind> idx(cols)`
    fn compile_key(
        &self,
        blueprint: &Blueprint,
        kind: &str,
        columns: &[String],
        index: &str,
    ) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!(
            "ALTER TABLE {} ADD {} {}({})",
            self.wrap_table(blueprint.table()),
            kind,
            index,
            self.columnize_names(columns)
        ))
    }
}

impl Grammar for MySqlSchemaGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn config(&self) -> &GrammarConfig {
        &self.config
    }

    fn identifier_quote(&self) -> char {
        '`'
    }
}

impl SchemaGrammar for MySqlSchemaGrammar {
    fn modifiers(&self) -> &'static [Modifier] {
        MYSQL_MODIFIERS
    }

    fn type_renderers(&self) -> &'static TypeTable {
        &MYSQL_TYPES
    }

    fn modifier_renderers(&self) -> &'static ModifierTable {
        &MYSQL_MODIFIER_RENDERERS
    }

    fn get_columns(&self, blueprint: &Blueprint) -> GrammarResult<Vec<String>> {
        column_definitions(self, blueprint)
    }

    fn compile_table_exists(&self, table: &str) -> CompiledSql {
        let mut binder = self.binder();
        let marker = binder.bind(BindValue::from(self.prefixed(table)));
        let sql = format!(
            "SELECT * FROM information_schema.tables WHERE table_schema = DATABASE() AND table_name = {}",
            marker
        );
        self.finish("table exists", sql, binder)
    }

    fn compile_column_listing(&self, table: &str) -> CompiledSql {
        let mut binder = self.binder();
        let marker = binder.bind(BindValue::from(self.prefixed(table)));
        let sql = format!(
            "SELECT column_name FROM information_schema.columns WHERE table_schema = DATABASE() AND table_name = {}",
            marker
        );
        self.finish("column listing", sql, binder)
    }

    /// `CREATE TABLE` with the blueprint's charset, collation and engine
    fn compile_create(&self, blueprint: &Blueprint) -> GrammarResult<String> {
        let columns = self.get_columns(blueprint)?.join(", ");
        let mut sql = format!(
            "CREATE TABLE {} ({})",
            self.wrap_table(blueprint.table()),
            columns
        );

        if let Some(charset) = &blueprint.charset {
            validate_identifier(charset)?;
            sql.push_str(&format!(" DEFAULT CHARACTER SET {}", charset));
        }
        if let Some(collation) = &blueprint.collation {
            validate_identifier(collation)?;
            sql.push_str(&format!(" COLLATE {}", collation));
        }
        if let Some(engine) = &blueprint.engine {
            validate_identifier(engine)?;
            sql.push_str(&format!(" ENGINE = {}", engine));
        }

        Ok(sql)
    }

    fn compile_add(&self, blueprint: &Blueprint) -> GrammarResult<String> {
        let columns = prefix_list("ADD", &self.get_columns(blueprint)?).join(", ");
        Ok(format!("ALTER TABLE {} {}", self.wrap_table(blueprint.table()), columns))
    }

    fn compile_drop_column(
        &self,
        blueprint: &Blueprint,
        columns: &[String],
    ) -> GrammarResult<String> {
        if columns.is_empty() {
            return Err(GrammarError::malformed("drop column needs at least one column"));
        }
        let wrapped: Vec<String> = columns.iter().map(|column| self.wrap(column)).collect();
        Ok(format!(
            "ALTER TABLE {} {}",
            self.wrap_table(blueprint.table()),
            prefix_list("DROP", &wrapped).join(", ")
        ))
    }

    fn compile_rename(&self, blueprint: &Blueprint, to: &str) -> String {
        format!(
            "RENAME TABLE {} TO {}",
            self.wrap_table(blueprint.table()),
            self.wrap_table(to)
        )
    }

    fn compile_unique(
        &self,
        blueprint: &Blueprint,
        columns: &[String],
        index: &str,
    ) -> GrammarResult<String> {
        self.compile_key(blueprint, "UNIQUE", columns, index)
    }

    fn compile_index(
        &self,
        blueprint: &Blueprint,
        columns: &[String],
        index: &str,
    ) -> GrammarResult<String> {
        self.compile_key(blueprint, "INDEX", columns, index)
    }

    fn compile_drop_primary(
        &self,
        blueprint: &Blueprint,
        _index: Option<&str>,
    ) -> GrammarResult<String> {
        Ok(format!("ALTER TABLE {} DROP PRIMARY KEY", self.wrap_table(blueprint.table())))
    }

    fn compile_drop_unique(&self, blueprint: &Blueprint, index: &str) -> GrammarResult<String> {
        self.compile_drop_index(blueprint, index)
    }

    fn compile_drop_index(&self, blueprint: &Blueprint, index: &str) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!(
            "ALTER TABLE {} DROP INDEX {}",
            self.wrap_table(blueprint.table()),
            index
        ))
    }

    fn compile_drop_foreign(&self, blueprint: &Blueprint, index: &str) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!(
            "ALTER TABLE {} DROP FOREIGN KEY {}",
            self.wrap_table(blueprint.table()),
            index
        ))
    }
}
