//! Base schema grammar
//!
//! Column types and modifiers are rendered through per-dialect lookup tables
//! built once on first use. A type or modifier with no registered renderer is
//! an [`UnsupportedOperation`](crate::error::GrammarError::UnsupportedOperation).

use std::collections::HashMap;

use tracing::debug;

use super::blueprint::{Blueprint, Command, ForeignKey, IndexKind};
use super::column::{ColumnDefinition, ColumnType, Modifier};
use crate::binder::CompiledSql;
use crate::error::{GrammarError, GrammarResult};
use crate::grammar::Grammar;
use crate::security::validate_identifier;

/// Renders the SQL type of a column
pub type TypeRenderer = fn(&ColumnDefinition) -> String;

/// Renders one modifier of a column; empty when the modifier does not apply
pub type ModifierRenderer = fn(&dyn SchemaGrammar, &ColumnDefinition) -> GrammarResult<String>;

pub type TypeTable = HashMap<ColumnType, TypeRenderer>;
pub type ModifierTable = HashMap<Modifier, ModifierRenderer>;

/// Dialect-specific rendering of blueprints into DDL
pub trait SchemaGrammar: Grammar {
    /// Modifiers in the order they are appended after the column type
    fn modifiers(&self) -> &'static [Modifier];

    fn type_renderers(&self) -> &'static TypeTable;

    fn modifier_renderers(&self) -> &'static ModifierTable;

    /// Query checking whether a table exists, with the table name bound
    fn compile_table_exists(&self, table: &str) -> CompiledSql;

    /// Query listing a table's column names, with the table name bound
    fn compile_column_listing(&self, table: &str) -> CompiledSql;

    /// Compile one blueprint command
    fn compile(&self, blueprint: &Blueprint, command: &Command) -> GrammarResult<String> {
        let sql = match command {
            Command::Create => self.compile_create(blueprint)?,
            Command::Add => self.compile_add(blueprint)?,
            Command::Drop => format!("DROP TABLE {}", self.wrap_table(blueprint.table())),
            Command::DropIfExists => {
                format!("DROP TABLE IF EXISTS {}", self.wrap_table(blueprint.table()))
            }
            Command::DropColumn { columns } => self.compile_drop_column(blueprint, columns)?,
            Command::RenameColumn { from, to } => format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.wrap_table(blueprint.table()),
                self.wrap(from),
                self.wrap(to)
            ),
            Command::Rename { to } => self.compile_rename(blueprint, to),
            Command::Primary { columns, index } => self.compile_primary(blueprint, columns, index)?,
            Command::Unique { columns, index } => self.compile_unique(blueprint, columns, index)?,
            Command::Index { columns, index } => self.compile_index(blueprint, columns, index)?,
            Command::Foreign(foreign) => self.compile_foreign(blueprint, foreign)?,
            Command::DropPrimary { index } => {
                self.compile_drop_primary(blueprint, index.as_deref())?
            }
            Command::DropUnique { index } => self.compile_drop_unique(blueprint, index)?,
            Command::DropIndex { index } => self.compile_drop_index(blueprint, index)?,
            Command::DropForeign { index } => self.compile_drop_foreign(blueprint, index)?,
            Command::Truncate => self.compile_truncate(blueprint),
        };

        debug!("Compiled {} schema command for '{}': {}", self.dialect(), blueprint.table(), sql);
        Ok(sql)
    }

    /// SQL type of a column from the dialect's type table
    fn type_sql(&self, column: &ColumnDefinition) -> GrammarResult<String> {
        let render = self.type_renderers().get(&column.column_type).ok_or_else(|| {
            GrammarError::unsupported(format!(
                "column type '{}' for {}",
                column.column_type,
                self.dialect()
            ))
        })?;
        Ok(render(column))
    }

    /// Full definitions of the blueprint's columns, see [`column_definitions`]
    fn get_columns(&self, blueprint: &Blueprint) -> GrammarResult<Vec<String>>;

    fn compile_create(&self, blueprint: &Blueprint) -> GrammarResult<String> {
        let columns = self.get_columns(blueprint)?.join(", ");
        Ok(format!(
            "CREATE TABLE {} ({})",
            self.wrap_table(blueprint.table()),
            columns
        ))
    }

    fn compile_add(&self, blueprint: &Blueprint) -> GrammarResult<String> {
        let columns = prefix_list("ADD COLUMN", &self.get_columns(blueprint)?).join(", ");
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
            prefix_list("DROP COLUMN", &wrapped).join(", ")
        ))
    }

    fn compile_rename(&self, blueprint: &Blueprint, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {}",
            self.wrap_table(blueprint.table()),
            self.wrap_table(to)
        )
    }

    fn compile_primary(
        &self,
        blueprint: &Blueprint,
        columns: &[String],
        _index: &str,
    ) -> GrammarResult<String> {
        Ok(format!(
            "ALTER TABLE {} ADD PRIMARY KEY ({})",
            self.wrap_table(blueprint.table()),
            self.columnize_names(columns)
        ))
    }

    fn compile_unique(
        &self,
        blueprint: &Blueprint,
        columns: &[String],
        index: &str,
    ) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
            self.wrap_table(blueprint.table()),
            index,
            self.columnize_names(columns)
        ))
    }

    fn compile_index(
        &self,
        blueprint: &Blueprint,
        columns: &[String],
        index: &str,
    ) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!(
            "CREATE INDEX {} ON {} ({})",
            index,
            self.wrap_table(blueprint.table()),
            self.columnize_names(columns)
        ))
    }

    /// `ALTER TABLE t ADD CONSTRAINT idx FOREIGN KEY (..) REFERENCES other (..)`
    fn compile_foreign(
        &self,
        blueprint: &Blueprint,
        foreign: &ForeignKey,
    ) -> GrammarResult<String> {
        let on = foreign.on.as_deref().ok_or_else(|| {
            GrammarError::malformed(format!(
                "foreign key on '{}' has no referenced table",
                blueprint.table()
            ))
        })?;
        if foreign.columns.is_empty() || foreign.references.len() != foreign.columns.len() {
            return Err(GrammarError::malformed(format!(
                "foreign key on '{}' must reference as many columns as it constrains",
                blueprint.table()
            )));
        }

        let index = match &foreign.index {
            Some(index) => index.clone(),
            None => blueprint.index_name(IndexKind::Foreign, &foreign.columns),
        };
        validate_identifier(&index)?;

        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.wrap_table(blueprint.table()),
            index,
            self.columnize_names(&foreign.columns),
            self.wrap_table(on),
            self.columnize_names(&foreign.references)
        );
        if let Some(action) = foreign.on_delete {
            sql.push_str(&format!(" ON DELETE {}", action));
        }
        if let Some(action) = foreign.on_update {
            sql.push_str(&format!(" ON UPDATE {}", action));
        }
        Ok(sql)
    }

    /// Without a name, drops `<prefix><table>_pkey`, the name Postgres gives
    /// an unnamed primary key
    fn compile_drop_primary(
        &self,
        blueprint: &Blueprint,
        index: Option<&str>,
    ) -> GrammarResult<String> {
        let index = match index {
            Some(index) => index.to_string(),
            None => format!("{}{}_pkey", self.config().table_prefix, blueprint.table()),
        };
        validate_identifier(&index)?;
        Ok(format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.wrap_table(blueprint.table()),
            index
        ))
    }

    fn compile_drop_unique(&self, blueprint: &Blueprint, index: &str) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.wrap_table(blueprint.table()),
            index
        ))
    }

    fn compile_drop_index(&self, _blueprint: &Blueprint, index: &str) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!("DROP INDEX {}", index))
    }

    fn compile_drop_foreign(&self, blueprint: &Blueprint, index: &str) -> GrammarResult<String> {
        validate_identifier(index)?;
        Ok(format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.wrap_table(blueprint.table()),
            index
        ))
    }

    fn compile_truncate(&self, blueprint: &Blueprint) -> String {
        format!("TRUNCATE TABLE {}", self.wrap_table(blueprint.table()))
    }
}

/// Apply the grammar's modifiers to a column, in order
pub fn modify_column(
    grammar: &dyn SchemaGrammar,
    column: &ColumnDefinition,
) -> GrammarResult<String> {
    let renderers = grammar.modifier_renderers();
    let mut sql = String::new();

    for modifier in grammar.modifiers() {
        let render = renderers.get(modifier).ok_or_else(|| {
            GrammarError::unsupported(format!("modifier '{}' for {}", modifier, grammar.dialect()))
        })?;
        sql.push_str(&render(grammar, column)?);
    }

    Ok(sql)
}

/// `<wrapped name> <type><modifiers>` for each column of the blueprint
pub fn column_definitions(
    grammar: &dyn SchemaGrammar,
    blueprint: &Blueprint,
) -> GrammarResult<Vec<String>> {
    if blueprint.columns().is_empty() {
        return Err(GrammarError::malformed(format!(
            "blueprint for '{}' has no columns",
            blueprint.table()
        )));
    }

    blueprint
        .columns()
        .iter()
        .map(|column| {
            Ok(format!(
                "{} {}{}",
                grammar.wrap(&column.name),
                grammar.type_sql(column)?,
                modify_column(grammar, column)?
            ))
        })
        .collect()
}

/// Prefix each entry, e.g. `ADD COLUMN x`
pub fn prefix_list(prefix: &str, values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| format!("{} {}", prefix, value))
        .collect()
}
