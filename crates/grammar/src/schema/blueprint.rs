//! Blueprint - the abstract form of a table schema change

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::column::{ColumnDefinition, ColumnType};
use super::grammar::SchemaGrammar;
use crate::error::GrammarResult;

/// Referential action for foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferentialAction::Cascade => write!(f, "CASCADE"),
            ReferentialAction::SetNull => write!(f, "SET NULL"),
            ReferentialAction::SetDefault => write!(f, "SET DEFAULT"),
            ReferentialAction::Restrict => write!(f, "RESTRICT"),
            ReferentialAction::NoAction => write!(f, "NO ACTION"),
        }
    }
}

/// Foreign key constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    /// Constraint name; generated from the table and columns when unset
    pub index: Option<String>,
    pub references: Vec<String>,
    pub on: Option<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: to_strings(columns),
            index: None,
            references: Vec::new(),
            on: None,
            on_delete: None,
            on_update: None,
        }
    }

    pub fn named(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn references(mut self, columns: &[&str]) -> Self {
        self.references = to_strings(columns);
        self
    }

    /// Referenced table
    pub fn on(mut self, table: &str) -> Self {
        self.on = Some(table.to_string());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

/// Index kinds, named in generated index names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Primary,
    Unique,
    Index,
    Foreign,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Primary => write!(f, "primary"),
            IndexKind::Unique => write!(f, "unique"),
            IndexKind::Index => write!(f, "index"),
            IndexKind::Foreign => write!(f, "foreign"),
        }
    }
}

/// Schema commands, compiled in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Create,
    /// Add the blueprint's columns to an existing table
    Add,
    Drop,
    DropIfExists,
    DropColumn { columns: Vec<String> },
    RenameColumn { from: String, to: String },
    Rename { to: String },
    Primary { columns: Vec<String>, index: String },
    Unique { columns: Vec<String>, index: String },
    Index { columns: Vec<String>, index: String },
    Foreign(ForeignKey),
    /// `None` drops the engine's default primary key constraint
    DropPrimary { index: Option<String> },
    DropUnique { index: String },
    DropIndex { index: String },
    DropForeign { index: String },
    Truncate,
}

/// Table schema change: columns plus the commands applied to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    table: String,
    columns: Vec<ColumnDefinition>,
    commands: Vec<Command>,
    /// MySQL storage engine
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
}

impl Blueprint {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            commands: Vec::new(),
            engine: None,
            charset: None,
            collation: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Compile every command, implied ones included, into SQL statements
    pub fn to_sql(&self, grammar: &dyn SchemaGrammar) -> GrammarResult<Vec<String>> {
        let commands = self.resolved_commands();
        debug!(
            "Compiling {} schema command(s) for table '{}' ({})",
            commands.len(),
            self.table,
            grammar.dialect()
        );

        commands
            .iter()
            .map(|command| grammar.compile(self, command))
            .collect()
    }

    /// Explicit commands plus those implied by columns
    ///
    /// Columns on a blueprint without `Create` imply a leading `Add`; column
    /// index flags imply trailing index commands.
    pub fn resolved_commands(&self) -> Vec<Command> {
        let mut commands = self.commands.clone();

        if !self.columns.is_empty() && !self.creating() {
            commands.insert(0, Command::Add);
        }

        for column in &self.columns {
            let columns = vec![column.name.clone()];
            if column.primary {
                let index = self.index_name(IndexKind::Primary, &columns);
                commands.push(Command::Primary { columns: columns.clone(), index });
            }
            if column.unique {
                let index = self.index_name(IndexKind::Unique, &columns);
                commands.push(Command::Unique { columns: columns.clone(), index });
            }
            if column.index {
                let index = self.index_name(IndexKind::Index, &columns);
                commands.push(Command::Index { columns, index });
            }
        }

        commands
    }

    fn creating(&self) -> bool {
        self.commands.iter().any(|command| matches!(command, Command::Create))
    }

    /// Default index name: `<table>_<columns>_<kind>`, lowercased
    pub fn index_name(&self, kind: IndexKind, columns: &[String]) -> String {
        format!("{}_{}_{}", self.table, columns.join("_"), kind)
            .to_lowercase()
            .replace(['-', '.'], "_")
    }

    // ----- commands -----

    pub fn create(&mut self) -> &mut Self {
        self.commands.push(Command::Create);
        self
    }

    pub fn drop(&mut self) -> &mut Self {
        self.commands.push(Command::Drop);
        self
    }

    pub fn drop_if_exists(&mut self) -> &mut Self {
        self.commands.push(Command::DropIfExists);
        self
    }

    pub fn drop_column(&mut self, columns: &[&str]) -> &mut Self {
        self.commands.push(Command::DropColumn { columns: to_strings(columns) });
        self
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> &mut Self {
        self.commands.push(Command::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    /// Rename the table
    pub fn rename(&mut self, to: &str) -> &mut Self {
        self.commands.push(Command::Rename { to: to.to_string() });
        self
    }

    pub fn primary(&mut self, columns: &[&str], name: Option<&str>) -> &mut Self {
        let (columns, index) = self.index_parts(IndexKind::Primary, columns, name);
        self.commands.push(Command::Primary { columns, index });
        self
    }

    pub fn unique(&mut self, columns: &[&str], name: Option<&str>) -> &mut Self {
        let (columns, index) = self.index_parts(IndexKind::Unique, columns, name);
        self.commands.push(Command::Unique { columns, index });
        self
    }

    pub fn index(&mut self, columns: &[&str], name: Option<&str>) -> &mut Self {
        let (columns, index) = self.index_parts(IndexKind::Index, columns, name);
        self.commands.push(Command::Index { columns, index });
        self
    }

    pub fn foreign(&mut self, mut foreign: ForeignKey) -> &mut Self {
        if foreign.index.is_none() {
            foreign.index = Some(self.index_name(IndexKind::Foreign, &foreign.columns));
        }
        self.commands.push(Command::Foreign(foreign));
        self
    }

    pub fn drop_primary(&mut self) -> &mut Self {
        self.commands.push(Command::DropPrimary { index: None });
        self
    }

    pub fn drop_primary_named(&mut self, index: &str) -> &mut Self {
        self.commands.push(Command::DropPrimary { index: Some(index.to_string()) });
        self
    }

    pub fn drop_unique(&mut self, index: &str) -> &mut Self {
        self.commands.push(Command::DropUnique { index: index.to_string() });
        self
    }

    pub fn drop_index(&mut self, index: &str) -> &mut Self {
        self.commands.push(Command::DropIndex { index: index.to_string() });
        self
    }

    pub fn drop_foreign(&mut self, index: &str) -> &mut Self {
        self.commands.push(Command::DropForeign { index: index.to_string() });
        self
    }

    pub fn truncate(&mut self) -> &mut Self {
        self.commands.push(Command::Truncate);
        self
    }

    fn index_parts(
        &self,
        kind: IndexKind,
        columns: &[&str],
        name: Option<&str>,
    ) -> (Vec<String>, String) {
        let columns = to_strings(columns);
        let index = match name {
            Some(name) => name.to_string(),
            None => self.index_name(kind, &columns),
        };
        (columns, index)
    }

    // ----- columns -----

    /// Add a column and return it for further modification
    pub fn add_column(&mut self, name: &str, column_type: ColumnType) -> &mut ColumnDefinition {
        let index = self.columns.len();
        self.columns.push(ColumnDefinition::new(name, column_type));
        &mut self.columns[index]
    }

    /// Auto-incrementing unsigned integer primary key
    pub fn increments(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Integer).unsigned().auto_increment()
    }

    /// Auto-incrementing unsigned big integer primary key
    pub fn big_increments(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::BigInteger).unsigned().auto_increment()
    }

    pub fn integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Integer)
    }

    pub fn big_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::BigInteger)
    }

    pub fn medium_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::MediumInteger)
    }

    pub fn small_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::SmallInteger)
    }

    pub fn tiny_integer(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::TinyInteger)
    }

    pub fn char(&mut self, name: &str, length: u32) -> &mut ColumnDefinition {
        let column = self.add_column(name, ColumnType::Char);
        column.length = Some(length);
        column
    }

    pub fn string(&mut self, name: &str, length: u32) -> &mut ColumnDefinition {
        let column = self.add_column(name, ColumnType::String);
        column.length = Some(length);
        column
    }

    pub fn text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Text)
    }

    pub fn medium_text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::MediumText)
    }

    pub fn long_text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::LongText)
    }

    pub fn float(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Float)
    }

    pub fn double(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Double)
    }

    pub fn decimal(&mut self, name: &str, total: u32, places: u32) -> &mut ColumnDefinition {
        let column = self.add_column(name, ColumnType::Decimal);
        column.total = Some(total);
        column.places = Some(places);
        column
    }

    pub fn boolean(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Boolean)
    }

    pub fn enumeration(&mut self, name: &str, allowed: &[&str]) -> &mut ColumnDefinition {
        let column = self.add_column(name, ColumnType::Enum);
        column.allowed = to_strings(allowed);
        column
    }

    pub fn json(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Json)
    }

    pub fn date(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Date)
    }

    pub fn datetime(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::DateTime)
    }

    pub fn time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Time)
    }

    pub fn timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Timestamp)
    }

    /// `created_at` and `updated_at`, defaulting to the current time
    pub fn timestamps(&mut self) -> &mut Self {
        self.timestamp("created_at").use_current();
        self.timestamp("updated_at").use_current();
        self
    }

    /// Nullable `created_at` and `updated_at`
    pub fn nullable_timestamps(&mut self) -> &mut Self {
        self.timestamp("created_at").nullable();
        self.timestamp("updated_at").nullable();
        self
    }

    pub fn binary(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Binary)
    }

    pub fn uuid(&mut self, name: &str) -> &mut ColumnDefinition {
        self.add_column(name, ColumnType::Uuid)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_scheme() {
        let blueprint = Blueprint::new("Users");
        let columns = vec!["first-name".to_string(), "profile.email".to_string()];

        assert_eq!(
            blueprint.index_name(IndexKind::Unique, &columns),
            "users_first_name_profile_email_unique"
        );
    }

    #[test]
    fn test_columns_imply_add_command() {
        let mut blueprint = Blueprint::new("users");
        blueprint.string("nickname", 64).nullable();

        assert_eq!(blueprint.resolved_commands(), vec![Command::Add]);
    }

    #[test]
    fn test_create_does_not_imply_add() {
        let mut blueprint = Blueprint::new("users");
        blueprint.create();
        blueprint.increments("id");

        assert_eq!(blueprint.resolved_commands(), vec![Command::Create]);
    }

    #[test]
    fn test_column_flags_imply_index_commands() {
        let mut blueprint = Blueprint::new("users");
        blueprint.create();
        blueprint.string("email", 255).unique();
        blueprint.integer("team_id").index();

        assert_eq!(
            blueprint.resolved_commands(),
            vec![
                Command::Create,
                Command::Unique {
                    columns: vec!["email".to_string()],
                    index: "users_email_unique".to_string(),
                },
                Command::Index {
                    columns: vec!["team_id".to_string()],
                    index: "users_team_id_index".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_foreign_key_gets_generated_name() {
        let mut blueprint = Blueprint::new("posts");
        blueprint.foreign(ForeignKey::new(&["user_id"]).references(&["id"]).on("users"));

        match &blueprint.commands()[0] {
            Command::Foreign(foreign) => {
                assert_eq!(foreign.index.as_deref(), Some("posts_user_id_foreign"))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
