//! Column definitions for schema blueprints

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GrammarError, GrammarResult};
use crate::expression::Operand;
use crate::value::BindValue;

/// Column type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    BigInteger,
    Integer,
    MediumInteger,
    SmallInteger,
    TinyInteger,
    Char,
    String,
    Text,
    MediumText,
    LongText,
    Float,
    Double,
    Decimal,
    Boolean,
    Enum,
    Json,
    Date,
    DateTime,
    Time,
    Timestamp,
    Binary,
    Uuid,
}

impl ColumnType {
    /// Integer types that become serial columns when auto-incremented
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::BigInteger
                | ColumnType::Integer
                | ColumnType::MediumInteger
                | ColumnType::SmallInteger
                | ColumnType::TinyInteger
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::BigInteger => "big_integer",
            ColumnType::Integer => "integer",
            ColumnType::MediumInteger => "medium_integer",
            ColumnType::SmallInteger => "small_integer",
            ColumnType::TinyInteger => "tiny_integer",
            ColumnType::Char => "char",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::MediumText => "medium_text",
            ColumnType::LongText => "long_text",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Decimal => "decimal",
            ColumnType::Boolean => "boolean",
            ColumnType::Enum => "enum",
            ColumnType::Json => "json",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Time => "time",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Binary => "binary",
            ColumnType::Uuid => "uuid",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column modifiers a dialect may append after the type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Unsigned,
    Charset,
    Collate,
    Nullable,
    Default,
    Increment,
    Comment,
    After,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Modifier::Unsigned => "unsigned",
            Modifier::Charset => "charset",
            Modifier::Collate => "collate",
            Modifier::Nullable => "nullable",
            Modifier::Default => "default",
            Modifier::Increment => "increment",
            Modifier::Comment => "comment",
            Modifier::After => "after",
        };
        f.write_str(name)
    }
}

pub const DEFAULT_STRING_LENGTH: u32 = 255;
pub const DEFAULT_DECIMAL_TOTAL: u32 = 8;
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// A column added or created by a blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub length: Option<u32>,
    pub total: Option<u32>,
    pub places: Option<u32>,
    /// Allowed values of an enum column
    pub allowed: Vec<String>,
    pub nullable: bool,
    pub default: Option<Operand>,
    pub auto_increment: bool,
    /// Timestamp defaults to the current time
    pub use_current: bool,
    pub unsigned: bool,
    pub comment: Option<String>,
    pub after: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub primary: bool,
    pub unique: bool,
    pub index: bool,
}

impl ColumnDefinition {
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            length: None,
            total: None,
            places: None,
            allowed: Vec::new(),
            nullable: false,
            default: None,
            auto_increment: false,
            use_current: false,
            unsigned: false,
            comment: None,
            after: None,
            charset: None,
            collation: None,
            primary: false,
            unique: false,
            index: false,
        }
    }

    pub fn length_or_default(&self) -> u32 {
        self.length.unwrap_or(DEFAULT_STRING_LENGTH)
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Set a default; bound values are inlined as quoted literals
    pub fn default<T: Into<Operand>>(&mut self, value: T) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    pub fn use_current(&mut self) -> &mut Self {
        self.use_current = true;
        self
    }

    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    pub fn comment(&mut self, comment: &str) -> &mut Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Place the column after another (MySQL)
    pub fn after(&mut self, column: &str) -> &mut Self {
        self.after = Some(column.to_string());
        self
    }

    pub fn charset(&mut self, charset: &str) -> &mut Self {
        self.charset = Some(charset.to_string());
        self
    }

    pub fn collation(&mut self, collation: &str) -> &mut Self {
        self.collation = Some(collation.to_string());
        self
    }

    /// Also add a primary key on this column
    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self
    }

    /// Also add a unique index on this column
    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self
    }

    /// Also add a plain index on this column
    pub fn index(&mut self) -> &mut Self {
        self.index = true;
        self
    }
}

/// Render a column default as inline SQL
///
/// DDL cannot carry bound parameters, so values are quoted literals using the
/// dialect's `quote`. Raw expressions are inlined as they are.
pub fn default_value(value: &Operand, quote: fn(&str) -> String) -> GrammarResult<String> {
    let value = match value {
        Operand::Raw(expression) => return Ok(expression.value().to_string()),
        Operand::Bind(value) => value,
    };

    let literal = match value {
        BindValue::Null => return Ok("NULL".to_string()),
        BindValue::Bool(flag) => return Ok(if *flag { "'1'" } else { "'0'" }.to_string()),
        BindValue::Int32(v) => v.to_string(),
        BindValue::Int64(v) => v.to_string(),
        BindValue::Float32(v) => v.to_string(),
        BindValue::Float64(v) => v.to_string(),
        BindValue::String(v) => v.clone(),
        BindValue::Uuid(v) => v.to_string(),
        BindValue::DateTime(v) => v.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
        BindValue::Date(v) => v.to_string(),
        BindValue::Time(v) => v.to_string(),
        BindValue::Json(v) => v.to_string(),
        BindValue::Bytes(_) => {
            return Err(GrammarError::unsupported("binary column default values"))
        }
    };

    Ok(quote(&literal))
}
