//! Expression and identifier leaves
//!
//! Every leaf in a statement is either raw SQL that is inlined verbatim or a
//! value/name that the grammar quotes or binds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::BindValue;

/// Raw SQL fragment that bypasses quoting and parameter binding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expression(String);

impl Expression {
    pub fn new<S: Into<String>>(sql: S) -> Self {
        Self(sql.into())
    }

    /// The raw SQL text
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`Expression::new`]
pub fn raw<S: Into<String>>(sql: S) -> Expression {
    Expression::new(sql)
}

/// A column or table reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identifier {
    /// Quoted by the grammar; may contain `table.column` and `x as y`
    Name(String),
    /// Inlined verbatim
    Raw(Expression),
}

impl Identifier {
    pub fn is_raw(&self) -> bool {
        matches!(self, Identifier::Raw(_))
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Name(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Name(value)
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Identifier::Name(value.clone())
    }
}

impl From<Expression> for Identifier {
    fn from(value: Expression) -> Self {
        Identifier::Raw(value)
    }
}

/// The right-hand side of a comparison: a bound value or raw SQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Bind(BindValue),
    Raw(Expression),
}

impl From<Expression> for Operand {
    fn from(value: Expression) -> Self {
        Operand::Raw(value)
    }
}

impl<T: Into<BindValue>> From<T> for Operand {
    fn from(value: T) -> Self {
        Operand::Bind(value.into())
    }
}
