//! Statement model types - clauses, operators and connectors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::builder::Statement;
use crate::expression::{Expression, Identifier, Operand};
use crate::value::BindValue;

/// Boolean connector joining a clause to the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boolean {
    And,
    Or,
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boolean::And => write!(f, "AND"),
            Boolean::Or => write!(f, "OR"),
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryOperator {
    Equal,
    NotEqual,
    /// `<>`
    NotEqualAnsi,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    NotLike,
    ILike,
    BitAnd,
    BitOr,
    /// `#`, Postgres bitwise xor
    BitXor,
    ShiftLeft,
    ShiftRight,
}

impl QueryOperator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            QueryOperator::Equal => "=",
            QueryOperator::NotEqual => "!=",
            QueryOperator::NotEqualAnsi => "<>",
            QueryOperator::GreaterThan => ">",
            QueryOperator::GreaterThanOrEqual => ">=",
            QueryOperator::LessThan => "<",
            QueryOperator::LessThanOrEqual => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::NotLike => "NOT LIKE",
            QueryOperator::ILike => "ILIKE",
            QueryOperator::BitAnd => "&",
            QueryOperator::BitOr => "|",
            QueryOperator::BitXor => "#",
            QueryOperator::ShiftLeft => "<<",
            QueryOperator::ShiftRight => ">>",
        }
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl std::str::FromStr for QueryOperator {
    type Err = crate::error::GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.to_lowercase().as_str() {
            "=" => QueryOperator::Equal,
            "!=" => QueryOperator::NotEqual,
            "<>" => QueryOperator::NotEqualAnsi,
            ">" => QueryOperator::GreaterThan,
            ">=" => QueryOperator::GreaterThanOrEqual,
            "<" => QueryOperator::LessThan,
            "<=" => QueryOperator::LessThanOrEqual,
            "like" => QueryOperator::Like,
            "not like" => QueryOperator::NotLike,
            "ilike" => QueryOperator::ILike,
            "&" => QueryOperator::BitAnd,
            "|" => QueryOperator::BitOr,
            "#" => QueryOperator::BitXor,
            "<<" => QueryOperator::ShiftLeft,
            ">>" => QueryOperator::ShiftRight,
            _ => {
                return Err(crate::error::GrammarError::unsupported(format!(
                    "operator '{}'",
                    s
                )))
            }
        };
        Ok(op)
    }
}

/// A WHERE or HAVING predicate with its connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub boolean: Boolean,
    pub kind: WhereKind,
}

/// The shape of a predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WhereKind {
    /// `column op value`
    Basic {
        column: Identifier,
        operator: QueryOperator,
        value: Operand,
    },
    /// `first op second`, both columns
    Column {
        first: Identifier,
        operator: QueryOperator,
        second: Identifier,
    },
    Between {
        column: Identifier,
        low: Operand,
        high: Operand,
        negated: bool,
    },
    In {
        column: Identifier,
        values: Vec<Operand>,
        negated: bool,
    },
    InSub {
        column: Identifier,
        query: Box<Statement>,
        negated: bool,
    },
    Null {
        column: Identifier,
        negated: bool,
    },
    Raw(Expression),
    /// Parenthesized group of the inner statement's wheres
    Nested(Box<Statement>),
    Exists {
        query: Box<Statement>,
        negated: bool,
    },
    /// `column op (SELECT ...)`
    Sub {
        column: Identifier,
        operator: QueryOperator,
        query: Box<Statement>,
    },
}

/// Join types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER JOIN"),
            JoinType::Left => write!(f, "LEFT JOIN"),
            JoinType::Right => write!(f, "RIGHT JOIN"),
            JoinType::Cross => write!(f, "CROSS JOIN"),
        }
    }
}

/// Right-hand side of a join constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinValue {
    Column(Identifier),
    Bind(BindValue),
}

/// One `ON` constraint of a join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConstraint {
    pub boolean: Boolean,
    pub first: Identifier,
    pub operator: QueryOperator,
    pub second: JoinValue,
}

/// Join clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub clauses: Vec<JoinConstraint>,
}

impl JoinClause {
    pub fn new(join_type: JoinType, table: &str) -> Self {
        Self {
            join_type,
            table: table.to_string(),
            clauses: Vec::new(),
        }
    }

    /// Add an `AND first op second` column constraint
    pub fn on(mut self, first: &str, operator: QueryOperator, second: &str) -> Self {
        self.clauses.push(JoinConstraint {
            boolean: Boolean::And,
            first: first.into(),
            operator,
            second: JoinValue::Column(second.into()),
        });
        self
    }

    /// Add an `OR first op second` column constraint
    pub fn or_on(mut self, first: &str, operator: QueryOperator, second: &str) -> Self {
        self.clauses.push(JoinConstraint {
            boolean: Boolean::Or,
            first: first.into(),
            operator,
            second: JoinValue::Column(second.into()),
        });
        self
    }

    /// Add an `AND first op ?` constraint with a bound value
    pub fn on_value<T: Into<BindValue>>(
        mut self,
        first: &str,
        operator: QueryOperator,
        value: T,
    ) -> Self {
        self.clauses.push(JoinConstraint {
            boolean: Boolean::And,
            first: first.into(),
            operator,
            second: JoinValue::Bind(value.into()),
        });
        self
    }
}

/// Order by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// ORDER BY entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Order {
    Column {
        column: Identifier,
        direction: OrderDirection,
    },
    Raw(Expression),
}

/// Row lock requested by a select
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lock {
    Shared,
    Exclusive,
    /// Engine-specific lock hint passed through verbatim
    Raw(String),
}

impl From<bool> for Lock {
    /// `true` is an exclusive (update) lock, `false` a shared lock
    fn from(value: bool) -> Self {
        if value {
            Lock::Exclusive
        } else {
            Lock::Shared
        }
    }
}

impl From<&str> for Lock {
    fn from(value: &str) -> Self {
        Lock::Raw(value.to_string())
    }
}

/// Aggregate function replacing the column list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub function: String,
    pub columns: Vec<Identifier>,
}

/// A statement unioned onto the current one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Union {
    pub query: Box<Statement>,
    pub all: bool,
}
