//! Statement WHERE clause helpers

use super::builder::Statement;
use super::types::*;
use crate::expression::{Expression, Identifier, Operand};

impl Statement {
    fn push_where(mut self, boolean: Boolean, kind: WhereKind) -> Self {
        self.wheres.push(WhereClause { boolean, kind });
        self
    }

    /// Add `column op value`
    pub fn where_op<T: Into<Operand>>(
        self,
        column: &str,
        operator: QueryOperator,
        value: T,
    ) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Basic {
                column: column.into(),
                operator,
                value: value.into(),
            },
        )
    }

    /// Add `OR column op value`
    pub fn or_where_op<T: Into<Operand>>(
        self,
        column: &str,
        operator: QueryOperator,
        value: T,
    ) -> Self {
        self.push_where(
            Boolean::Or,
            WhereKind::Basic {
                column: column.into(),
                operator,
                value: value.into(),
            },
        )
    }

    /// Add WHERE condition with equality
    pub fn where_eq<T: Into<Operand>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::Equal, value)
    }

    /// Add OR WHERE condition with equality
    pub fn or_where_eq<T: Into<Operand>>(self, column: &str, value: T) -> Self {
        self.or_where_op(column, QueryOperator::Equal, value)
    }

    /// Add WHERE condition with not equal
    pub fn where_ne<T: Into<Operand>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::NotEqual, value)
    }

    /// Add WHERE condition with greater than
    pub fn where_gt<T: Into<Operand>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::GreaterThan, value)
    }

    /// Add WHERE condition with less than
    pub fn where_lt<T: Into<Operand>>(self, column: &str, value: T) -> Self {
        self.where_op(column, QueryOperator::LessThan, value)
    }

    /// Add WHERE condition with LIKE
    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.where_op(column, QueryOperator::Like, pattern)
    }

    /// Compare two columns
    pub fn where_column(self, first: &str, operator: QueryOperator, second: &str) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Column {
                first: first.into(),
                operator,
                second: second.into(),
            },
        )
    }

    /// Add WHERE column IN (...)
    pub fn where_in<T: Into<Operand>>(self, column: &str, values: Vec<T>) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::In {
                column: column.into(),
                values: values.into_iter().map(Into::into).collect(),
                negated: false,
            },
        )
    }

    /// Add WHERE column NOT IN (...)
    pub fn where_not_in<T: Into<Operand>>(self, column: &str, values: Vec<T>) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::In {
                column: column.into(),
                values: values.into_iter().map(Into::into).collect(),
                negated: true,
            },
        )
    }

    /// Add WHERE column IN (subquery)
    pub fn where_in_sub(self, column: &str, query: Statement) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::InSub {
                column: column.into(),
                query: Box::new(query),
                negated: false,
            },
        )
    }

    /// Add WHERE column BETWEEN low AND high
    pub fn where_between<T: Into<Operand>>(self, column: &str, low: T, high: T) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Between {
                column: column.into(),
                low: low.into(),
                high: high.into(),
                negated: false,
            },
        )
    }

    /// Add WHERE column NOT BETWEEN low AND high
    pub fn where_not_between<T: Into<Operand>>(self, column: &str, low: T, high: T) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Between {
                column: column.into(),
                low: low.into(),
                high: high.into(),
                negated: true,
            },
        )
    }

    /// Add WHERE column IS NULL
    pub fn where_null(self, column: &str) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Null {
                column: column.into(),
                negated: false,
            },
        )
    }

    /// Add WHERE column IS NOT NULL
    pub fn where_not_null(self, column: &str) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Null {
                column: column.into(),
                negated: true,
            },
        )
    }

    /// Add a raw WHERE fragment
    pub fn where_raw(self, sql: &str) -> Self {
        self.push_where(Boolean::And, WhereKind::Raw(Expression::new(sql)))
    }

    /// Add a parenthesized group built from another statement's wheres
    pub fn where_nested<F>(self, build: F) -> Self
    where
        F: FnOnce(Statement) -> Statement,
    {
        let nested = build(Statement::new());
        self.push_where(Boolean::And, WhereKind::Nested(Box::new(nested)))
    }

    /// Add an OR parenthesized group
    pub fn or_where_nested<F>(self, build: F) -> Self
    where
        F: FnOnce(Statement) -> Statement,
    {
        let nested = build(Statement::new());
        self.push_where(Boolean::Or, WhereKind::Nested(Box::new(nested)))
    }

    /// Add WHERE EXISTS (subquery)
    pub fn where_exists(self, query: Statement) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Exists {
                query: Box::new(query),
                negated: false,
            },
        )
    }

    /// Add WHERE NOT EXISTS (subquery)
    pub fn where_not_exists(self, query: Statement) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Exists {
                query: Box::new(query),
                negated: true,
            },
        )
    }

    /// Add WHERE column op (subquery)
    pub fn where_sub(self, column: &str, operator: QueryOperator, query: Statement) -> Self {
        self.push_where(
            Boolean::And,
            WhereKind::Sub {
                column: column.into(),
                operator,
                query: Box::new(query),
            },
        )
    }

    /// Add a HAVING condition
    pub fn having<T: Into<Operand>>(
        mut self,
        column: &str,
        operator: QueryOperator,
        value: T,
    ) -> Self {
        self.havings.push(WhereClause {
            boolean: Boolean::And,
            kind: WhereKind::Basic {
                column: Identifier::from(column),
                operator,
                value: value.into(),
            },
        });
        self
    }

    /// Add a raw HAVING fragment
    pub fn having_raw(mut self, sql: &str) -> Self {
        self.havings.push(WhereClause {
            boolean: Boolean::And,
            kind: WhereKind::Raw(Expression::new(sql)),
        });
        self
    }
}
