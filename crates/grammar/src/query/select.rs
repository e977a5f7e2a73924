//! Statement column, aggregate, lock and union helpers

use super::builder::Statement;
use super::types::*;
use crate::expression::{Expression, Identifier};

impl Statement {
    /// Add SELECT columns, comma separated
    pub fn select(mut self, fields: &str) -> Self {
        self.columns.extend(
            fields
                .split(',')
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .map(Identifier::from),
        );
        self
    }

    /// Add SELECT DISTINCT columns
    pub fn select_distinct(mut self, fields: &str) -> Self {
        self.distinct = true;
        self.select(fields)
    }

    /// Add a raw SELECT expression
    pub fn select_raw(mut self, expression: &str) -> Self {
        self.columns.push(Identifier::Raw(Expression::new(expression)));
        self
    }

    /// Replace the column list with an aggregate function
    pub fn aggregate(mut self, function: &str, columns: &[&str]) -> Self {
        self.aggregate = Some(Aggregate {
            function: function.to_string(),
            columns: columns.iter().map(|c| Identifier::from(*c)).collect(),
        });
        self
    }

    /// COUNT aggregate
    pub fn count(self, column: &str) -> Self {
        self.aggregate("count", &[column])
    }

    /// Lock selected rows for update
    pub fn lock_for_update(mut self) -> Self {
        self.lock = Some(Lock::Exclusive);
        self
    }

    /// Share lock selected rows
    pub fn shared_lock(mut self) -> Self {
        self.lock = Some(Lock::Shared);
        self
    }

    /// Set the lock from a flag or raw hint
    pub fn lock<L: Into<Lock>>(mut self, lock: L) -> Self {
        self.lock = Some(lock.into());
        self
    }

    /// Add a UNION
    pub fn union(mut self, query: Statement) -> Self {
        self.unions.push(Union {
            query: Box::new(query),
            all: false,
        });
        self
    }

    /// Add a UNION ALL
    pub fn union_all(mut self, query: Statement) -> Self {
        self.unions.push(Union {
            query: Box::new(query),
            all: true,
        });
        self
    }
}
