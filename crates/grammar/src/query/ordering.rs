//! Statement ORDER BY, GROUP BY, LIMIT and OFFSET helpers

use super::builder::Statement;
use super::types::*;
use crate::expression::{Expression, Identifier};

impl Statement {
    /// Add ORDER BY clause (ascending)
    pub fn order_by(mut self, column: &str) -> Self {
        self.orders.push(Order::Column {
            column: column.into(),
            direction: OrderDirection::Asc,
        });
        self
    }

    /// Add ORDER BY clause (descending)
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.orders.push(Order::Column {
            column: column.into(),
            direction: OrderDirection::Desc,
        });
        self
    }

    /// Add a raw ORDER BY expression
    pub fn order_by_raw(mut self, sql: &str) -> Self {
        self.orders.push(Order::Raw(Expression::new(sql)));
        self
    }

    /// Add GROUP BY clause
    pub fn group_by(mut self, column: &str) -> Self {
        self.groups.push(Identifier::from(column));
        self
    }

    /// Set LIMIT
    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    /// Set OFFSET
    pub fn offset(mut self, count: u64) -> Self {
        self.offset = Some(count);
        self
    }

    /// Set LIMIT/OFFSET for a 1-based page
    pub fn paginate(self, per_page: u64, page: u64) -> Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        self.limit(per_page).offset(offset)
    }
}
