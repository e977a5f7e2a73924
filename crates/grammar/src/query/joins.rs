//! Statement JOIN helpers

use super::builder::Statement;
use super::types::*;

impl Statement {
    /// Add INNER JOIN to the statement
    pub fn join(mut self, table: &str, left_col: &str, right_col: &str) -> Self {
        let join =
            JoinClause::new(JoinType::Inner, table).on(left_col, QueryOperator::Equal, right_col);
        self.joins.push(join);
        self
    }

    /// Add LEFT JOIN to the statement
    pub fn left_join(mut self, table: &str, left_col: &str, right_col: &str) -> Self {
        let join =
            JoinClause::new(JoinType::Left, table).on(left_col, QueryOperator::Equal, right_col);
        self.joins.push(join);
        self
    }

    /// Add RIGHT JOIN to the statement
    pub fn right_join(mut self, table: &str, left_col: &str, right_col: &str) -> Self {
        let join =
            JoinClause::new(JoinType::Right, table).on(left_col, QueryOperator::Equal, right_col);
        self.joins.push(join);
        self
    }

    /// Add CROSS JOIN to the statement
    pub fn cross_join(mut self, table: &str) -> Self {
        self.joins.push(JoinClause::new(JoinType::Cross, table));
        self
    }

    /// Add a fully specified join clause
    pub fn join_clause(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }
}
