//! Statement - the abstract form of a query handed to a grammar

use serde::{Deserialize, Serialize};

use super::types::*;
use crate::expression::Identifier;

/// Abstract query statement
///
/// Grammars only read these fields. An empty `columns` list selects `*`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub from: Option<String>,
    pub columns: Vec<Identifier>,
    pub distinct: bool,
    pub aggregate: Option<Aggregate>,
    pub joins: Vec<JoinClause>,
    pub wheres: Vec<WhereClause>,
    pub groups: Vec<Identifier>,
    pub havings: Vec<WhereClause>,
    pub orders: Vec<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub lock: Option<Lock>,
    pub unions: Vec<Union>,
}

impl Statement {
    /// Create an empty statement
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a statement against a table
    pub fn table(table: &str) -> Self {
        Self {
            from: Some(table.to_string()),
            ..Self::default()
        }
    }

    /// Set the FROM table
    pub fn from(mut self, table: &str) -> Self {
        self.from = Some(table.to_string());
        self
    }
}
