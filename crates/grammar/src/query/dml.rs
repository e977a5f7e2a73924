//! Rows of column values for INSERT, UPDATE and upsert statements

use serde::{Deserialize, Serialize};

use crate::error::{GrammarError, GrammarResult};
use crate::expression::{Expression, Operand};

/// Ordered column/value pairs
///
/// Insertion order is the column order of the rendered statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    values: Vec<(String, Operand)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing an earlier value for the same column
    pub fn set<T: Into<Operand>>(mut self, column: &str, value: T) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column.to_string(), value)),
        }
        self
    }

    /// Set a column to raw SQL
    pub fn set_raw(self, column: &str, sql: &str) -> Self {
        self.set(column, Expression::new(sql))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Operand> {
        self.values.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, column: &str) -> Option<&Operand> {
        self.values.iter().find(|(name, _)| name == column).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Operand>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Row::new(), |row, (column, value)| {
            let column: String = column.into();
            row.set(&column, value)
        })
    }
}

/// Check that every row has exactly row 0's columns
///
/// Returns each row's operands rearranged into row 0's column order.
pub fn align_rows(rows: &[Row]) -> GrammarResult<(Vec<&str>, Vec<Vec<&Operand>>)> {
    let first = rows
        .first()
        .ok_or_else(|| GrammarError::invalid_rows("at least one row is required"))?;
    let columns: Vec<&str> = first.columns().collect();

    let mut aligned = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(GrammarError::invalid_rows(format!(
                "row {} has {} columns, row 0 has {}",
                index,
                row.len(),
                columns.len()
            )));
        }

        let mut values = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = row.get(column).ok_or_else(|| {
                GrammarError::invalid_rows(format!("row {} is missing column '{}'", index, column))
            })?;
            values.push(value);
        }
        aligned.push(values);
    }

    Ok((columns, aligned))
}
