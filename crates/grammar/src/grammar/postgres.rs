//! PostgreSQL query grammar

use crate::binder::{Binder, CompiledSql};
use crate::config::{Dialect, GrammarConfig};
use crate::error::{GrammarError, GrammarResult};
use crate::query::{JoinClause, Lock, QueryOperator, Row, Statement};
use crate::security::validate_identifier;

use super::query::{require_table, QueryGrammar};
use super::{remove_leading_boolean, Grammar};

const POSTGRES_OPERATORS: &[QueryOperator] = &[
    QueryOperator::Equal,
    QueryOperator::LessThan,
    QueryOperator::GreaterThan,
    QueryOperator::LessThanOrEqual,
    QueryOperator::GreaterThanOrEqual,
    QueryOperator::NotEqualAnsi,
    QueryOperator::NotEqual,
    QueryOperator::Like,
    QueryOperator::NotLike,
    QueryOperator::ILike,
    QueryOperator::BitAnd,
    QueryOperator::BitOr,
    QueryOperator::BitXor,
    QueryOperator::ShiftLeft,
    QueryOperator::ShiftRight,
];

#[derive(Debug, Clone, Default)]
pub struct PostgresQueryGrammar {
    config: GrammarConfig,
}

impl PostgresQueryGrammar {
    pub fn new(config: GrammarConfig) -> Self {
        Self { config }
    }

    /// Joined tables as a plain comma list, for `UPDATE .. FROM` and `DELETE .. USING`
    fn compile_join_tables(&self, joins: &[JoinClause]) -> String {
        joins
            .iter()
            .map(|join| self.wrap_table(&join.table))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Join constraints rendered as extra predicates, each with its connector
    fn compile_join_wheres(
        &self,
        joins: &[JoinClause],
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let mut wheres = Vec::new();
        for join in joins {
            for clause in &join.clauses {
                wheres.push(self.compile_join_constraint(clause, binder)?);
            }
        }
        Ok(wheres.join(" "))
    }

    /// The statement's wheres with join constraints folded in
    fn compile_wheres_with_joins(
        &self,
        query: &Statement,
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let base = self.compile_wheres(query, binder)?;
        if query.joins.is_empty() {
            return Ok(base);
        }

        let joins = self.compile_join_wheres(&query.joins, binder)?;
        if joins.is_empty() {
            return Ok(base);
        }
        if base.is_empty() {
            return Ok(format!("WHERE {}", remove_leading_boolean(&joins)));
        }
        Ok(format!("{} {}", base, joins))
    }
}

impl Grammar for PostgresQueryGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn config(&self) -> &GrammarConfig {
        &self.config
    }
}

impl QueryGrammar for PostgresQueryGrammar {
    fn operators(&self) -> &'static [QueryOperator] {
        POSTGRES_OPERATORS
    }

    fn compile_lock(&self, _query: &Statement, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive => "FOR UPDATE".to_string(),
            Lock::Shared => "FOR SHARE".to_string(),
            Lock::Raw(sql) => sql.clone(),
        }
    }

    /// `UPDATE t SET .. [FROM j1, j2] [WHERE ..]`
    ///
    /// Postgres has no JOIN in UPDATE: joined tables move into a FROM list
    /// and their constraints into the WHERE clause.
    fn compile_update_with(
        &self,
        query: &Statement,
        values: &Row,
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let table = self.wrap_table(require_table(query, "update")?);
        if values.is_empty() {
            return Err(GrammarError::malformed("update requires at least one column"));
        }

        let columns = self.compile_update_columns(values, binder);
        let from = if query.joins.is_empty() {
            String::new()
        } else {
            format!(" FROM {}", self.compile_join_tables(&query.joins))
        };
        let wheres = self.compile_wheres_with_joins(query, binder)?;

        Ok(format!("UPDATE {} SET {}{} {}", table, columns, from, wheres)
            .trim()
            .to_string())
    }

    /// `DELETE FROM t [USING j1, j2] [WHERE ..]`
    fn compile_delete_with(&self, query: &Statement, binder: &mut Binder) -> GrammarResult<String> {
        let table = self.wrap_table(require_table(query, "delete")?);
        let using = if query.joins.is_empty() {
            String::new()
        } else {
            format!(" USING {}", self.compile_join_tables(&query.joins))
        };
        let wheres = self.compile_wheres_with_joins(query, binder)?;

        Ok(format!("DELETE FROM {}{} {}", table, using, wheres)
            .trim()
            .to_string())
    }

    fn compile_insert_get_id(
        &self,
        query: &Statement,
        values: &[Row],
        sequence: Option<&str>,
    ) -> GrammarResult<CompiledSql> {
        let mut binder = self.binder();
        let insert = self.compile_insert_with(query, values, &mut binder)?;
        let sql = format!("{} RETURNING {}", insert, self.wrap(sequence.unwrap_or("id")));
        Ok(self.finish("insert", sql, binder))
    }

    /// `INSERT .. ON CONFLICT (keys) DO UPDATE SET col = EXCLUDED.col`
    ///
    /// With no update columns the conflict is ignored (`DO NOTHING`).
    fn compile_upsert(
        &self,
        query: &Statement,
        values: &[Row],
        conflict_keys: &[&str],
        conflict_columns: &[&str],
    ) -> GrammarResult<CompiledSql> {
        let table = self.wrap_table(require_table(query, "upsert")?);
        if conflict_keys.is_empty() {
            return Err(GrammarError::invalid_rows("ON CONFLICT needs at least one key"));
        }

        let mut binder = self.binder();
        let (columns, parameters) = self.compile_insert_values(values, &mut binder)?;

        let keys = conflict_keys
            .iter()
            .map(|key| self.wrap(key))
            .collect::<Vec<_>>()
            .join(", ");

        let action = if conflict_columns.is_empty() {
            "DO NOTHING".to_string()
        } else {
            let updates = conflict_columns
                .iter()
                .map(|column| {
                    validate_identifier(column)?;
                    Ok(format!("{} = EXCLUDED.{}", column, column))
                })
                .collect::<GrammarResult<Vec<_>>>()?
                .join(", ");
            format!("DO UPDATE SET {}", updates)
        };

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {} ON CONFLICT ({}) {}",
            table, columns, parameters, keys, action
        );
        Ok(self.finish("upsert", sql, binder))
    }

    fn compile_truncate(&self, query: &Statement) -> GrammarResult<CompiledSql> {
        let table = self.wrap_table(require_table(query, "truncate")?);
        let sql = format!("TRUNCATE {} RESTART IDENTITY", table);
        Ok(self.finish("truncate", sql, self.binder()))
    }
}
