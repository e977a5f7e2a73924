//! MySQL query grammar

use crate::binder::{Binder, CompiledSql};
use crate::config::{Dialect, GrammarConfig};
use crate::error::{GrammarError, GrammarResult};
use crate::query::{Lock, QueryOperator, Row, Statement, Union};
use crate::security::validate_identifier;

use super::query::{base_update, require_table, QueryGrammar, SelectComponent};
use super::Grammar;

/// MySQL renders unions outside the component list
const MYSQL_SELECT_COMPONENTS: &[SelectComponent] = &[
    SelectComponent::Aggregate,
    SelectComponent::Columns,
    SelectComponent::From,
    SelectComponent::Joins,
    SelectComponent::Wheres,
    SelectComponent::Groups,
    SelectComponent::Havings,
    SelectComponent::Orders,
    SelectComponent::Limit,
    SelectComponent::Offset,
    SelectComponent::Lock,
];

const MYSQL_OPERATORS: &[QueryOperator] = &[
    QueryOperator::Equal,
    QueryOperator::LessThan,
    QueryOperator::GreaterThan,
    QueryOperator::LessThanOrEqual,
    QueryOperator::GreaterThanOrEqual,
    QueryOperator::NotEqualAnsi,
    QueryOperator::NotEqual,
    QueryOperator::Like,
    QueryOperator::NotLike,
    QueryOperator::BitAnd,
    QueryOperator::BitOr,
    QueryOperator::ShiftLeft,
    QueryOperator::ShiftRight,
];

#[derive(Debug, Clone, Default)]
pub struct MySqlQueryGrammar {
    config: GrammarConfig,
}

impl MySqlQueryGrammar {
    pub fn new(config: GrammarConfig) -> Self {
        Self { config }
    }

    /// Trailing `ORDER BY` / `LIMIT` that MySQL allows on UPDATE and DELETE
    fn compile_trailing(&self, query: &Statement) -> String {
        let mut sql = String::new();
        if !query.orders.is_empty() {
            sql.push(' ');
            sql.push_str(&self.compile_orders(&query.orders));
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        sql
    }
}

impl Grammar for MySqlQueryGrammar {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn config(&self) -> &GrammarConfig {
        &self.config
    }

    fn identifier_quote(&self) -> char {
        '`'
    }
}

impl QueryGrammar for MySqlQueryGrammar {
    fn select_components(&self) -> &'static [SelectComponent] {
        MYSQL_SELECT_COMPONENTS
    }

    fn operators(&self) -> &'static [QueryOperator] {
        MYSQL_OPERATORS
    }

    fn compile_lock(&self, _query: &Statement, lock: &Lock) -> String {
        match lock {
            Lock::Exclusive => "FOR UPDATE".to_string(),
            Lock::Shared => "LOCK IN SHARE MODE".to_string(),
            Lock::Raw(sql) => sql.clone(),
        }
    }

    fn compile_select_with(&self, query: &Statement, binder: &mut Binder) -> GrammarResult<String> {
        let sql = self.compile_components(query, binder)?;
        if query.unions.is_empty() {
            return Ok(sql);
        }
        Ok(format!("({}) {}", sql, self.compile_unions(&query.unions, binder)?))
    }

    fn compile_unions(&self, unions: &[Union], binder: &mut Binder) -> GrammarResult<String> {
        let mut sql = Vec::with_capacity(unions.len());
        for union in unions {
            let keyword = if union.all { "UNION ALL" } else { "UNION" };
            sql.push(format!("{} ({})", keyword, self.compile_select_with(&union.query, binder)?));
        }
        Ok(sql.join(" "))
    }

    fn compile_insert_default_values(&self, table: &str) -> String {
        format!("INSERT INTO {} () VALUES ()", table)
    }

    fn compile_update_with(
        &self,
        query: &Statement,
        values: &Row,
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let mut sql = base_update(self, query, values, binder)?;
        sql.push_str(&self.compile_trailing(query));
        Ok(sql.trim_end().to_string())
    }

    fn compile_delete_with(&self, query: &Statement, binder: &mut Binder) -> GrammarResult<String> {
        let table = self.wrap_table(require_table(query, "delete")?);

        let sql = if query.joins.is_empty() {
            let wheres = self.compile_wheres(query, binder)?;
            format!("DELETE FROM {} {}", table, wheres)
        } else {
            let joins = self.compile_joins(&query.joins, binder)?;
            let wheres = self.compile_wheres(query, binder)?;
            format!("DELETE {} FROM {} {} {}", table, table, joins, wheres)
        };

        let mut sql = sql.trim().to_string();
        sql.push_str(&self.compile_trailing(query));
        Ok(sql)
    }

    /// `INSERT .. ON DUPLICATE KEY UPDATE col = col`
    ///
    /// MySQL has no conflict target, so `conflict_keys` is not rendered.
    fn compile_upsert(
        &self,
        query: &Statement,
        values: &[Row],
        _conflict_keys: &[&str],
        conflict_columns: &[&str],
    ) -> GrammarResult<CompiledSql> {
        let table = self.wrap_table(require_table(query, "upsert")?);
        if conflict_columns.is_empty() {
            return Err(GrammarError::invalid_rows(
                "ON DUPLICATE KEY UPDATE needs at least one column",
            ));
        }

        let mut binder = self.binder();
        let (columns, parameters) = self.compile_insert_values(values, &mut binder)?;

        let updates = conflict_columns
            .iter()
            .map(|column| {
                validate_identifier(column)?;
                Ok(format!("{} = {}", column, column))
            })
            .collect::<GrammarResult<Vec<_>>>()?
            .join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {} ON DUPLICATE KEY UPDATE {}",
            table, columns, parameters, updates
        );
        Ok(self.finish("upsert", sql, binder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BindValue;

    #[test]
    fn test_lock_rendering() {
        let grammar = MySqlQueryGrammar::default();
        let query = Statement::table("users");

        assert_eq!(grammar.compile_lock(&query, &Lock::from(true)), "FOR UPDATE");
        assert_eq!(grammar.compile_lock(&query, &Lock::from(false)), "LOCK IN SHARE MODE");
        assert_eq!(
            grammar.compile_lock(&query, &Lock::from("FOR UPDATE SKIP LOCKED")),
            "FOR UPDATE SKIP LOCKED"
        );
    }

    #[test]
    fn test_select_uses_backticks_and_question_markers() {
        let grammar = MySqlQueryGrammar::default();
        let query = Statement::table("users").where_eq("id", 5).lock_for_update();

        let compiled = grammar.compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM `users` WHERE `id` = ? FOR UPDATE");
        assert_eq!(compiled.params, vec![BindValue::Int32(5)]);
    }

    #[test]
    fn test_delete_with_and_without_join() {
        let grammar = MySqlQueryGrammar::default();

        let plain = Statement::table("t").where_eq("id", 1);
        assert_eq!(
            grammar.compile_delete(&plain).unwrap().sql,
            "DELETE FROM `t` WHERE `id` = ?"
        );

        let joined = Statement::table("t")
            .join("u", "t.user_id", "u.id")
            .where_eq("u.banned", true);
        assert_eq!(
            grammar.compile_delete(&joined).unwrap().sql,
            "DELETE `t` FROM `t` INNER JOIN `u` ON `t`.`user_id` = `u`.`id` WHERE `u`.`banned` = ?"
        );
    }

    #[test]
    fn test_delete_and_update_append_order_and_limit() {
        let grammar = MySqlQueryGrammar::default();
        let query = Statement::table("logs").order_by("created_at").limit(10);

        assert_eq!(
            grammar.compile_delete(&query).unwrap().sql,
            "DELETE FROM `logs` ORDER BY `created_at` ASC LIMIT 10"
        );

        let update = grammar
            .compile_update(&query, &Row::new().set("archived", true))
            .unwrap();
        assert_eq!(
            update.sql,
            "UPDATE `logs` SET `archived` = ? ORDER BY `created_at` ASC LIMIT 10"
        );
    }

    #[test]
    fn test_upsert_renders_duplicate_key_clause() {
        let grammar = MySqlQueryGrammar::default();
        let rows = vec![
            Row::new().set("id", 1).set("name", "a"),
            Row::new().set("id", 2).set("name", "b"),
        ];

        let compiled = grammar
            .compile_upsert(&Statement::table("users"), &rows, &["id"], &["name"])
            .unwrap();
        assert_eq!(
            compiled.sql,
            "INSERT INTO `users` (`id`, `name`) VALUES (?, ?), (?, ?) ON DUPLICATE KEY UPDATE name = name"
        );
        assert_eq!(compiled.params.len(), 4);
    }

    #[test]
    fn test_upsert_rejects_unsafe_update_column() {
        let grammar = MySqlQueryGrammar::default();
        let rows = vec![Row::new().set("id", 1)];

        let result = grammar.compile_upsert(
            &Statement::table("users"),
            &rows,
            &["id"],
            &["id; DROP TABLE users"],
        );
        assert!(matches!(result, Err(GrammarError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_unions_are_parenthesized() {
        let grammar = MySqlQueryGrammar::default();
        let query = Statement::table("a")
            .where_eq("x", 1)
            .union_all(Statement::table("b").where_eq("x", 2));

        let compiled = grammar.compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "(SELECT * FROM `a` WHERE `x` = ?) UNION ALL (SELECT * FROM `b` WHERE `x` = ?)"
        );
        assert_eq!(compiled.params, vec![BindValue::Int32(1), BindValue::Int32(2)]);
    }

    #[test]
    fn test_rejects_postgres_only_operators() {
        let grammar = MySqlQueryGrammar::default();
        let query = Statement::table("users").where_op("name", QueryOperator::ILike, "a%");

        assert!(matches!(
            grammar.compile_select(&query),
            Err(GrammarError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_empty_insert_uses_empty_value_list() {
        let grammar = MySqlQueryGrammar::default();
        let compiled = grammar.compile_insert(&Statement::table("events"), &[]).unwrap();
        assert_eq!(compiled.sql, "INSERT INTO `events` () VALUES ()");
    }

    #[test]
    fn test_upsert_requires_update_columns() {
        let grammar = MySqlQueryGrammar::default();
        let rows = vec![Row::new().set("id", 1).set("name", "a")];

        let result = grammar.compile_upsert(&Statement::table("users"), &rows, &["id"], &[]);
        assert!(matches!(result, Err(GrammarError::InvalidUpsertInput(_))));
    }

    #[test]
    fn test_insert_get_id_is_plain_insert() {
        let grammar = MySqlQueryGrammar::default();
        let rows = vec![Row::new().set("email", "a@example.com")];
        let target = Statement::table("users");

        let compiled = grammar.compile_insert_get_id(&target, &rows, Some("id")).unwrap();
        assert_eq!(compiled.sql, "INSERT INTO `users` (`email`) VALUES (?)");
        assert_eq!(compiled, grammar.compile_insert(&target, &rows).unwrap());
    }
}
