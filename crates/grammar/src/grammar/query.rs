//! Base query grammar
//!
//! The provided methods of [`QueryGrammar`] are the engine-agnostic grammar.
//! The `base_*` functions hold the default implementations of methods that
//! dialects override, so an override can still build on the base rendering.

use crate::binder::{Binder, CompiledSql};
use crate::error::{GrammarError, GrammarResult};
use crate::query::dml::align_rows;
use crate::query::{
    Aggregate, JoinClause, JoinConstraint, JoinType, JoinValue, Lock, Order, QueryOperator, Row,
    Statement, Union, WhereClause, WhereKind,
};
use crate::security::validate_identifier;

use super::{remove_leading_boolean, Grammar};

/// Select clause components, rendered in list order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectComponent {
    Aggregate,
    Columns,
    From,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
    Unions,
    Lock,
}

/// Component order of the base grammar
pub const BASE_SELECT_COMPONENTS: &[SelectComponent] = &[
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
    SelectComponent::Unions,
    SelectComponent::Lock,
];

/// Dialect-specific rendering of statements into SQL
pub trait QueryGrammar: Grammar {
    /// Ordered select components this dialect renders
    fn select_components(&self) -> &'static [SelectComponent] {
        BASE_SELECT_COMPONENTS
    }

    /// Comparison operators this dialect accepts
    fn operators(&self) -> &'static [QueryOperator];

    /// Render a lock request
    fn compile_lock(&self, query: &Statement, lock: &Lock) -> String;

    /// Compile an upsert (insert, or update on conflict)
    fn compile_upsert(
        &self,
        query: &Statement,
        values: &[Row],
        conflict_keys: &[&str],
        conflict_columns: &[&str],
    ) -> GrammarResult<CompiledSql>;

    // ----- public entry points -----

    /// Compile a select statement
    fn compile_select(&self, query: &Statement) -> GrammarResult<CompiledSql> {
        let mut binder = self.binder();
        let sql = self.compile_select_with(query, &mut binder)?;
        Ok(self.finish("select", sql, binder))
    }

    /// Compile an insert of one or more rows
    fn compile_insert(&self, query: &Statement, values: &[Row]) -> GrammarResult<CompiledSql> {
        let mut binder = self.binder();
        let sql = self.compile_insert_with(query, values, &mut binder)?;
        Ok(self.finish("insert", sql, binder))
    }

    /// Compile an insert that reports the new primary key
    fn compile_insert_get_id(
        &self,
        query: &Statement,
        values: &[Row],
        _sequence: Option<&str>,
    ) -> GrammarResult<CompiledSql> {
        self.compile_insert(query, values)
    }

    /// Compile an update
    fn compile_update(&self, query: &Statement, values: &Row) -> GrammarResult<CompiledSql> {
        let mut binder = self.binder();
        let sql = self.compile_update_with(query, values, &mut binder)?;
        Ok(self.finish("update", sql, binder))
    }

    /// Compile a delete
    fn compile_delete(&self, query: &Statement) -> GrammarResult<CompiledSql> {
        let mut binder = self.binder();
        let sql = self.compile_delete_with(query, &mut binder)?;
        Ok(self.finish("delete", sql, binder))
    }

    /// Compile a truncate
    fn compile_truncate(&self, query: &Statement) -> GrammarResult<CompiledSql> {
        let table = self.wrap_table(require_table(query, "truncate")?);
        Ok(self.finish("truncate", format!("TRUNCATE {}", table), self.binder()))
    }

    // ----- statement bodies, overridable per dialect -----

    /// Compile a select into an existing binder; subqueries use this
    fn compile_select_with(&self, query: &Statement, binder: &mut Binder) -> GrammarResult<String> {
        self.compile_components(query, binder)
    }

    fn compile_insert_with(
        &self,
        query: &Statement,
        values: &[Row],
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let table = self.wrap_table(require_table(query, "insert")?);

        if values.iter().all(Row::is_empty) {
            if values.len() > 1 {
                return Err(GrammarError::malformed("cannot insert several rows without columns"));
            }
            return Ok(self.compile_insert_default_values(&table));
        }

        let (columns, parameters) = self.compile_insert_values(values, binder)?;
        Ok(format!("INSERT INTO {} ({}) VALUES {}", table, columns, parameters))
    }

    fn compile_insert_default_values(&self, table: &str) -> String {
        format!("INSERT INTO {} DEFAULT VALUES", table)
    }

    fn compile_update_with(
        &self,
        query: &Statement,
        values: &Row,
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        base_update(self, query, values, binder)
    }

    fn compile_delete_with(&self, query: &Statement, binder: &mut Binder) -> GrammarResult<String> {
        if !query.joins.is_empty() {
            return Err(GrammarError::unsupported(format!(
                "delete with joins for {}",
                self.dialect()
            )));
        }
        let table = self.wrap_table(require_table(query, "delete")?);
        let wheres = self.compile_wheres(query, binder)?;
        Ok(format!("DELETE FROM {} {}", table, wheres).trim().to_string())
    }

    // ----- clause renderers -----

    /// Render each present component in order and join them with spaces
    fn compile_components(&self, query: &Statement, binder: &mut Binder) -> GrammarResult<String> {
        if query.from.is_none() && query.columns.is_empty() && query.aggregate.is_none() {
            return Err(GrammarError::malformed("select needs a table or an explicit column list"));
        }

        let mut fragments = Vec::new();
        for component in self.select_components() {
            let fragment = self.compile_component(*component, query, binder)?;
            if !fragment.is_empty() {
                fragments.push(fragment);
            }
        }
        Ok(fragments.join(" ").trim().to_string())
    }

    fn compile_component(
        &self,
        component: SelectComponent,
        query: &Statement,
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let fragment = match component {
            SelectComponent::Aggregate => match &query.aggregate {
                Some(aggregate) => self.compile_aggregate(query, aggregate)?,
                None => String::new(),
            },
            SelectComponent::Columns if query.aggregate.is_none() => self.compile_columns(query),
            SelectComponent::Columns => String::new(),
            SelectComponent::From => match &query.from {
                Some(table) => format!("FROM {}", self.wrap_table(table)),
                None => String::new(),
            },
            SelectComponent::Joins if !query.joins.is_empty() => {
                self.compile_joins(&query.joins, binder)?
            }
            SelectComponent::Wheres => self.compile_wheres(query, binder)?,
            SelectComponent::Groups if !query.groups.is_empty() => {
                format!("GROUP BY {}", self.columnize(&query.groups))
            }
            SelectComponent::Havings if !query.havings.is_empty() => {
                format!("HAVING {}", self.compile_predicates(&query.havings, binder)?)
            }
            SelectComponent::Orders if !query.orders.is_empty() => {
                self.compile_orders(&query.orders)
            }
            SelectComponent::Limit => match query.limit {
                Some(limit) => format!("LIMIT {}", limit),
                None => String::new(),
            },
            SelectComponent::Offset => match query.offset {
                Some(offset) => format!("OFFSET {}", offset),
                None => String::new(),
            },
            SelectComponent::Unions if !query.unions.is_empty() => {
                self.compile_unions(&query.unions, binder)?
            }
            SelectComponent::Lock => match &query.lock {
                Some(lock) => self.compile_lock(query, lock),
                None => String::new(),
            },
            _ => String::new(),
        };
        Ok(fragment)
    }

    fn compile_aggregate(&self, query: &Statement, aggregate: &Aggregate) -> GrammarResult<String> {
        validate_identifier(&aggregate.function)?;

        let mut column = if aggregate.columns.is_empty() {
            "*".to_string()
        } else {
            self.columnize(&aggregate.columns)
        };
        if query.distinct && column != "*" {
            column = format!("DISTINCT {}", column);
        }

        Ok(format!(
            "SELECT {}({}) AS aggregate",
            aggregate.function.to_uppercase(),
            column
        ))
    }

    fn compile_columns(&self, query: &Statement) -> String {
        let select = if query.distinct { "SELECT DISTINCT" } else { "SELECT" };
        if query.columns.is_empty() {
            format!("{} *", select)
        } else {
            format!("{} {}", select, self.columnize(&query.columns))
        }
    }

    fn compile_joins(&self, joins: &[JoinClause], binder: &mut Binder) -> GrammarResult<String> {
        let mut sql = Vec::with_capacity(joins.len());

        for join in joins {
            let table = self.wrap_table(&join.table);

            if join.join_type == JoinType::Cross {
                if !join.clauses.is_empty() {
                    return Err(GrammarError::malformed(format!(
                        "cross join on '{}' cannot have constraints",
                        join.table
                    )));
                }
                sql.push(format!("{} {}", join.join_type, table));
                continue;
            }

            if join.clauses.is_empty() {
                return Err(GrammarError::malformed(format!(
                    "join on '{}' has no constraints",
                    join.table
                )));
            }

            let constraints = join
                .clauses
                .iter()
                .map(|clause| self.compile_join_constraint(clause, binder))
                .collect::<GrammarResult<Vec<_>>>()?
                .join(" ");

            sql.push(format!(
                "{} {} ON {}",
                join.join_type,
                table,
                remove_leading_boolean(&constraints)
            ));
        }

        Ok(sql.join(" "))
    }

    /// Render one join constraint with its leading connector
    fn compile_join_constraint(
        &self,
        clause: &JoinConstraint,
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let operator = self.operator(clause.operator)?;
        let second = match &clause.second {
            JoinValue::Column(column) => self.wrap_identifier(column),
            JoinValue::Bind(value) => binder.bind(value.clone()),
        };

        Ok(format!(
            "{} {} {} {}",
            clause.boolean,
            self.wrap_identifier(&clause.first),
            operator,
            second
        ))
    }

    /// `WHERE ...`, or empty when there are no predicates
    fn compile_wheres(&self, query: &Statement, binder: &mut Binder) -> GrammarResult<String> {
        if query.wheres.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("WHERE {}", self.compile_predicates(&query.wheres, binder)?))
    }

    /// Join predicates with their connectors, omitting the first connector
    fn compile_predicates(
        &self,
        clauses: &[WhereClause],
        binder: &mut Binder,
    ) -> GrammarResult<String> {
        let mut sql = Vec::with_capacity(clauses.len());
        for (index, clause) in clauses.iter().enumerate() {
            let predicate = self.compile_where(&clause.kind, binder)?;
            if index == 0 {
                sql.push(predicate);
            } else {
                sql.push(format!("{} {}", clause.boolean, predicate));
            }
        }
        Ok(sql.join(" "))
    }

    fn compile_where(&self, kind: &WhereKind, binder: &mut Binder) -> GrammarResult<String> {
        let sql = match kind {
            WhereKind::Basic {
                column,
                operator,
                value,
            } => {
                let operator = self.operator(*operator)?;
                format!("{} {} {}", self.wrap_identifier(column), operator, binder.parameter(value))
            }
            WhereKind::Column {
                first,
                operator,
                second,
            } => format!(
                "{} {} {}",
                self.wrap_identifier(first),
                self.operator(*operator)?,
                self.wrap_identifier(second)
            ),
            WhereKind::Between {
                column,
                low,
                high,
                negated,
            } => {
                let between = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                let column = self.wrap_identifier(column);
                let low = binder.parameter(low);
                let high = binder.parameter(high);
                format!("{} {} {} AND {}", column, between, low, high)
            }
            WhereKind::In {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    // IN () is invalid SQL; an empty set matches nothing
                    return Ok(if *negated { "1 = 1" } else { "0 = 1" }.to_string());
                }
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!(
                    "{} {} ({})",
                    self.wrap_identifier(column),
                    keyword,
                    binder.parameterize(values)
                )
            }
            WhereKind::InSub {
                column,
                query,
                negated,
            } => {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                let column = self.wrap_identifier(column);
                format!("{} {} ({})", column, keyword, self.compile_select_with(query, binder)?)
            }
            WhereKind::Null { column, negated } => {
                let null = if *negated { "IS NOT NULL" } else { "IS NULL" };
                format!("{} {}", self.wrap_identifier(column), null)
            }
            WhereKind::Raw(expression) => expression.value().to_string(),
            WhereKind::Nested(nested) => {
                if nested.wheres.is_empty() {
                    return Err(GrammarError::malformed("nested where group is empty"));
                }
                format!("({})", self.compile_predicates(&nested.wheres, binder)?)
            }
            WhereKind::Exists { query, negated } => {
                let exists = if *negated { "NOT EXISTS" } else { "EXISTS" };
                format!("{} ({})", exists, self.compile_select_with(query, binder)?)
            }
            WhereKind::Sub {
                column,
                operator,
                query,
            } => {
                let column = self.wrap_identifier(column);
                let operator = self.operator(*operator)?;
                format!("{} {} ({})", column, operator, self.compile_select_with(query, binder)?)
            }
        };
        Ok(sql)
    }

    fn compile_orders(&self, orders: &[Order]) -> String {
        let orders = orders
            .iter()
            .map(|order| match order {
                Order::Column { column, direction } => {
                    format!("{} {}", self.wrap_identifier(column), direction)
                }
                Order::Raw(expression) => expression.value().to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("ORDER BY {}", orders)
    }

    fn compile_unions(&self, unions: &[Union], binder: &mut Binder) -> GrammarResult<String> {
        let mut sql = Vec::with_capacity(unions.len());
        for union in unions {
            let keyword = if union.all { "UNION ALL" } else { "UNION" };
            sql.push(format!("{} {}", keyword, self.compile_select_with(&union.query, binder)?));
        }
        Ok(sql.join(" "))
    }

    /// Column list and one placeholder group per row, bound row by row
    fn compile_insert_values(
        &self,
        values: &[Row],
        binder: &mut Binder,
    ) -> GrammarResult<(String, String)> {
        let (columns, rows) = align_rows(values)?;
        if columns.is_empty() {
            return Err(GrammarError::invalid_rows("rows have no columns"));
        }

        let columns = columns
            .iter()
            .map(|column| self.wrap(column))
            .collect::<Vec<_>>()
            .join(", ");

        let groups = rows
            .into_iter()
            .map(|row| format!("({})", binder.parameterize(row)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok((columns, groups))
    }

    fn compile_update_columns(&self, values: &Row, binder: &mut Binder) -> String {
        values
            .iter()
            .map(|(column, value)| format!("{} = {}", self.wrap(column), binder.parameter(value)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve an operator, rejecting those the dialect lacks
    fn operator(&self, operator: QueryOperator) -> GrammarResult<&'static str> {
        if self.operators().contains(&operator) {
            Ok(operator.as_sql())
        } else {
            Err(GrammarError::unsupported(format!(
                "operator '{}' for {}",
                operator,
                self.dialect()
            )))
        }
    }
}

/// The statement's table, or a malformed-statement error naming the operation
pub fn require_table<'a>(query: &'a Statement, operation: &str) -> GrammarResult<&'a str> {
    query
        .from
        .as_deref()
        .ok_or_else(|| GrammarError::malformed(format!("{} requires a table", operation)))
}

/// `UPDATE t [joins] SET ... [WHERE ...]`
pub fn base_update<G: QueryGrammar + ?Sized>(
    grammar: &G,
    query: &Statement,
    values: &Row,
    binder: &mut Binder,
) -> GrammarResult<String> {
    let table = grammar.wrap_table(require_table(query, "update")?);
    if values.is_empty() {
        return Err(GrammarError::malformed("update requires at least one column"));
    }

    let joins = if query.joins.is_empty() {
        String::new()
    } else {
        format!(" {}", grammar.compile_joins(&query.joins, binder)?)
    };
    let columns = grammar.compile_update_columns(values, binder);
    let wheres = grammar.compile_wheres(query, binder)?;

    Ok(format!("UPDATE {}{} SET {} {}", table, joins, columns, wheres)
        .trim()
        .to_string())
}
