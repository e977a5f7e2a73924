//! Crate-level tests for statement compilation
//!
//! Tests cover clause ordering, where kinds, parameter binding and the
//! dialect differences between MySQL and PostgreSQL.

use crate::binder::MarkerStyle;
use crate::config::{Dialect, GrammarConfig};
use crate::error::GrammarError;
use crate::expression::raw;
use crate::grammar::{MySqlQueryGrammar, PostgresQueryGrammar, QueryGrammar};
use crate::query::{JoinClause, JoinType, QueryOperator, Row, Statement};
use crate::value::BindValue;

fn postgres() -> PostgresQueryGrammar {
    PostgresQueryGrammar::default()
}

fn mysql() -> MySqlQueryGrammar {
    MySqlQueryGrammar::default()
}

fn count_markers(sql: &str) -> usize {
    sql.matches('?').count()
}

#[test]
fn test_select_all_without_wheres() {
    let compiled = postgres().compile_select(&Statement::table("users")).unwrap();

    assert_eq!(compiled.sql, "SELECT * FROM \"users\"");
    assert!(!compiled.sql.contains("WHERE"));
    assert!(compiled.params.is_empty());
}

#[test]
fn test_clause_order_is_fixed() {
    let query = Statement::table("orders")
        .select("customer_id, status")
        .left_join("customers", "orders.customer_id", "customers.id")
        .where_eq("status", "open")
        .group_by("customer_id")
        .group_by("status")
        .having("customer_id", QueryOperator::GreaterThan, 10)
        .order_by_desc("customer_id")
        .limit(20)
        .offset(40)
        .lock_for_update();

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT \"customer_id\", \"status\" FROM \"orders\" \
         LEFT JOIN \"customers\" ON \"orders\".\"customer_id\" = \"customers\".\"id\" \
         WHERE \"status\" = $1 GROUP BY \"customer_id\", \"status\" \
         HAVING \"customer_id\" > $2 ORDER BY \"customer_id\" DESC \
         LIMIT 20 OFFSET 40 FOR UPDATE"
    );
    assert_eq!(
        compiled.params,
        vec![BindValue::String("open".to_string()), BindValue::Int32(10)]
    );
}

#[test]
fn test_compilation_is_idempotent() {
    let query = Statement::table("users")
        .where_in("id", vec![1, 2, 3])
        .where_null("deleted_at")
        .order_by("name");
    let grammar = mysql();

    let first = grammar.compile_select(&query).unwrap();
    let second = grammar.compile_select(&query).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_marker_count_matches_params() {
    let query = Statement::table("events")
        .where_between("created_at", "2024-01-01", "2024-12-31")
        .where_in("kind", vec!["a", "b"])
        .where_not_null("user_id")
        .where_raw("score > 0")
        .where_like("title", "%launch%");

    let compiled = mysql().compile_select(&query).unwrap();
    assert_eq!(count_markers(&compiled.sql), compiled.params.len());
    assert_eq!(compiled.params.len(), 5);
}

#[test]
fn test_where_kinds() {
    let query = Statement::table("users")
        .where_column("updated_at", QueryOperator::GreaterThan, "created_at")
        .where_not_between("age", 18, 65)
        .where_not_in("role", vec!["guest"])
        .where_null("banned_at")
        .where_raw("LENGTH(name) > 3");

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM \"users\" WHERE \"updated_at\" > \"created_at\" \
         AND \"age\" NOT BETWEEN $1 AND $2 AND \"role\" NOT IN ($3) \
         AND \"banned_at\" IS NULL AND LENGTH(name) > 3"
    );
}

#[test]
fn test_empty_in_list_matches_nothing() {
    let empty: Vec<i32> = Vec::new();

    let compiled = postgres()
        .compile_select(&Statement::table("users").where_in("id", empty.clone()))
        .unwrap();
    assert_eq!(compiled.sql, "SELECT * FROM \"users\" WHERE 0 = 1");
    assert!(compiled.params.is_empty());

    let compiled = postgres()
        .compile_select(&Statement::table("users").where_not_in("id", empty))
        .unwrap();
    assert_eq!(compiled.sql, "SELECT * FROM \"users\" WHERE 1 = 1");
}

#[test]
fn test_nested_wheres_are_parenthesized() {
    let query = Statement::table("users")
        .where_eq("active", true)
        .or_where_nested(|q| q.where_eq("role", "admin").where_gt("level", 3));

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM \"users\" WHERE \"active\" = $1 OR (\"role\" = $2 AND \"level\" > $3)"
    );
}

#[test]
fn test_empty_nested_group_is_malformed() {
    let query = Statement::table("users").where_nested(|q| q);

    assert!(matches!(
        postgres().compile_select(&query),
        Err(GrammarError::MalformedStatement(_))
    ));
}

#[test]
fn test_subqueries_continue_placeholder_numbering() {
    let posts = Statement::table("posts")
        .select("user_id")
        .where_eq("published", true);
    let query = Statement::table("users")
        .where_eq("active", true)
        .where_in_sub("id", posts)
        .where_eq("country", "NL");

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM \"users\" WHERE \"active\" = $1 AND \"id\" IN \
         (SELECT \"user_id\" FROM \"posts\" WHERE \"published\" = $2) AND \"country\" = $3"
    );
    assert_eq!(compiled.params.len(), 3);
}

#[test]
fn test_exists_and_subquery_comparison() {
    let orders = Statement::table("orders").where_column("orders.user_id", QueryOperator::Equal, "users.id");
    let average = Statement::table("users").aggregate("avg", &["age"]);

    let query = Statement::table("users")
        .where_exists(orders)
        .where_sub("age", QueryOperator::GreaterThan, average);

    let compiled = mysql().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM `users` WHERE EXISTS (SELECT * FROM `orders` WHERE `orders`.`user_id` = `users`.`id`) \
         AND `age` > (SELECT AVG(`age`) AS aggregate FROM `users`)"
    );
}

#[test]
fn test_aggregate_and_distinct() {
    let compiled = postgres()
        .compile_select(&Statement::table("users").count("*"))
        .unwrap();
    assert_eq!(compiled.sql, "SELECT COUNT(*) AS aggregate FROM \"users\"");

    let mut query = Statement::table("users").aggregate("count", &["email"]);
    query.distinct = true;
    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(compiled.sql, "SELECT COUNT(DISTINCT \"email\") AS aggregate FROM \"users\"");

    let compiled = postgres()
        .compile_select(&Statement::table("users").select_distinct("country"))
        .unwrap();
    assert_eq!(compiled.sql, "SELECT DISTINCT \"country\" FROM \"users\"");
}

#[test]
fn test_aggregate_function_name_is_validated() {
    let query = Statement::table("users").aggregate("count(*); DROP TABLE users; --", &[]);

    assert!(matches!(
        postgres().compile_select(&query),
        Err(GrammarError::InvalidIdentifier(_))
    ));
}

#[test]
fn test_join_kinds() {
    let join = JoinClause::new(JoinType::Inner, "profiles as p")
        .on("users.id", QueryOperator::Equal, "p.user_id")
        .on_value("p.visible", QueryOperator::Equal, true)
        .or_on("p.owner_id", QueryOperator::Equal, "users.id");
    let query = Statement::table("users")
        .join_clause(join)
        .right_join("teams", "users.team_id", "teams.id")
        .cross_join("regions");

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM \"users\" INNER JOIN \"profiles\" AS \"p\" \
         ON \"users\".\"id\" = \"p\".\"user_id\" AND \"p\".\"visible\" = $1 OR \"p\".\"owner_id\" = \"users\".\"id\" \
         RIGHT JOIN \"teams\" ON \"users\".\"team_id\" = \"teams\".\"id\" CROSS JOIN \"regions\""
    );
    assert_eq!(compiled.params, vec![BindValue::Bool(true)]);
}

#[test]
fn test_join_without_constraints_is_malformed() {
    let query = Statement::table("users").join_clause(JoinClause::new(JoinType::Left, "teams"));

    assert!(matches!(
        mysql().compile_select(&query),
        Err(GrammarError::MalformedStatement(_))
    ));
}

#[test]
fn test_raw_orders_and_columns() {
    let query = Statement::table("posts")
        .select("id")
        .select_raw("COUNT(comments.id) AS comment_count")
        .order_by_raw("RANDOM()")
        .paginate(10, 3);

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT \"id\", COUNT(comments.id) AS comment_count FROM \"posts\" ORDER BY RANDOM() LIMIT 10 OFFSET 20"
    );
}

#[test]
fn test_base_unions_precede_lock() {
    let query = Statement::table("a")
        .union(Statement::table("b"))
        .shared_lock();

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM \"a\" UNION SELECT * FROM \"b\" FOR SHARE"
    );
}

#[test]
fn test_select_without_table_is_malformed() {
    assert!(matches!(
        postgres().compile_select(&Statement::new()),
        Err(GrammarError::MalformedStatement(_))
    ));

    let compiled = postgres()
        .compile_select(&Statement::new().select_raw("1"))
        .unwrap();
    assert_eq!(compiled.sql, "SELECT 1");
}

#[test]
fn test_dml_requires_table() {
    let rows = vec![Row::new().set("id", 1)];

    assert!(matches!(
        mysql().compile_insert(&Statement::new(), &rows),
        Err(GrammarError::MalformedStatement(_))
    ));
    assert!(matches!(
        postgres().compile_delete(&Statement::new()),
        Err(GrammarError::MalformedStatement(_))
    ));
    assert!(matches!(
        postgres().compile_truncate(&Statement::new()),
        Err(GrammarError::MalformedStatement(_))
    ));
}

#[test]
fn test_multi_row_insert_binds_in_row_order() {
    let rows = vec![
        Row::new().set("id", 1).set("name", "a"),
        Row::new().set("name", "b").set("id", 2),
    ];

    let compiled = postgres()
        .compile_insert(&Statement::table("users"), &rows)
        .unwrap();
    assert_eq!(
        compiled.sql,
        "INSERT INTO \"users\" (\"id\", \"name\") VALUES ($1, $2), ($3, $4)"
    );
    assert_eq!(
        compiled.params,
        vec![
            BindValue::Int32(1),
            BindValue::String("a".to_string()),
            BindValue::Int32(2),
            BindValue::String("b".to_string()),
        ]
    );
}

#[test]
fn test_insert_inlines_raw_values() {
    let rows = vec![Row::new().set("name", "a").set_raw("created_at", "NOW()")];

    let compiled = mysql().compile_insert(&Statement::table("users"), &rows).unwrap();
    assert_eq!(compiled.sql, "INSERT INTO `users` (`name`, `created_at`) VALUES (?, NOW())");
    assert_eq!(compiled.params.len(), 1);
}

#[test]
fn test_upsert_group_and_param_counts() {
    let rows: Vec<Row> = (0..4)
        .map(|i| Row::new().set("id", i).set("name", format!("user{}", i)).set("score", i * 10))
        .collect();

    let grammars =
        [Dialect::MySql, Dialect::Postgres].map(|d| d.query_grammar(GrammarConfig::default()));
    for grammar in grammars {
        let compiled = grammar
            .compile_upsert(&Statement::table("scores"), &rows, &["id"], &["score"])
            .unwrap();

        assert_eq!(compiled.sql.matches("), (").count(), 3);
        assert_eq!(compiled.params.len(), 4 * 3);
    }
}

#[test]
fn test_heterogeneous_rows_are_rejected() {
    let rows = vec![
        Row::new().set("id", 1).set("name", "a"),
        Row::new().set("id", 2).set("email", "b@example.com"),
    ];

    assert!(matches!(
        postgres().compile_upsert(&Statement::table("users"), &rows, &["id"], &["name"]),
        Err(GrammarError::InvalidUpsertInput(_))
    ));
    assert!(matches!(
        mysql().compile_insert(&Statement::table("users"), &rows),
        Err(GrammarError::InvalidUpsertInput(_))
    ));
    assert!(matches!(
        mysql().compile_upsert(&Statement::table("users"), &[], &["id"], &["name"]),
        Err(GrammarError::InvalidUpsertInput(_))
    ));
}

#[test]
fn test_base_update_with_join() {
    let query = Statement::table("users")
        .join("teams", "users.team_id", "teams.id")
        .where_eq("teams.name", "core");

    let compiled = mysql()
        .compile_update(&query, &Row::new().set("users.active", false))
        .unwrap();
    assert_eq!(
        compiled.sql,
        "UPDATE `users` INNER JOIN `teams` ON `users`.`team_id` = `teams`.`id` \
         SET `users`.`active` = ? WHERE `teams`.`name` = ?"
    );
    assert_eq!(
        compiled.params,
        vec![BindValue::Bool(false), BindValue::String("core".to_string())]
    );
}

#[test]
fn test_update_requires_values() {
    assert!(matches!(
        postgres().compile_update(&Statement::table("users"), &Row::new()),
        Err(GrammarError::MalformedStatement(_))
    ));
}

#[test]
fn test_identifier_quotes_are_doubled() {
    let query = Statement::table("we\"ird").where_eq("col\"umn", 1);
    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(compiled.sql, "SELECT * FROM \"we\"\"ird\" WHERE \"col\"\"umn\" = $1");

    let query = Statement::table("we`ird").where_eq("col`umn", 1);
    let compiled = mysql().compile_select(&query).unwrap();
    assert_eq!(compiled.sql, "SELECT * FROM `we``ird` WHERE `col``umn` = ?");
}

#[test]
fn test_marker_style_override() {
    let grammar = MySqlQueryGrammar::new(GrammarConfig::new().with_marker(MarkerStyle::Format));
    let rows = vec![Row::new().set("a", 1).set("b", 2)];

    let compiled = grammar.compile_insert(&Statement::table("t"), &rows).unwrap();
    assert_eq!(compiled.sql, "INSERT INTO `t` (`a`, `b`) VALUES (%s, %s)");
}

#[test]
fn test_table_prefix_applies_everywhere() {
    let grammar = PostgresQueryGrammar::new(GrammarConfig::new().with_table_prefix("app_"));
    let query = Statement::table("users")
        .join("teams", "users.team_id", "teams.id")
        .select("users.*");

    let compiled = grammar.compile_select(&query).unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT \"app_users\".* FROM \"app_users\" INNER JOIN \"app_teams\" \
         ON \"app_users\".\"team_id\" = \"app_teams\".\"id\""
    );
}

#[test]
fn test_raw_where_value_is_not_bound() {
    let query = Statement::table("sessions").where_op("expires_at", QueryOperator::LessThan, raw("NOW()"));

    let compiled = postgres().compile_select(&query).unwrap();
    assert_eq!(compiled.sql, "SELECT * FROM \"sessions\" WHERE \"expires_at\" < NOW()");
    assert!(compiled.params.is_empty());
}

#[test]
fn test_grammars_are_shareable_across_threads() {
    let grammar: std::sync::Arc<dyn QueryGrammar> =
        std::sync::Arc::from(Dialect::Postgres.query_grammar(GrammarConfig::default()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let grammar = grammar.clone();
            std::thread::spawn(move || {
                let query = Statement::table("users").where_eq("id", i);
                grammar.compile_select(&query).map(|compiled| compiled.params)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let params = handle.join().unwrap().unwrap();
        assert_eq!(params, vec![BindValue::Int32(i as i32)]);
    }
}
