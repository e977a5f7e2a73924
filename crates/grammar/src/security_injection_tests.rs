//! SQL Injection Prevention Test Suite
//!
//! Values are always bound, identifiers are always quoted, and the few
//! names rendered bare must pass identifier validation.

#[cfg(test)]
mod tests {
    use super::super::security::*;
    use crate::error::GrammarError;
    use crate::grammar::{MySqlQueryGrammar, PostgresQueryGrammar, QueryGrammar};
    use crate::query::{Row, Statement};
    use crate::schema::{Blueprint, MySqlSchemaGrammar, PostgresSchemaGrammar};
    use crate::value::BindValue;
    use sqlparser::dialect::MySqlDialect;
    use sqlparser::parser::Parser;

    #[test]
    fn test_identifier_escaping_prevents_injection() {
        let malicious_table = "users\"; DROP TABLE secrets; --";
        let escaped = escape_identifier(malicious_table, '"');
        assert_eq!(escaped, "\"users\"\"; DROP TABLE secrets; --\"");

        let malicious_table = "users`; DROP TABLE secrets; --";
        let escaped = escape_identifier(malicious_table, '`');
        assert_eq!(escaped, "`users``; DROP TABLE secrets; --`");
    }

    #[test]
    fn test_identifier_validation_blocks_dangerous_names() {
        // Valid identifiers should pass
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("user_profile").is_ok());
        assert!(validate_identifier("table1").is_ok());

        // Invalid characters should be rejected
        assert!(validate_identifier("user-profile").is_err());
        assert!(validate_identifier("user;table").is_err());
        assert!(validate_identifier("user'table").is_err());
        assert!(validate_identifier("user\"table").is_err());
        assert!(validate_identifier("user\ntable").is_err());

        // SQL keywords should be rejected
        assert!(validate_identifier("DROP").is_err());
        assert!(validate_identifier("UNION").is_err());
        assert!(validate_identifier("EXEC").is_err());
    }

    #[test]
    fn test_values_are_bound_not_interpolated() {
        let payload = "'; DROP TABLE users; --";
        let query = Statement::table("users").where_eq("name", payload);

        let compiled = PostgresQueryGrammar::default().compile_select(&query).unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM \"users\" WHERE \"name\" = $1");
        assert!(!compiled.sql.contains("DROP"));
        assert_eq!(compiled.params, vec![BindValue::String(payload.to_string())]);
    }

    #[test]
    fn test_malicious_column_names_are_quoted() {
        let query = Statement::table("users").where_eq("name` = 1 OR 1=1; --", 1);

        let compiled = MySqlQueryGrammar::default().compile_select(&query).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM `users` WHERE `name`` = 1 OR 1=1; --` = ?"
        );
    }

    #[test]
    fn test_insert_values_are_bound() {
        let rows = vec![Row::new().set("bio", "x'); DELETE FROM users; --")];

        let compiled = MySqlQueryGrammar::default()
            .compile_insert(&Statement::table("profiles"), &rows)
            .unwrap();
        assert_eq!(compiled.sql, "INSERT INTO `profiles` (`bio`) VALUES (?)");
        assert_eq!(compiled.params.len(), 1);
    }

    #[test]
    fn test_upsert_update_columns_are_validated() {
        let rows = vec![Row::new().set("id", 1).set("name", "a")];
        let result = PostgresQueryGrammar::default().compile_upsert(
            &Statement::table("users"),
            &rows,
            &["id"],
            &["name = 'x', admin"],
        );

        assert!(matches!(result, Err(GrammarError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_ddl_defaults_are_quoted_literals() {
        let mut blueprint = Blueprint::new("users");
        blueprint.string("motto", 100).default("it's'; DROP TABLE users; --");

        let sql = blueprint.to_sql(&PostgresSchemaGrammar::default()).unwrap();
        assert_eq!(
            sql,
            vec!["ALTER TABLE \"users\" ADD COLUMN \"motto\" VARCHAR(100) NOT NULL DEFAULT 'it''s''; DROP TABLE users; --'"]
        );
    }

    #[test]
    fn test_ddl_comments_are_quoted_literals() {
        let mut blueprint = Blueprint::new("users");
        blueprint.text("notes").comment("x' , DROP users");

        let sql = blueprint.to_sql(&MySqlSchemaGrammar::default()).unwrap();
        assert!(sql[0].ends_with("COMMENT 'x'' , DROP users'"));
    }

    #[test]
    fn test_table_options_are_validated() {
        let mut blueprint = Blueprint::new("users");
        blueprint.create();
        blueprint.integer("id");
        blueprint.engine = Some("InnoDB; DROP TABLE users".to_string());

        let result = blueprint.to_sql(&MySqlSchemaGrammar::default());
        assert!(matches!(result, Err(GrammarError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_mysql_ddl_literals_escape_backslashes() {
        let mut blueprint = Blueprint::new("users");
        blueprint.create();
        blueprint.string("motto", 100).default("\\'; DROP TABLE secrets; -- ");
        blueprint.text("notes").comment("x\\");
        blueprint.enumeration("drive", &["C:\\", "D:\\"]);

        let sql = blueprint.to_sql(&MySqlSchemaGrammar::default()).unwrap();
        assert_eq!(sql.len(), 1);
        assert!(sql[0].contains("DEFAULT '\\\\''; DROP TABLE secrets; -- '"));
        assert!(sql[0].contains("COMMENT 'x\\\\'"));

        let statements = Parser::parse_sql(&MySqlDialect {}, &sql[0]).unwrap();
        assert_eq!(statements.len(), 1);
    }
}
