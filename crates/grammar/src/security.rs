//! Identifier and literal escaping
//!
//! Grammars quote every identifier they render. The few names that a dialect
//! renders bare (index names, upsert assignment targets) must pass
//! [`validate_identifier`] first.

use crate::error::{GrammarError, GrammarResult};

/// Characters allowed in bare SQL identifiers (alphanumeric, underscore, dollar)
const ALLOWED_IDENTIFIER_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_$";

/// Statement keywords that may not appear as bare identifiers
static SQL_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "UNION", "DROP", "CREATE",
    "ALTER", "GRANT", "REVOKE", "TRUNCATE", "EXEC", "EXECUTE", "DECLARE",
];

/// Maximum identifier length accepted by both MySQL (64) and PostgreSQL (63)
const MAX_IDENTIFIER_LEN: usize = 63;

/// Escape an identifier by doubling the quote character and wrapping it
///
/// # Examples
/// ```
/// use elif_grammar::security::escape_identifier;
///
/// assert_eq!(escape_identifier("user_table", '"'), "\"user_table\"");
/// assert_eq!(escape_identifier("table\"name", '"'), "\"table\"\"name\"");
/// assert_eq!(escape_identifier("we`ird", '`'), "`we``ird`");
/// ```
pub fn escape_identifier(identifier: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(identifier.len() + 2);
    escaped.push(quote);
    for c in identifier.chars() {
        if c == quote {
            escaped.push(quote);
        }
        escaped.push(c);
    }
    escaped.push(quote);
    escaped
}

/// Quote a string literal for DDL, where bound parameters are not available
///
/// Doubling the quote is enough for engines where backslash is an ordinary
/// character in string literals (Postgres with `standard_conforming_strings`).
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a string literal for MySQL DDL
///
/// MySQL treats backslash as an escape character unless
/// `NO_BACKSLASH_ESCAPES` is set, so backslashes are doubled as well.
///
/// # Examples
/// ```
/// use elif_grammar::security::quote_mysql_literal;
///
/// assert_eq!(quote_mysql_literal("it's"), "'it''s'");
/// assert_eq!(quote_mysql_literal("C:\\temp\\"), "'C:\\\\temp\\\\'");
/// ```
pub fn quote_mysql_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        match c {
            '\'' => quoted.push_str("''"),
            '\\' => quoted.push_str("\\\\"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

/// Validate that an identifier is safe to render without quoting
pub fn validate_identifier(identifier: &str) -> GrammarResult<()> {
    let first = identifier
        .chars()
        .next()
        .ok_or_else(|| GrammarError::invalid_identifier("identifier cannot be empty"))?;

    if identifier.len() > MAX_IDENTIFIER_LEN {
        return Err(GrammarError::invalid_identifier(format!(
            "'{}' is too long (max {} characters)",
            identifier, MAX_IDENTIFIER_LEN
        )));
    }

    if let Some(c) = identifier.chars().find(|c| !ALLOWED_IDENTIFIER_CHARS.contains(*c)) {
        return Err(GrammarError::invalid_identifier(format!(
            "'{}' contains invalid character '{}'",
            identifier, c
        )));
    }

    if first.is_ascii_digit() {
        return Err(GrammarError::invalid_identifier(format!(
            "'{}' cannot start with a number",
            identifier
        )));
    }

    let upper = identifier.to_uppercase();
    if SQL_KEYWORDS.contains(&upper.as_str()) {
        return Err(GrammarError::invalid_identifier(format!(
            "'{}' is a reserved SQL keyword",
            identifier
        )));
    }

    Ok(())
}
