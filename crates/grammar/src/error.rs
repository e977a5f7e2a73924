//! Error types for the grammar layer
//!
//! Compilation is deterministic, so every error here is structural: the
//! statement or blueprint asked for something the dialect cannot render.

use thiserror::Error;

/// Result type alias for grammar operations
pub type GrammarResult<T> = Result<T, GrammarError>;

/// Errors raised while compiling a statement or blueprint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// The dialect has no rendering for a column type, modifier, operator or command
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A required part of the statement is missing or inconsistent
    #[error("Malformed statement: {0}")]
    MalformedStatement(String),

    /// Upsert or batch insert rows are empty or disagree on their columns
    #[error("Invalid upsert input: {0}")]
    InvalidUpsertInput(String),

    /// An identifier that must be rendered bare failed validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl GrammarError {
    /// Create a new unsupported operation error
    pub fn unsupported<T: ToString>(msg: T) -> Self {
        Self::UnsupportedOperation(msg.to_string())
    }

    /// Create a new malformed statement error
    pub fn malformed<T: ToString>(msg: T) -> Self {
        Self::MalformedStatement(msg.to_string())
    }

    /// Create a new invalid upsert input error
    pub fn invalid_rows<T: ToString>(msg: T) -> Self {
        Self::InvalidUpsertInput(msg.to_string())
    }

    /// Create a new invalid identifier error
    pub fn invalid_identifier<T: ToString>(msg: T) -> Self {
        Self::InvalidIdentifier(msg.to_string())
    }
}
