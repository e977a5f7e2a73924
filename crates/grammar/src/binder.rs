//! Parameter binding
//!
//! A [`Binder`] lives for exactly one compile call. Grammars are stateless, so
//! the binder is the only place where placeholder numbering and the ordered
//! parameter list accumulate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression::Operand;
use crate::value::BindValue;

/// Placeholder syntax used for bound parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    /// DB-API format style: `%s`
    Format,
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Numbered,
}

impl MarkerStyle {
    /// Get the placeholder for the parameter at the given zero-based index
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            MarkerStyle::Format => "%s".to_string(),
            MarkerStyle::Question => "?".to_string(),
            MarkerStyle::Numbered => format!("${}", index + 1),
        }
    }
}

impl fmt::Display for MarkerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerStyle::Format => write!(f, "format"),
            MarkerStyle::Question => write!(f, "question"),
            MarkerStyle::Numbered => write!(f, "numbered"),
        }
    }
}

/// Collects bound values in the order their placeholders are rendered
#[derive(Debug)]
pub struct Binder {
    style: MarkerStyle,
    params: Vec<BindValue>,
}

impl Binder {
    pub fn new(style: MarkerStyle) -> Self {
        Self {
            style,
            params: Vec::new(),
        }
    }

    /// Record a value and return its placeholder
    pub fn bind(&mut self, value: BindValue) -> String {
        let marker = self.style.placeholder(self.params.len());
        self.params.push(value);
        marker
    }

    /// Render an operand: raw expressions are inlined, everything else is bound
    pub fn parameter(&mut self, operand: &Operand) -> String {
        match operand {
            Operand::Raw(expression) => expression.value().to_string(),
            Operand::Bind(value) => self.bind(value.clone()),
        }
    }

    /// Render a comma separated list of placeholders, binding left to right
    pub fn parameterize<'a, I>(&mut self, operands: I) -> String
    where
        I: IntoIterator<Item = &'a Operand>,
    {
        operands
            .into_iter()
            .map(|operand| self.parameter(operand))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of values bound so far
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }

    /// Finish the compile call, pairing the SQL text with its parameters
    pub fn finish(self, sql: String) -> CompiledSql {
        CompiledSql {
            sql,
            params: self.params,
        }
    }
}

/// Compiled SQL text and its ordered bind parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl CompiledSql {
    /// SQL without parameters, as DDL statements produce
    pub fn unbound<S: Into<String>>(sql: S) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        (self.sql, self.params)
    }
}

impl From<CompiledSql> for (String, Vec<BindValue>) {
    fn from(compiled: CompiledSql) -> Self {
        compiled.into_parts()
    }
}

impl fmt::Display for CompiledSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
