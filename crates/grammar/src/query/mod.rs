//! Statement model - the abstract, database-agnostic form of a query

pub mod builder;
pub mod dml;
pub mod joins;
pub mod ordering;
pub mod select;
pub mod types;
pub mod where_clause;

pub use builder::Statement;
pub use dml::Row;
pub use types::*;
