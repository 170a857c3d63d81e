//! Shared data models.

pub mod connection;
pub mod entry;
pub mod query;

// Re-export commonly used types
pub use connection::{DbType, ResolvedConnection};
pub use entry::{CatalogEntry, PasswordEntry, WILDCARD};
pub use query::{ColumnInfo, QueryResult};
