//! Connection models.
//!
//! Contains the database type and the fully resolved connection target.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Database type enumeration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// PostgreSQL database.
    Postgres,
    /// MySQL database.
    MySQL,
}

impl DbType {
    /// Parses the literal used in the catalog file (`postgres` or `mysql`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "postgres" => Some(DbType::Postgres),
            "mysql" => Some(DbType::MySQL),
            _ => None,
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbType::Postgres => write!(f, "postgres"),
            DbType::MySQL => write!(f, "mysql"),
        }
    }
}

/// Everything needed to open one connection, merged from the catalog and
/// password files.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConnection {
    /// Alias the connection was resolved from.
    pub alias: String,
    /// Database type, selects the driver.
    pub db_type: DbType,
    /// Database host.
    pub hostname: String,
    /// Database port.
    pub port: u16,
    /// Database name (always taken from the catalog).
    pub database: String,
    /// Database username.
    pub username: String,
    /// Password, `None` when no password entry matched.
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl ResolvedConnection {
    /// Returns `true` when a password is known.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }
}

impl fmt::Debug for ResolvedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConnection")
            .field("alias", &self.alias)
            .field("db_type", &self.db_type)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl fmt::Display for ResolvedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}@{}:{}/{}",
            self.db_type, self.username, self.hostname, self.port, self.database
        )
    }
}
