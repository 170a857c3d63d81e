//! Records parsed from the password and catalog files.

use serde::{Deserialize, Serialize};

use super::connection::DbType;

/// Database field value in the password file that matches any database.
pub const WILDCARD: &str = "*";

/// One line of the password file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEntry {
    /// Database host.
    pub hostname: String,
    /// Database port.
    pub port: u16,
    /// Database name, [`WILDCARD`], or `None` when the field is empty.
    pub database: Option<String>,
    /// Database username.
    pub username: String,
    /// Password, `None` when the field is empty.
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl PasswordEntry {
    /// Returns `true` if this entry applies to `database`.
    pub fn matches_database(&self, database: &str) -> bool {
        match self.database.as_deref() {
            None | Some(WILDCARD) => true,
            Some(db) => db == database,
        }
    }

    /// Returns `true` if this entry is keyed on the same host, user and port.
    pub fn matches_target(&self, hostname: &str, username: &str, port: u16) -> bool {
        self.hostname == hostname && self.username == username && self.port == port
    }
}

impl std::fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// One line of the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Lookup key.
    pub alias: String,
    /// Database type.
    pub db_type: DbType,
    /// Database host.
    pub hostname: String,
    /// Database port.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Database username.
    pub username: String,
}
