//! Connection handle.
//!
//! A [`ConnectionHandle`] owns one driver runtime and one open connection.
//! Its lifecycle is open, any number of queries, then an explicit
//! [`ConnectionHandle::close`]. After closing, every operation fails with
//! `AppError::InvalidHandle`.

use std::fs;
use std::path::Path;

use tokio::runtime::Runtime;

use common::models::{QueryResult, ResolvedConnection};
use common::{AppError, AppResult};

use crate::driver::DatabaseConnection;

/// Exclusive, sequential handle on one database connection.
///
/// The handle blocks on its own current-thread runtime, so it must not be
/// used from inside another tokio runtime.
pub struct ConnectionHandle {
    runtime: Runtime,
    connection: Option<DatabaseConnection>,
    target: ResolvedConnection,
}

impl ConnectionHandle {
    pub(crate) fn new(
        runtime: Runtime,
        connection: DatabaseConnection,
        target: ResolvedConnection,
    ) -> Self {
        Self {
            runtime,
            connection: Some(connection),
            target,
        }
    }

    /// The connection target this handle was opened for.
    pub fn target(&self) -> &ResolvedConnection {
        &self.target
    }

    /// Returns `true` until [`close`](Self::close) has been called.
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Runs `sql` and returns the fully materialised result.
    ///
    /// # Errors
    /// - `AppError::InvalidHandle` if the handle is closed.
    /// - `AppError::Query` if the server rejects the SQL.
    pub fn execute(&mut self, sql: &str) -> AppResult<QueryResult> {
        let connection = self.connection.as_mut().ok_or(AppError::InvalidHandle)?;
        let result = self.runtime.block_on(connection.execute(sql))?;
        tracing::debug!(
            alias = %self.target.alias,
            rows = result.row_count,
            affected = ?result.affected_rows,
            elapsed_ms = result.execution_time_ms,
            "query executed"
        );
        Ok(result)
    }

    /// Reads the SQL file at `path` and runs it.
    ///
    /// The file's existence is checked first, before the handle state and
    /// before any connection I/O.
    ///
    /// # Errors
    /// - `AppError::QueryFileNotFound` if `path` does not exist.
    /// - `AppError::Io` if the file cannot be read.
    /// - Everything [`execute`](Self::execute) returns.
    pub fn execute_file(&mut self, path: impl AsRef<Path>) -> AppResult<QueryResult> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::QueryFileNotFound(path.to_path_buf()));
        }
        let sql = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        self.execute(&sql)
    }

    /// Disconnects and releases the connection.
    ///
    /// Must be called exactly once. A second call returns
    /// `AppError::InvalidHandle`.
    pub fn close(&mut self) -> AppResult<()> {
        let connection = self.connection.take().ok_or(AppError::InvalidHandle)?;
        self.runtime.block_on(connection.close())?;
        tracing::info!(alias = %self.target.alias, target = %self.target, "connection closed");
        Ok(())
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        if self.connection.is_some() {
            tracing::warn!(
                alias = %self.target.alias,
                "connection handle dropped without close, socket released without goodbye"
            );
        }
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("target", &self.target)
            .field("db_type", &self.connection.as_ref().map(|c| c.db_type()))
            .field("open", &self.is_open())
            .finish()
    }
}
