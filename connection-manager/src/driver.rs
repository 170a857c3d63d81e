//! Database driver wrapper.
//!
//! One open connection of whichever type the catalog selected. SQL runs
//! through sqlx's raw path (simple protocol): no statement preparation, and a
//! script may hold several statements.

use std::time::Instant;

use futures::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{Column, ConnectOptions, Connection, Either, Executor, TypeInfo};

use common::models::{ColumnInfo, DbType, QueryResult, ResolvedConnection};
use common::{AppError, AppResult};

use crate::row::{columns, decode_row};

/// An open connection for one of the supported database types.
pub enum DatabaseConnection {
    /// PostgreSQL connection.
    Postgres(PgConnection),
    /// MySQL connection.
    MySQL(MySqlConnection),
}

/// Rows and counters collected while draining a result stream.
#[derive(Default)]
struct Collected {
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<serde_json::Value>>,
    pending_columns: Vec<ColumnInfo>,
    pending_rows: Vec<Vec<serde_json::Value>>,
    affected: u64,
}

impl Collected {
    fn push_row(
        &mut self,
        columns: impl FnOnce() -> Vec<ColumnInfo>,
        values: Vec<serde_json::Value>,
    ) {
        if self.pending_rows.is_empty() {
            self.pending_columns = columns();
        }
        self.pending_rows.push(values);
    }

    /// Closes the current statement. Only the last statement that produced
    /// rows is kept in the result.
    fn finish_statement(&mut self, rows_affected: u64) {
        self.affected += rows_affected;
        if !self.pending_rows.is_empty() {
            self.columns = std::mem::take(&mut self.pending_columns);
            self.rows = std::mem::take(&mut self.pending_rows);
        }
    }

    /// True when nothing has produced rows yet.
    fn needs_columns(&self) -> bool {
        self.rows.is_empty() && self.pending_rows.is_empty()
    }

    /// Columns of a statement that returned no rows. A non-empty list marks
    /// the result as a row set rather than an affected-row count.
    fn describe_columns(&mut self, columns: Vec<ColumnInfo>) {
        if !columns.is_empty() {
            self.columns = columns;
        }
    }

    fn into_result(mut self, started: Instant) -> QueryResult {
        self.finish_statement(0);
        let execution_time_ms = started.elapsed().as_millis() as u64;
        if self.rows.is_empty() && self.columns.is_empty() {
            return QueryResult::affected(self.affected, execution_time_ms);
        }
        QueryResult {
            row_count: self.rows.len(),
            columns: self.columns,
            rows: self.rows,
            affected_rows: None,
            execution_time_ms,
        }
    }
}

impl DatabaseConnection {
    /// Opens exactly one connection to `target` using `password`.
    ///
    /// With no password an empty one is sent.
    pub async fn connect(target: &ResolvedConnection, password: Option<&str>) -> AppResult<Self> {
        match target.db_type {
            DbType::Postgres => {
                let conn = pg_options(target, password)
                    .connect()
                    .await
                    .map_err(AppError::Connection)?;
                Ok(DatabaseConnection::Postgres(conn))
            }
            DbType::MySQL => {
                let conn = mysql_options(target, password)
                    .connect()
                    .await
                    .map_err(AppError::Connection)?;
                Ok(DatabaseConnection::MySQL(conn))
            }
        }
    }

    /// Returns the database type of this connection.
    pub fn db_type(&self) -> DbType {
        match self {
            DatabaseConnection::Postgres(_) => DbType::Postgres,
            DatabaseConnection::MySQL(_) => DbType::MySQL,
        }
    }

    /// Runs `sql` and materialises the full result.
    pub async fn execute(&mut self, sql: &str) -> AppResult<QueryResult> {
        let started = Instant::now();
        let mut collected = Collected::default();

        match self {
            DatabaseConnection::Postgres(conn) => {
                let items = (&mut *conn)
                    .fetch_many(sqlx::raw_sql(sql))
                    .try_collect::<Vec<_>>()
                    .await
                    .map_err(AppError::Query)?;
                for item in items {
                    match item {
                        Either::Left(done) => collected.finish_statement(done.rows_affected()),
                        Either::Right(row) => {
                            let values = decode_row(&row).map_err(AppError::Query)?;
                            collected.push_row(|| columns(&row), values);
                        }
                    }
                }
                if collected.needs_columns() {
                    match conn.describe(sql).await {
                        Ok(described) => collected.describe_columns(
                            described
                                .columns()
                                .iter()
                                .enumerate()
                                .map(|(index, column)| ColumnInfo {
                                    name: column.name().to_string(),
                                    data_type: column.type_info().name().to_string(),
                                    nullable: described.nullable(index),
                                })
                                .collect(),
                        ),
                        Err(e) => {
                            tracing::debug!(error = %e, "statement not describable, reporting affected rows")
                        }
                    }
                }
            }
            DatabaseConnection::MySQL(conn) => {
                let items = (&mut *conn)
                    .fetch_many(sqlx::raw_sql(sql))
                    .try_collect::<Vec<_>>()
                    .await
                    .map_err(AppError::Query)?;
                for item in items {
                    match item {
                        Either::Left(done) => collected.finish_statement(done.rows_affected()),
                        Either::Right(row) => {
                            let values = decode_row(&row).map_err(AppError::Query)?;
                            collected.push_row(|| columns(&row), values);
                        }
                    }
                }
                if collected.needs_columns() {
                    match conn.describe(sql).await {
                        Ok(described) => collected.describe_columns(
                            described
                                .columns()
                                .iter()
                                .enumerate()
                                .map(|(index, column)| ColumnInfo {
                                    name: column.name().to_string(),
                                    data_type: column.type_info().name().to_string(),
                                    nullable: described.nullable(index),
                                })
                                .collect(),
                        ),
                        Err(e) => {
                            tracing::debug!(error = %e, "statement not describable, reporting affected rows")
                        }
                    }
                }
            }
        }

        Ok(collected.into_result(started))
    }

    /// Sends the protocol goodbye and closes the socket.
    pub async fn close(self) -> AppResult<()> {
        let closed = match self {
            DatabaseConnection::Postgres(conn) => conn.close().await,
            DatabaseConnection::MySQL(conn) => conn.close().await,
        };
        closed.map_err(AppError::Connection)
    }
}

/// Postgres options built from the resolved target alone. The driver's own
/// pgpass lookup is skipped and the password is always set, so neither
/// `PGPASSWORD` nor `PGSSLMODE` from the environment reaches the connection.
fn pg_options(target: &ResolvedConnection, password: Option<&str>) -> PgConnectOptions {
    PgConnectOptions::new_without_pgpass()
        .host(&target.hostname)
        .port(target.port)
        .username(&target.username)
        .database(&target.database)
        .password(password.unwrap_or_default())
        .ssl_mode(PgSslMode::Prefer)
        .application_name("dbalias")
}

fn mysql_options(target: &ResolvedConnection, password: Option<&str>) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&target.hostname)
        .port(target.port)
        .username(&target.username)
        .database(&target.database)
        .password(password.unwrap_or_default())
}
