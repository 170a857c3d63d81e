//! Application error types.
//!
//! Every failure the resolver or the connection manager can report is a
//! variant of [`AppError`]. All of them are fatal to the operation that
//! produced them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the workspace.
pub type AppResult<T> = Result<T, AppError>;

/// Application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog file does not exist; there is nothing to resolve against.
    #[error("catalog file not found: {}", .0.display())]
    CatalogFileMissing(PathBuf),

    /// No catalog record matched the requested alias.
    #[error("alias not found: {0}")]
    AliasNotFound(String),

    /// More than one record matched the requested alias.
    #[error("alias `{alias}` is ambiguous: {matches} matching entries")]
    AmbiguousAlias { alias: String, matches: usize },

    /// The driver failed to open the connection (network or authentication).
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// The SQL file passed to a query does not exist.
    #[error("query file not found: {}", .0.display())]
    QueryFileNotFound(PathBuf),

    /// The server rejected the SQL, or the connection broke mid-query.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// The handle has already been closed.
    #[error("connection handle is closed")]
    InvalidHandle,

    /// Reading the password from the terminal failed.
    #[error("password prompt failed: {0}")]
    Prompt(#[source] io::Error),

    /// Reading a configuration or SQL file failed for a reason other than
    /// the file being absent.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The blocking runtime backing a handle could not be created.
    #[error("failed to start driver runtime: {0}")]
    Runtime(#[source] io::Error),
}

impl AppError {
    /// Returns a stable error code for callers that branch on the kind.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::CatalogFileMissing(_) => "CATALOG_FILE_MISSING",
            AppError::AliasNotFound(_) => "ALIAS_NOT_FOUND",
            AppError::AmbiguousAlias { .. } => "AMBIGUOUS_ALIAS",
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::QueryFileNotFound(_) => "QUERY_FILE_NOT_FOUND",
            AppError::Query(_) => "QUERY_ERROR",
            AppError::InvalidHandle => "INVALID_HANDLE",
            AppError::Prompt(_) => "PROMPT_ERROR",
            AppError::Io { .. } => "IO_ERROR",
            AppError::Runtime(_) => "RUNTIME_ERROR",
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::AliasNotFound("db".into()).code(),
            "ALIAS_NOT_FOUND"
        );
        assert_eq!(
            AppError::AmbiguousAlias {
                alias: "db".into(),
                matches: 2
            }
            .code(),
            "AMBIGUOUS_ALIAS"
        );
        assert_eq!(AppError::InvalidHandle.code(), "INVALID_HANDLE");
    }

    #[test]
    fn test_error_display() {
        let err = AppError::AmbiguousAlias {
            alias: "reporting".into(),
            matches: 3,
        };
        assert_eq!(
            err.to_string(),
            "alias `reporting` is ambiguous: 3 matching entries"
        );

        let err = AppError::CatalogFileMissing(PathBuf::from("/nope/db.conf"));
        assert!(err.to_string().contains("/nope/db.conf"));
    }

    #[test]
    fn test_io_helper_keeps_source() {
        let err = AppError::io(
            "/etc/shadow",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        match err {
            AppError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("/etc/shadow"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
