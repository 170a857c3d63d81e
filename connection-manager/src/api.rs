//! Public operations.
//!
//! The library surface callers use end to end: resolve an alias and open a
//! connection, run queries, destroy the connection. Handles are passed
//! explicitly; there is no global registry.

use std::path::Path;

use alias_resolver::AliasResolver;
use common::config::AliasPaths;
use common::models::QueryResult;
use common::AppResult;

use crate::handle::ConnectionHandle;
use crate::manager::ConnectionManager;
use crate::prompt::{PasswordPrompt, TerminalPrompt};

/// Resolves `alias` against the files in `paths` and opens a connection.
pub fn new_connection(
    alias: &str,
    paths: &AliasPaths,
    prompt: &dyn PasswordPrompt,
) -> AppResult<ConnectionHandle> {
    let resolved = AliasResolver::new(paths.clone()).lookup(alias)?;
    ConnectionManager::new(prompt).open(resolved)
}

/// [`new_connection`] with `~/.pgpass`, `~/db.conf` and a terminal prompt.
pub fn new_connection_default(alias: &str) -> AppResult<ConnectionHandle> {
    new_connection(alias, &AliasPaths::default(), &TerminalPrompt)
}

/// Runs inline SQL on an open handle.
pub fn run_query(handle: &mut ConnectionHandle, query: &str) -> AppResult<QueryResult> {
    handle.execute(query)
}

/// Runs the SQL in `path` on an open handle.
pub fn run_query_file(
    handle: &mut ConnectionHandle,
    path: impl AsRef<Path>,
) -> AppResult<QueryResult> {
    handle.execute_file(path)
}

/// Closes the connection and releases the handle.
pub fn destroy_connection(mut handle: ConnectionHandle) -> AppResult<()> {
    handle.close()
}

/// Opens a connection for `alias`, passes it to `body` and closes it on
/// every exit path.
///
/// An error from `body` wins over an error from closing.
pub fn with_connection<T, F>(
    alias: &str,
    paths: &AliasPaths,
    prompt: &dyn PasswordPrompt,
    body: F,
) -> AppResult<T>
where
    F: FnOnce(&mut ConnectionHandle) -> AppResult<T>,
{
    let mut handle = new_connection(alias, paths, prompt)?;
    let outcome = body(&mut handle);
    let closed = if handle.is_open() {
        handle.close()
    } else {
        Ok(())
    };

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            tracing::warn!(alias, error = %close_err, "closing after a failed operation also failed");
            Err(e)
        }
    }
}
