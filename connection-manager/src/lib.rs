//! Single-connection database access by alias.
//!
//! Resolves an alias with [`alias_resolver`], opens one MySQL or PostgreSQL
//! connection, runs SQL and closes the connection on request.
//!
//! ```no_run
//! use connection_manager::{destroy_connection, new_connection_default, run_query};
//!
//! let mut handle = new_connection_default("database1")?;
//! let result = run_query(&mut handle, "SELECT now()")?;
//! println!("{} rows", result.row_count);
//! destroy_connection(handle)?;
//! # Ok::<(), common::AppError>(())
//! ```

pub mod api;
pub mod driver;
pub mod handle;
pub mod manager;
pub mod prompt;
mod row;

pub use api::{
    destroy_connection, new_connection, new_connection_default, run_query, run_query_file,
    with_connection,
};
pub use handle::ConnectionHandle;
pub use manager::ConnectionManager;
pub use prompt::{NoPrompt, PasswordPrompt, TerminalPrompt};
