//! Connection manager.
//!
//! Opens one connection for a resolved alias, prompting for the password
//! when none was found in the password file.

use tokio::runtime::Builder;

use common::models::ResolvedConnection;
use common::{AppError, AppResult};

use crate::driver::DatabaseConnection;
use crate::handle::ConnectionHandle;
use crate::prompt::PasswordPrompt;

/// Opens connections, asking `prompt` for missing passwords.
pub struct ConnectionManager<'p> {
    prompt: &'p dyn PasswordPrompt,
}

impl<'p> ConnectionManager<'p> {
    /// Creates a manager using the given prompt capability.
    pub fn new(prompt: &'p dyn PasswordPrompt) -> Self {
        Self { prompt }
    }

    /// Fills in the password from the prompt if the target has none.
    pub fn with_password(&self, mut target: ResolvedConnection) -> AppResult<ResolvedConnection> {
        if target.password.is_none() {
            target.password = self.prompt.prompt(&target)?;
            if target.password.is_none() {
                tracing::debug!(alias = %target.alias, "no password available, connecting without one");
            }
        }
        Ok(target)
    }

    /// Opens exactly one connection to `resolved`.
    ///
    /// # Errors
    /// - `AppError::Prompt` if the password prompt fails.
    /// - `AppError::Runtime` if the driver runtime cannot start.
    /// - `AppError::Connection` on network or authentication failure. Not retried.
    pub fn open(&self, resolved: ResolvedConnection) -> AppResult<ConnectionHandle> {
        let target = self.with_password(resolved)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AppError::Runtime)?;

        let connection =
            runtime.block_on(DatabaseConnection::connect(&target, target.password.as_deref()))?;
        tracing::info!(
            alias = %target.alias,
            db_type = %target.db_type,
            target = %target,
            "connection opened"
        );
        Ok(ConnectionHandle::new(runtime, connection, target))
    }
}
