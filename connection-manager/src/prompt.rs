//! Password prompt capability.
//!
//! The connection manager asks a [`PasswordPrompt`] for a password whenever
//! the resolved connection has none. Injecting the prompt keeps terminal
//! access out of the manager and makes the fallback path testable.

use std::io::IsTerminal;

use common::models::ResolvedConnection;
use common::{AppError, AppResult};

/// Supplies a password for a connection that has none.
pub trait PasswordPrompt {
    /// Returns the password to use, or `None` to connect without one.
    fn prompt(&self, target: &ResolvedConnection) -> AppResult<Option<String>>;
}

/// Reads the password from the controlling terminal without echo.
///
/// Returns `None` when stdin is not a terminal (scripts, CI, pipes).
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn prompt(&self, target: &ResolvedConnection) -> AppResult<Option<String>> {
        if !std::io::stdin().is_terminal() {
            tracing::debug!(alias = %target.alias, "not interactive, skipping password prompt");
            return Ok(None);
        }
        let password = rpassword::prompt_password(format!("Password for {target}: "))
            .map_err(AppError::Prompt)?;
        Ok(Some(password))
    }
}

/// Never prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl PasswordPrompt for NoPrompt {
    fn prompt(&self, _target: &ResolvedConnection) -> AppResult<Option<String>> {
        Ok(None)
    }
}

impl<F> PasswordPrompt for F
where
    F: Fn(&ResolvedConnection) -> AppResult<Option<String>>,
{
    fn prompt(&self, target: &ResolvedConnection) -> AppResult<Option<String>> {
        self(target)
    }
}
