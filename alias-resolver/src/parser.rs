//! Password and catalog file parsers.
//!
//! Both formats are colon-delimited, one record per line. Parsing is lenient:
//! comments, blank lines and lines that do not have the expected shape are
//! dropped without an error.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use common::models::{CatalogEntry, DbType, PasswordEntry};
use common::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// `hostname:port:database:username:password`, password takes the rest of the line.
static PASSWORD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^:]+):(\d+):([^:]*):([^:]+):(.*)$").expect("valid password line regex")
});

/// `alias:dbtype:hostname:port:database:username[:anything]`
static CATALOG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^:]+):(postgres|mysql):([^:]+):(\d+):([^:]+):([^:]+)(?::.*)?$")
        .expect("valid catalog line regex")
});

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Parses one password file line. Returns `None` for comments and malformed lines.
pub fn parse_password_line(line: &str) -> Option<PasswordEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    if is_comment(line) {
        return None;
    }
    let caps = PASSWORD_LINE.captures(line)?;
    Some(PasswordEntry {
        hostname: caps[1].to_string(),
        port: caps[2].parse().ok()?,
        database: non_empty(&caps[3]),
        username: caps[4].to_string(),
        password: non_empty(&caps[5]),
    })
}

/// Parses one catalog file line. Returns `None` for comments and malformed lines.
pub fn parse_catalog_line(line: &str) -> Option<CatalogEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    if is_comment(line) {
        return None;
    }
    let caps = CATALOG_LINE.captures(line)?;
    Some(CatalogEntry {
        alias: caps[1].to_string(),
        db_type: DbType::parse(&caps[2])?,
        hostname: caps[3].to_string(),
        port: caps[4].parse().ok()?,
        database: caps[5].to_string(),
        username: caps[6].to_string(),
    })
}

/// Parses password file content held in memory.
pub fn parse_password_str(content: &str) -> Vec<PasswordEntry> {
    let entries: Vec<_> = content.lines().filter_map(parse_password_line).collect();
    tracing::debug!(
        kept = entries.len(),
        lines = content.lines().count(),
        "parsed password entries"
    );
    entries
}

/// Parses catalog file content held in memory.
pub fn parse_catalog_str(content: &str) -> Vec<CatalogEntry> {
    let entries: Vec<_> = content.lines().filter_map(parse_catalog_line).collect();
    tracing::debug!(
        kept = entries.len(),
        lines = content.lines().count(),
        "parsed catalog entries"
    );
    entries
}

/// Reads and parses the password file.
///
/// A missing file is not an error: it yields no entries, and the connection
/// manager falls back to prompting for the password.
pub fn parse_password_file(path: impl AsRef<Path>) -> AppResult<Vec<PasswordEntry>> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_password_str(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "password file not found, no stored passwords");
            Ok(Vec::new())
        }
        Err(e) => Err(AppError::io(path, e)),
    }
}

/// Reads and parses the catalog file.
///
/// # Errors
/// Returns `AppError::CatalogFileMissing` if the file does not exist.
pub fn parse_catalog_file(path: impl AsRef<Path>) -> AppResult<Vec<CatalogEntry>> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse_catalog_str(&content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::CatalogFileMissing(path.to_path_buf()))
        }
        Err(e) => Err(AppError::io(path, e)),
    }
}
