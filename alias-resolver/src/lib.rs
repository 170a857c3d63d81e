//! Database alias resolution.
//!
//! Turns a short alias into full connection parameters by reading two files:
//! - the catalog file, `alias:dbtype:hostname:port:database:username`
//! - the password file, `hostname:port:database:username:password`

pub mod parser;
pub mod resolver;

pub use parser::{parse_catalog_file, parse_password_file};
pub use resolver::{resolve, AliasResolver};
