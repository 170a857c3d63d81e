//! Alias resolution.
//!
//! Joins catalog entries to password entries on (hostname, username, port),
//! keeps password entries whose database is a wildcard, empty, or equal to the
//! catalog database, and requires exactly one record for the requested alias.
//!
//! The join is a left join on the catalog side: a catalog entry with no
//! usable password entry still resolves, with no password, so the caller can
//! prompt for one.

use common::config::AliasPaths;
use common::models::{CatalogEntry, PasswordEntry, ResolvedConnection};
use common::{AppError, AppResult};

use crate::parser::{parse_catalog_file, parse_password_file};

/// Resolves `alias` against already parsed entries.
///
/// # Errors
/// - `AppError::AliasNotFound` if no catalog entry carries the alias.
/// - `AppError::AmbiguousAlias` if the join yields more than one record.
pub fn resolve(
    alias: &str,
    passwords: &[PasswordEntry],
    catalog: &[CatalogEntry],
) -> AppResult<ResolvedConnection> {
    let mut records: Vec<ResolvedConnection> = Vec::new();

    for entry in catalog.iter().filter(|c| c.alias == alias) {
        let mut matched = passwords
            .iter()
            .filter(|p| p.matches_target(&entry.hostname, &entry.username, entry.port))
            .filter(|p| p.matches_database(&entry.database))
            .peekable();

        if matched.peek().is_none() {
            records.push(merge(entry, None));
        } else {
            records.extend(matched.map(|p| merge(entry, p.password.clone())));
        }
    }

    match records.len() {
        0 => Err(AppError::AliasNotFound(alias.to_string())),
        1 => {
            let resolved = records.remove(0);
            tracing::debug!(
                alias,
                target = %resolved,
                has_password = resolved.has_password(),
                "alias resolved"
            );
            Ok(resolved)
        }
        matches => Err(AppError::AmbiguousAlias {
            alias: alias.to_string(),
            matches,
        }),
    }
}

fn merge(entry: &CatalogEntry, password: Option<String>) -> ResolvedConnection {
    ResolvedConnection {
        alias: entry.alias.clone(),
        db_type: entry.db_type,
        hostname: entry.hostname.clone(),
        port: entry.port,
        database: entry.database.clone(),
        username: entry.username.clone(),
        password,
    }
}

/// Resolves aliases against the files at the configured paths.
///
/// Both files are read in full on every lookup and nothing is retained
/// between lookups.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    paths: AliasPaths,
}

impl AliasResolver {
    /// Creates a resolver for the given file locations.
    pub fn new(paths: AliasPaths) -> Self {
        Self { paths }
    }

    /// Parses both files and resolves `alias`.
    pub fn lookup(&self, alias: &str) -> AppResult<ResolvedConnection> {
        let catalog = parse_catalog_file(&self.paths.catalog_file)?;
        let passwords = parse_password_file(&self.paths.password_file)?;
        resolve(alias, &passwords, &catalog)
    }

    /// Lists the aliases in the catalog, in file order, without duplicates.
    pub fn aliases(&self) -> AppResult<Vec<String>> {
        let mut aliases: Vec<String> = Vec::new();
        for entry in parse_catalog_file(&self.paths.catalog_file)? {
            if !aliases.contains(&entry.alias) {
                aliases.push(entry.alias);
            }
        }
        Ok(aliases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_catalog_str, parse_password_str};
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = "database1:postgres:my.postgres.db.com:5432:my_database1:user1\n";

    fn run(alias: &str, passwords: &str, catalog: &str) -> AppResult<ResolvedConnection> {
        resolve(alias, &parse_password_str(passwords), &parse_catalog_str(catalog))
    }

    #[test]
    fn test_resolve_exact_database() {
        let resolved = run(
            "database1",
            "my.postgres.db.com:5432:my_database1:user1:secret\n",
            CATALOG,
        )
        .unwrap();
        assert_eq!(resolved.hostname, "my.postgres.db.com");
        assert_eq!(resolved.port, 5432);
        assert_eq!(resolved.database, "my_database1");
        assert_eq!(resolved.username, "user1");
        assert_eq!(resolved.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_resolve_wildcard_database_inherits_catalog_name() {
        let resolved = run("database1", "my.postgres.db.com:5432:*:user1:secret\n", CATALOG).unwrap();
        assert_eq!(resolved.database, "my_database1");
        assert_eq!(resolved.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_resolve_empty_database_field_matches() {
        let resolved = run("database1", "my.postgres.db.com:5432::user1:secret\n", CATALOG).unwrap();
        assert_eq!(resolved.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_duplicated_catalog_line_is_ambiguous() {
        let catalog = format!("{CATALOG}{CATALOG}");
        let err = run(
            "database1",
            "my.postgres.db.com:5432:my_database1:user1:secret\n",
            &catalog,
        )
        .unwrap_err();
        match err {
            AppError::AmbiguousAlias { alias, matches } => {
                assert_eq!(alias, "database1");
                assert_eq!(matches, 2);
            }
            other => panic!("expected AmbiguousAlias, got {other:?}"),
        }
    }

    #[test]
    fn test_two_matching_password_entries_are_ambiguous() {
        let passwords = "\
my.postgres.db.com:5432:*:user1:one
my.postgres.db.com:5432:my_database1:user1:two
";
        assert!(matches!(
            run("database1", passwords, CATALOG),
            Err(AppError::AmbiguousAlias { matches: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_alias() {
        assert!(matches!(
            run("nope", "my.postgres.db.com:5432:*:user1:secret\n", CATALOG),
            Err(AppError::AliasNotFound(a)) if a == "nope"
        ));
    }

    #[test]
    fn test_no_password_entries_resolves_without_password() {
        let resolved = run("database1", "", CATALOG).unwrap();
        assert_eq!(resolved.password, None);
        assert_eq!(resolved.database, "my_database1");
    }

    #[test]
    fn test_password_entries_for_other_targets_are_ignored() {
        let passwords = "\
other.host:5432:*:user1:x
my.postgres.db.com:5433:*:user1:x
my.postgres.db.com:5432:*:user2:x
my.postgres.db.com:5432:other_db:user1:x
";
        let resolved = run("database1", passwords, CATALOG).unwrap();
        assert_eq!(resolved.password, None);
    }

    #[test]
    fn test_other_aliases_do_not_interfere() {
        let catalog = "\
database1:postgres:my.postgres.db.com:5432:my_database1:user1
database2:mysql:my.mysql.db.com:3306:my_database2:user2:legacy
";
        let passwords = "my.mysql.db.com:3306:*:user2:mysecret\n";
        let resolved = run("database2", passwords, catalog).unwrap();
        assert_eq!(resolved.db_type, common::models::DbType::MySQL);
        assert_eq!(resolved.password.as_deref(), Some("mysecret"));
    }

    #[test]
    fn test_lookup_reads_files() {
        let dir = TempDir::new().unwrap();
        let paths = AliasPaths::in_dir(dir.path());
        fs::write(&paths.catalog_file, CATALOG).unwrap();
        fs::write(
            &paths.password_file,
            "my.postgres.db.com:5432:my_database1:user1:secret\n",
        )
        .unwrap();

        let resolver = AliasResolver::new(paths);
        let resolved = resolver.lookup("database1").unwrap();
        assert_eq!(resolved.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_lookup_without_password_file() {
        let dir = TempDir::new().unwrap();
        let paths = AliasPaths::in_dir(dir.path());
        fs::write(&paths.catalog_file, CATALOG).unwrap();

        let resolved = AliasResolver::new(paths).lookup("database1").unwrap();
        assert!(!resolved.has_password());
    }

    #[test]
    fn test_lookup_without_catalog_file() {
        let dir = TempDir::new().unwrap();
        let resolver = AliasResolver::new(AliasPaths::in_dir(dir.path()));
        assert!(matches!(
            resolver.lookup("database1"),
            Err(AppError::CatalogFileMissing(_))
        ));
    }

    #[test]
    fn test_aliases_in_file_order() {
        let dir = TempDir::new().unwrap();
        let paths = AliasPaths::in_dir(dir.path());
        fs::write(
            &paths.catalog_file,
            "b:mysql:h:3306:d:u\na:postgres:h:5432:d:u\nb:mysql:h:3306:d:u\n",
        )
        .unwrap();
        let aliases = AliasResolver::new(paths).aliases().unwrap();
        assert_eq!(aliases, ["b", "a"]);
    }
}
