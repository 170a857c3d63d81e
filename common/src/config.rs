//! Default locations of the password and catalog files.

use std::path::{Path, PathBuf};

/// File name of the password file inside the home directory.
pub const PASSWORD_FILE_NAME: &str = ".pgpass";

/// File name of the catalog file inside the home directory.
pub const CATALOG_FILE_NAME: &str = "db.conf";

/// Paths of the two files an alias is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPaths {
    /// Password file (`hostname:port:database:username:password`).
    pub password_file: PathBuf,
    /// Catalog file (`alias:dbtype:hostname:port:database:username`).
    pub catalog_file: PathBuf,
}

impl Default for AliasPaths {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| {
            tracing::warn!("home directory unknown, using relative file paths");
            PathBuf::new()
        });
        Self::in_dir(&home)
    }
}

impl AliasPaths {
    /// Creates paths from explicit locations.
    pub fn new(password_file: impl Into<PathBuf>, catalog_file: impl Into<PathBuf>) -> Self {
        Self {
            password_file: password_file.into(),
            catalog_file: catalog_file.into(),
        }
    }

    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            password_file: dir.join(PASSWORD_FILE_NAME),
            catalog_file: dir.join(CATALOG_FILE_NAME),
        }
    }

    /// Replaces the password file path.
    pub fn with_password_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.password_file = path.into();
        self
    }

    /// Replaces the catalog file path.
    pub fn with_catalog_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_file = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_uses_default_names() {
        let paths = AliasPaths::in_dir(Path::new("/home/alice"));
        assert_eq!(paths.password_file, PathBuf::from("/home/alice/.pgpass"));
        assert_eq!(paths.catalog_file, PathBuf::from("/home/alice/db.conf"));
    }

    #[test]
    fn test_default_ends_with_file_names() {
        let paths = AliasPaths::default();
        assert!(paths.password_file.ends_with(PASSWORD_FILE_NAME));
        assert!(paths.catalog_file.ends_with(CATALOG_FILE_NAME));
    }

    #[test]
    fn test_overrides() {
        let paths = AliasPaths::in_dir(Path::new("/srv"))
            .with_password_file("/tmp/pass")
            .with_catalog_file("/tmp/catalog");
        assert_eq!(paths, AliasPaths::new("/tmp/pass", "/tmp/catalog"));
    }
}
