//! Discovery of the `.catalog/` directory.
//!
//! The `.catalog/` directory holds the database, the blob folder and
//! `config.yaml`. It is found by walking up from the working directory.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// The name of the catalog metadata directory.
pub const CATALOG_DIR_NAME: &str = ".catalog";

/// Environment variable that points straight at a catalog directory.
const CATALOG_DIR_ENV: &str = "PC_DIR";

/// Walk up the directory tree from `start` looking for `.catalog/`.
///
/// `PC_DIR` wins when it names an existing directory.
pub fn find_catalog_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(CATALOG_DIR_ENV) {
        let env_path = PathBuf::from(&env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }
    find_from(start)
}

fn find_from(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(CATALOG_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Like [`find_catalog_dir`], but a miss is an error.
pub fn find_catalog_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_catalog_dir(start).ok_or(ConfigError::CatalogDirNotFound)
}

/// Creates `.catalog/` under `path` (or `path` itself when it is already
/// named `.catalog`) and returns it.
pub fn ensure_catalog_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let dir = if path.ends_with(CATALOG_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(CATALOG_DIR_NAME)
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_dir_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join(CATALOG_DIR_NAME);
        std::fs::create_dir(&catalog).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_from(&nested).unwrap();
        assert_eq!(found, catalog.canonicalize().unwrap());
    }

    #[test]
    fn missing_dir_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("empty");
        std::fs::create_dir(&nested).unwrap();
        // The temp root may itself sit under a .catalog on odd machines;
        // only assert when it does not.
        if dir.path().ancestors().all(|p| !p.join(CATALOG_DIR_NAME).is_dir()) {
            assert!(find_from(&nested).is_none());
        }
    }

    #[test]
    fn ensure_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let created = ensure_catalog_dir(dir.path()).unwrap();
        assert!(created.is_dir());
        assert!(created.ends_with(CATALOG_DIR_NAME));
        assert_eq!(ensure_catalog_dir(&created).unwrap(), created);
    }
}
