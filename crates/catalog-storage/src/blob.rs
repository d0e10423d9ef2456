//! Blob storage for uploaded form PDFs.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, StorageError};

/// Folder uploads land in.
pub const FORMS_PREFIX: &str = "forms";

const FILE_SCHEME: &str = "file://";

/// Binary object storage addressed by slash-separated paths.
pub trait BlobStore {
    /// Stores `bytes` at `path`, replacing any previous object, and returns
    /// the URL the object can be fetched from.
    fn put(&self, path: &str, bytes: &[u8]) -> Result<String>;

    /// Fetches an object by the URL returned from [`BlobStore::put`] or by
    /// its path.
    fn get(&self, url_or_path: &str) -> Result<Vec<u8>>;

    /// Removes an object.
    fn delete(&self, path: &str) -> Result<()>;
}

/// [`BlobStore`] backed by a local directory. URLs are `file://` URLs of the
/// stored files.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Opens (creating if needed) a blob directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| StorageError::blob(root.display().to_string(), e))?;
        let root = root
            .canonicalize()
            .map_err(|e| StorageError::blob(root.display().to_string(), e))?;
        debug!(root = %root.display(), "opened blob store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a blob path onto the filesystem, refusing anything that would
    /// escape the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        let clean = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !clean {
            return Err(StorageError::blob(path, "invalid blob path"));
        }
        Ok(self.root.join(rel))
    }

    fn url_for(file: &Path) -> String {
        format!("{FILE_SCHEME}{}", file.display())
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<String> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::blob(path, e))?;
        }
        fs::write(&file, bytes).map_err(|e| StorageError::blob(path, e))?;
        info!(path, bytes = bytes.len(), "stored blob");
        Ok(Self::url_for(&file))
    }

    fn get(&self, url_or_path: &str) -> Result<Vec<u8>> {
        let file = match url_or_path.strip_prefix(FILE_SCHEME) {
            Some(local) => PathBuf::from(local),
            None => self.resolve(url_or_path)?,
        };
        fs::read(&file).map_err(|e| StorageError::blob(url_or_path, e))
    }

    fn delete(&self, path: &str) -> Result<()> {
        let file = self.resolve(path)?;
        fs::remove_file(&file).map_err(|e| StorageError::blob(path, e))
    }
}

/// Blob path for an uploaded form file: `forms/<file name>`.
pub fn form_blob_path(file_name: &str) -> String {
    format!("{FORMS_PREFIX}/{file_name}")
}

/// Uploads a local file under [`FORMS_PREFIX`]. Returns `(path, url)`.
pub fn upload_form_file(blobs: &dyn BlobStore, local: &Path) -> Result<(String, String)> {
    let name = local
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StorageError::blob(local.display().to_string(), "not a file name"))?;
    let bytes = fs::read(local).map_err(|e| StorageError::blob(local.display().to_string(), e))?;
    let path = form_blob_path(name);
    let url = blobs.put(&path, &bytes)?;
    Ok((path, url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn put_then_get_by_url_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = FsBlobStore::open(dir.path().join("blobs")).unwrap();
        let url = blobs.put("forms/ho3.pdf", b"%PDF-1.4").unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("forms/ho3.pdf"));
        assert_eq!(blobs.get(&url).unwrap(), b"%PDF-1.4");
        assert_eq!(blobs.get("forms/ho3.pdf").unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = FsBlobStore::open(dir.path()).unwrap();
        assert!(blobs.put("../evil.pdf", b"x").is_err());
        assert!(blobs.put("/abs.pdf", b"x").is_err());
        assert!(blobs.put("", b"x").is_err());
    }

    #[test]
    fn upload_uses_forms_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("CP 00 10.pdf");
        fs::write(&local, b"pdf").unwrap();
        let blobs = FsBlobStore::open(dir.path().join("blobs")).unwrap();
        let (path, url) = upload_form_file(&blobs, &local).unwrap();
        assert_eq!(path, "forms/CP 00 10.pdf");
        assert_eq!(blobs.get(&url).unwrap(), b"pdf");
    }

    #[test]
    fn delete_removes_object() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = FsBlobStore::open(dir.path()).unwrap();
        blobs.put("forms/a.pdf", b"a").unwrap();
        blobs.delete("forms/a.pdf").unwrap();
        assert!(blobs.get("forms/a.pdf").is_err());
    }
}
