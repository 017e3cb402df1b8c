//! File-backed storage

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{KeyValueStore, StorageError};

/// Stores each key as a file inside a directory.
///
/// Writes go to a temporary file that is renamed over the target, so a reader
/// never sees a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');

        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir)?;

        if let Err(error) = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path)) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!(path = %tmp.display(), error = %cleanup, "temporary file not removed");
            }

            return Err(error.into());
        }

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Err(error) if error.kind() != ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn get_before_any_write_returns_none() -> TestResult {
        let dir = tempdir()?;
        let store = FileStore::new(dir.path().join("missing"));

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn set_creates_directory_and_round_trips() -> TestResult {
        let dir = tempdir()?;
        let mut store = FileStore::new(dir.path().join("nested"));

        store.set("cart", b"[1,2,3]")?;

        assert_eq!(store.get("cart")?, Some(b"[1,2,3]".to_vec()));
        assert!(store.dir().join("cart.json").exists());
        assert!(!store.dir().join("cart.json.tmp").exists());

        Ok(())
    }

    #[test]
    fn failed_rename_leaves_no_temporary_file() -> TestResult {
        let dir = tempdir()?;
        let mut store = FileStore::new(dir.path());

        // A directory in the way makes the rename fail after the write succeeds.
        fs::create_dir(dir.path().join("cart.json"))?;
        fs::write(dir.path().join("cart.json").join("keep"), b"")?;

        let result = store.set("cart", b"[]");

        assert!(
            matches!(result, Err(StorageError::Io(_))),
            "expected Io, got {result:?}"
        );
        assert!(!dir.path().join("cart.json.tmp").exists());

        Ok(())
    }

    #[test]
    fn remove_missing_key_succeeds() -> TestResult {
        let dir = tempdir()?;
        let mut store = FileStore::new(dir.path());

        store.remove("cart")?;
        store.set("cart", b"[]")?;
        store.remove("cart")?;

        assert_eq!(store.get("cart")?, None);

        Ok(())
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() -> TestResult {
        let dir = tempdir()?;
        let mut store = FileStore::new(dir.path());

        let result = store.set("../cart", b"[]");

        assert!(
            matches!(result, Err(StorageError::InvalidKey(ref key)) if key == "../cart"),
            "expected InvalidKey, got {result:?}"
        );

        Ok(())
    }
}
