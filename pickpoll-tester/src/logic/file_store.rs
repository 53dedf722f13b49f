//! Directory-backed blob store: one JSON file per key.

use pickpoll_core::{BlobStore, StorageError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9._-]` become `_`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        log::trace!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pickpoll-store-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn stores_and_removes_blobs() {
        let store = FileStore::open(temp_dir("roundtrip")).unwrap();
        assert_eq!(store.get("pickpoll.session").unwrap(), None);
        store.set("pickpoll.session", "{\"totalClicks\":0}").unwrap();
        assert!(store.dir().join("pickpoll.session.json").exists());
        assert_eq!(
            store.get("pickpoll.session").unwrap().as_deref(),
            Some("{\"totalClicks\":0}")
        );
        store.remove("pickpoll.session").unwrap();
        store.remove("pickpoll.session").unwrap();
        assert_eq!(store.get("pickpoll.session").unwrap(), None);
    }

    #[test]
    fn sanitizes_key_paths() {
        let store = FileStore::open(temp_dir("names")).unwrap();
        let path = store.path_for("../etc/passwd");
        assert_eq!(path.file_name().unwrap(), ".._etc_passwd.json");
        assert_eq!(path.parent().unwrap(), store.dir());
    }

    #[test]
    fn reopened_store_sees_previous_writes() {
        let dir = temp_dir("reopen");
        FileStore::open(&dir).unwrap().set("k", "v").unwrap();
        let again = FileStore::open(&dir).unwrap();
        assert_eq!(again.get("k").unwrap().as_deref(), Some("v"));
    }
}
