use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::KeyValueStore;
use crate::error::StorageError;
use crate::lock::StoreLock;

const LOCK_FILE: &str = ".store.lock";
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

/// One `<key>.json` file per key under a directory.
///
/// Writes go to a temp file that is renamed over the target while holding
/// the directory's exclusive lock, so readers see either the old or the new
/// blob and never a torn one.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    lock_timeout: Duration,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self {
            root,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }
}

fn io_error(path: &Path) -> impl Fn(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        let _lock = StoreLock::shared(&self.lock_path(), self.lock_timeout)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&path)(err)),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|err| StorageError::NotUtf8 {
                key: key.to_string(),
                lossy: String::from_utf8_lossy(err.as_bytes()).into_owned(),
            })
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!(".{key}.json.tmp"));
        let _lock = StoreLock::exclusive(&self.lock_path(), self.lock_timeout)?;

        let mut file = fs::File::create(&tmp).map_err(io_error(&tmp))?;
        file.write_all(value.as_bytes()).map_err(io_error(&tmp))?;
        file.sync_all().map_err(io_error(&tmp))?;
        drop(file);

        fs::rename(&tmp, &path).map_err(io_error(&path))?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "wrote blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let _lock = StoreLock::exclusive(&self.lock_path(), self.lock_timeout)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(&path)(err)),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
