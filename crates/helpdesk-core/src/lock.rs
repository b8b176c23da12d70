use crate::error::StorageError;
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockKind {
    Shared,
    Exclusive,
}

/// RAII advisory lock on a store directory's lock file.
///
/// Readers take [`LockKind::Shared`], writers [`LockKind::Exclusive`].
/// Release happens on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
    kind: LockKind,
}

impl StoreLock {
    /// Acquire the lock, polling until `timeout` elapses.
    pub fn acquire(path: &Path, kind: LockKind, timeout: Duration) -> Result<Self, StorageError> {
        let io_err = |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)
                .map_err(io_err)?;

            let acquired = match kind {
                LockKind::Shared => file.try_lock_shared().is_ok(),
                LockKind::Exclusive => file.try_lock_exclusive().is_ok(),
            };

            if acquired {
                return Ok(Self {
                    file,
                    path: path.to_path_buf(),
                    kind,
                });
            }

            if start.elapsed() >= timeout {
                return Err(StorageError::LockTimeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(Duration::from_millis(10));
        }
    }

    pub fn exclusive(path: &Path, timeout: Duration) -> Result<Self, StorageError> {
        Self::acquire(path, LockKind::Exclusive, timeout)
    }

    pub fn shared(path: &Path, timeout: Duration) -> Result<Self, StorageError> {
        Self::acquire(path, LockKind::Shared, timeout)
    }

    /// Explicitly release the lock. Release also happens automatically on drop.
    pub fn release(self) {
        drop(self);
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn kind(&self) -> LockKind {
        self.kind
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
