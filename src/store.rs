use crate::error::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

type Result<T> = std::result::Result<T, StoreError>;

/// Keyed blob storage, namespaced per student.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn exists(&self, student: &str, key: &str) -> Result<bool>;

    /// Fails with [`StoreError::NotFound`] when nothing is stored under `key`.
    async fn read(&self, student: &str, key: &str) -> Result<Vec<u8>>;

    /// Replace whatever is stored under `key`, creating the namespace if needed.
    async fn write(&self, student: &str, key: &str, data: &[u8]) -> Result<()>;
}

/// Stores each blob as `<root>/<student>/<key>.json`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn student_dir(&self, student: &str) -> PathBuf {
        self.root.join(student)
    }

    fn path(&self, student: &str, key: &str) -> PathBuf {
        self.student_dir(student).join(format!("{}.json", key))
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn exists(&self, student: &str, key: &str) -> Result<bool> {
        let path = self.path(student, key);
        tokio::fs::try_exists(&path)
            .await
            .map_err(Self::io_error(&path))
    }

    async fn read(&self, student: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.path(student, key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                student: student.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(Self::io_error(&path)(e)),
        }
    }

    async fn write(&self, student: &str, key: &str, data: &[u8]) -> Result<()> {
        let dir = self.student_dir(student);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(Self::io_error(&dir))?;

        // Write next to the target and rename so readers never see a partial file
        let path = self.path(student, key);
        let tmp = dir.join(format!(".{}.json.tmp", key));
        tokio::fs::write(&tmp, data)
            .await
            .map_err(Self::io_error(&tmp))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(Self::io_error(&path))?;

        debug!(path = %path.display(), bytes = data.len(), "stored artifact");
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use super::{Result, SnapshotStore};
    use crate::error::StoreError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MemoryStore {
        blobs: Mutex<HashMap<(String, String), Vec<u8>>>,
    }

    impl MemoryStore {
        pub fn get(&self, student: &str, key: &str) -> Option<Vec<u8>> {
            self.blobs
                .lock()
                .unwrap()
                .get(&(student.to_string(), key.to_string()))
                .cloned()
        }
    }

    #[async_trait]
    impl SnapshotStore for MemoryStore {
        async fn exists(&self, student: &str, key: &str) -> Result<bool> {
            Ok(self.get(student, key).is_some())
        }

        async fn read(&self, student: &str, key: &str) -> Result<Vec<u8>> {
            self.get(student, key).ok_or_else(|| StoreError::NotFound {
                student: student.to_string(),
                key: key.to_string(),
            })
        }

        async fn write(&self, student: &str, key: &str, data: &[u8]) -> Result<()> {
            self.blobs
                .lock()
                .unwrap()
                .insert((student.to_string(), key.to_string()), data.to_vec());
            Ok(())
        }
    }
}
