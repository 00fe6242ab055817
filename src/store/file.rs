use std::path::{ Path, PathBuf };

use async_trait::async_trait;
use log::info;

use super::{ StorageBackend, StoreError };

/// Key-value storage as one JSON file per key under a data directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            info!("creating data directory {}", self.dir.display());
            tokio::fs::create_dir_all(&self.dir).await?;
        }
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}
