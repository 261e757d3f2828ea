use std::{marker::PhantomData, path::{Path, PathBuf}};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::errors::ServiceError;

/// JSON file holding a top-level array of `T`.
///
/// Nothing is cached: every `read` goes to disk and every `write` replaces
/// the whole file. There is no locking, so concurrent writers race and the
/// last one wins.
pub struct JsonListStore<T> {
    file_path: PathBuf,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _items: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Create the parent directory and an empty array if the file is missing.
    pub async fn ensure_exists(&self) -> Result<(), ServiceError> {
        let exists = fs::try_exists(&self.file_path).await.map_err(storage_err)?;
        if exists {
            return Ok(());
        }
        self.ensure_parent().await?;
        fs::write(&self.file_path, b"[]").await.map_err(storage_err)?;
        debug!(file = %self.file_path.display(), "initialized empty datastore");
        Ok(())
    }

    async fn ensure_parent(&self) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(storage_err)?;
        }
        Ok(())
    }

    /// Load the whole collection.
    ///
    /// A document that is not a JSON array of `T` (including `null` and an
    /// empty file) reads as an empty collection. The next write then
    /// overwrites whatever was there.
    pub async fn read(&self) -> Result<Vec<T>, ServiceError> {
        self.ensure_exists().await?;
        let bytes = fs::read(&self.file_path).await.map_err(storage_err)?;
        match serde_json::from_slice::<Option<Vec<T>>>(&bytes) {
            Ok(items) => Ok(items.unwrap_or_default()),
            Err(e) => {
                warn!(file = %self.file_path.display(), error = %e, "datastore is not a valid JSON array; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Replace the file with the pretty-printed collection.
    pub async fn write(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::Storage(e.to_string()))?;
        self.ensure_parent().await?;
        fs::write(&self.file_path, data).await.map_err(storage_err)?;
        Ok(())
    }
}

fn storage_err(e: std::io::Error) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        key: String,
        value: u32,
    }

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("json_list_store_{}_{}", tag, uuid::Uuid::new_v4()))
            .join("nested")
            .join("items.json")
    }

    async fn cleanup(path: &Path) {
        if let Some(root) = path.parent().and_then(|p| p.parent()) {
            let _ = fs::remove_dir_all(root).await;
        }
    }

    #[tokio::test]
    async fn missing_file_is_created_as_empty_array() -> Result<(), anyhow::Error> {
        let path = temp_path("missing");
        let store = JsonListStore::<Item>::new(&path);

        assert!(store.read().await?.is_empty());
        assert_eq!(fs::read_to_string(&path).await?, "[]");

        cleanup(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn garbage_and_null_read_as_empty() -> Result<(), anyhow::Error> {
        let path = temp_path("garbage");
        let store = JsonListStore::<Item>::new(&path);
        store.ensure_exists().await?;

        for doc in ["{not json", "null", "", r#"{"key":"a"}"#] {
            fs::write(&path, doc).await?;
            assert!(store.read().await?.is_empty(), "document {doc:?} should read as empty");
        }

        cleanup(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn io_failures_are_storage_errors() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("json_list_store_io_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&root).await?;

        // parent of the data file is a regular file
        let blocker = root.join("blocker");
        fs::write(&blocker, "x").await?;
        let store = JsonListStore::<Item>::new(blocker.join("items.json"));
        assert!(matches!(store.read().await, Err(ServiceError::Storage(_))));
        assert!(matches!(store.write(&[]).await, Err(ServiceError::Storage(_))));

        // data file path is a directory
        let dir_path = root.join("items.json");
        fs::create_dir_all(&dir_path).await?;
        let store = JsonListStore::<Item>::new(&dir_path);
        assert!(matches!(store.read().await, Err(ServiceError::Storage(_))));
        assert!(matches!(store.write(&[]).await, Err(ServiceError::Storage(_))));

        let _ = fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn write_then_read_keeps_order() -> Result<(), anyhow::Error> {
        let path = temp_path("order");
        let store = JsonListStore::<Item>::new(&path);
        let items = vec![
            Item { key: "b".into(), value: 2 },
            Item { key: "a".into(), value: 1 },
        ];

        store.write(&items).await?;
        assert_eq!(store.read().await?, items);

        // pretty-printed with two-space indent
        let text = fs::read_to_string(&path).await?;
        assert!(text.starts_with("[\n  {\n    \"key\": \"b\""));

        cleanup(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn rewrite_of_read_is_byte_identical() -> Result<(), anyhow::Error> {
        let path = temp_path("idempotent");
        let store = JsonListStore::<Item>::new(&path);
        store.write(&[Item { key: "x".into(), value: 9 }]).await?;
        let first = fs::read(&path).await?;

        let items = store.read().await?;
        store.write(&items).await?;
        assert_eq!(fs::read(&path).await?, first);

        cleanup(&path).await;
        Ok(())
    }
}
