use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::ServiceError;

/// Generic JSON file-backed document store.
///
/// Holds no copy of the document: `load` reads the file on every call and
/// `save` rewrites it whole. A missing file is treated as `T::default()` and
/// created on first load.
pub struct JsonDocumentStore<T> {
    file_path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonDocumentStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _doc: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and parse the file. A corrupt file is an error, never an empty document.
    pub async fn load(&self) -> Result<T, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{} is not a valid document: {e}", self.file_path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = T::default();
                self.save(&empty).await?;
                Ok(empty)
            }
            Err(e) => Err(ServiceError::Storage(format!("read {}: {e}", self.file_path.display()))),
        }
    }

    /// Serialize the whole document (pretty, two-space indent) and overwrite the file.
    pub async fn save(&self, doc: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(doc).map_err(ServiceError::storage)?;
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
        }
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(format!("write {}: {e}", self.file_path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Doc {
        items: Vec<String>,
    }

    fn tmp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("json_document_store_{}", uuid::Uuid::new_v4()))
            .join("doc.json")
    }

    #[tokio::test]
    async fn missing_file_loads_default_and_is_created() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        let store = JsonDocumentStore::<Doc>::new(&path);
        assert_eq!(store.load().await?, Doc::default());
        assert!(fs::metadata(&path).await?.is_file());
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn every_load_reads_the_file() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        let store = JsonDocumentStore::<Doc>::new(&path);
        store.save(&Doc { items: vec!["a".into()] }).await?;

        // edited behind the store's back
        fs::write(&path, br#"{"items":["b","c"]}"#).await?;
        assert_eq!(store.load().await?.items, vec!["b", "c"]);

        let raw = {
            store.save(&Doc { items: vec!["d".into()] }).await?;
            fs::read_to_string(&path).await?
        };
        assert!(raw.contains("\n  \"items\""), "pretty printed: {raw}");
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() -> Result<(), anyhow::Error> {
        let path = tmp_path();
        fs::create_dir_all(path.parent().unwrap()).await?;
        fs::write(&path, b"{not json").await?;
        let store = JsonDocumentStore::<Doc>::new(&path);
        assert!(matches!(store.load().await, Err(ServiceError::Storage(_))));
        // untouched
        assert_eq!(fs::read(&path).await?, b"{not json");
        let _ = fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }
}
