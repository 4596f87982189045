use super::traits::{KvStore, validate_key};
use crate::error::StoreError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const VALUE_EXTENSION: &str = "json";

/// One `<key>.json` file per key inside a directory.
///
/// Writes go through a per-write temp file and a rename so a reader never
/// sees a half-written value and concurrent writers of one key never share a
/// temp file. The last rename wins.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{VALUE_EXTENSION}"))
    }
}

async fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
    tokio::fs::write(&temp_path, content).await?;

    if let Err(rename_error) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(rename_error.into());
    }

    Ok(())
}

#[async_trait]
impl KvStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        match tokio::fs::read_to_string(self.value_path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        write_atomic(&self.value_path(key), value).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        match tokio::fs::remove_file(self.value_path(key)).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_directory_on_first_write() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested").join("store"));

        store.set("ingredients", "[]").await.unwrap();

        assert!(store.dir().join("ingredients.json").exists());
        assert_eq!(leftover_temp_files(store.dir()), 0);
    }

    fn leftover_temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|entry| {
                entry
                    .as_ref()
                    .unwrap()
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == "tmp")
            })
            .count()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_of_one_key_all_succeed() {
        let tmp = TempDir::new().unwrap();
        let first = std::sync::Arc::new(FileStore::new(tmp.path()));
        let second = std::sync::Arc::new(FileStore::new(tmp.path()));

        for round in 0..100 {
            let (a, b) = (first.clone(), second.clone());
            let short = format!("[{round}]");
            let long = format!("[{round}, {round}]");
            let left = tokio::spawn(async move { a.set("ingredients", &short).await });
            let right = tokio::spawn(async move { b.set("ingredients", &long).await });

            left.await.unwrap().unwrap();
            right.await.unwrap().unwrap();

            let stored = first.get("ingredients").await.unwrap().unwrap();
            assert!(
                stored == format!("[{round}]") || stored == format!("[{round}, {round}]"),
                "unexpected value {stored}"
            );
        }

        assert_eq!(leftover_temp_files(tmp.path()), 0);
        assert_eq!(first.keys().await.unwrap(), vec!["ingredients".to_string()]);
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        assert!(store.get("ingredients").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_and_list_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        store.set("food_preferences", "{}").await.unwrap();
        store.set("ingredients", "[1]").await.unwrap();
        store.set("ingredients", "[2]").await.unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(
            store.get("ingredients").await.unwrap().as_deref(),
            Some("[2]")
        );
        assert_eq!(
            store.keys().await.unwrap(),
            vec!["food_preferences".to_string(), "ingredients".to_string()]
        );
    }

    #[tokio::test]
    async fn keys_of_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("absent"));

        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        store.set("k", "v").await.unwrap();

        assert!(store.remove("k").await.unwrap());
        assert!(!store.remove("k").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());

        assert!(matches!(
            store.get("../../etc/passwd").await,
            Err(StoreError::InvalidKey(_))
        ));
    }
}
