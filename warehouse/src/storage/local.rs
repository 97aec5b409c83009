use super::ObjectStorage;
use async_trait::async_trait;
use common::{Error, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Object storage on the local filesystem, rooted at one directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes_root = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || escapes_root {
            return Err(Error::InvalidInput(format!(
                "Object key '{}' must be a relative path inside the storage root",
                key
            )));
        }
        Ok(self.root.join(relative))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put_object(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Readers never observe a half-written object.
        let mut partial = path.clone().into_os_string();
        partial.push(".partial");
        let partial = PathBuf::from(partial);
        fs::write(&partial, data).await?;
        fs::rename(&partial, &path).await?;

        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::Storage(format!(
                "Object {} not found in {}",
                key,
                self.location()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let mut objects = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }
                if let Some(key) = self.key_for(&path) {
                    if key.starts_with(prefix) && !key.ends_with(".partial") {
                        objects.push(key);
                    }
                }
            }
        }

        objects.sort();
        Ok(objects)
    }

    async fn check_file_exists(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.put_object("runs/a/table.ndjson", b"first").await.unwrap();
        storage.put_object("runs/a/table.ndjson", b"second").await.unwrap();

        assert_eq!(
            storage.get_object("runs/a/table.ndjson").await.unwrap(),
            b"second"
        );
        assert!(storage.check_file_exists("runs/a/table.ndjson").await.unwrap());
        assert!(!storage.check_file_exists("runs/a/other.ndjson").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_objects_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        for key in ["runs/a/x.parquet", "runs/b/y.parquet", "other/z.parquet"] {
            storage.put_object(key, b"data").await.unwrap();
        }

        assert_eq!(
            storage.list_objects("runs/").await.unwrap(),
            vec!["runs/a/x.parquet".to_string(), "runs/b/y.parquet".to_string()]
        );
        assert_eq!(storage.list_objects("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_object_and_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("never-created"));

        assert!(matches!(
            storage.get_object("nope").await,
            Err(Error::Storage(_))
        ));
        assert!(storage.list_objects("").await.unwrap().is_empty());
        assert!(matches!(
            storage.put_object("../outside", b"x").await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            storage.put_object("/etc/passwd", b"x").await,
            Err(Error::InvalidInput(_))
        ));
    }
}
